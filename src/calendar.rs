use chrono::{Datelike, Duration, Months, NaiveDate};

pub const DAY_NAMES: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

const MAX_INPUT_LEN: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_today: bool,
    pub is_selected: bool,
}

/// Due date input: typed `dd/mm/yyyy` text plus a month calendar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatePicker {
    pub input: String,
    pub selected: Option<NaiveDate>,
    /// Last complete date typed or picked, valid or not.
    pub candidate: Option<NaiveDate>,
    pub month: NaiveDate,
    pub cursor: NaiveDate,
    pub open: bool,
    pub show_warning: bool,
    today: NaiveDate,
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn format_display(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Parses `dd/mm/yyyy`; `-` and `.` are accepted as separators. The year must have four digits.
pub fn parse_date_input(input: &str) -> Option<NaiveDate> {
    let normalized = input.trim().replace(&['-', '.'][..], "/");
    let parts: Vec<&str> = normalized.split('/').collect();
    if parts.len() != 3 || parts[2].len() != 4 || !parts[2].bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let day = parts[0].parse::<u32>().ok()?;
    let month = parts[1].parse::<u32>().ok()?;
    let year = parts[2].parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

impl DatePicker {
    pub fn new(today: NaiveDate) -> Self {
        DatePicker {
            input: String::new(),
            selected: None,
            candidate: None,
            month: first_of_month(today),
            cursor: today,
            open: false,
            show_warning: false,
            today,
        }
    }

    /// Picker for an existing due date; a date in the past raises the warning.
    pub fn with_date(today: NaiveDate, date: NaiveDate) -> Self {
        let mut picker = DatePicker::new(today);
        if !picker.select(date) {
            picker.input = format_display(date);
            picker.candidate = Some(date);
            picker.month = first_of_month(date);
            picker.cursor = date;
        }
        picker
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn is_past(&self, date: NaiveDate) -> bool {
        date < self.today
    }

    /// True when the last entered date exists, is not in the past and the input fits `dd/mm/yyyy`.
    pub fn is_valid(&self) -> bool {
        self.input.chars().count() <= MAX_INPUT_LEN
            && self.candidate.map(|d| !self.is_past(d)).unwrap_or(false)
    }

    /// Selects `date` if it is today or later. Returns whether it was accepted.
    pub fn select(&mut self, date: NaiveDate) -> bool {
        self.candidate = Some(date);
        if self.is_past(date) {
            self.selected = None;
            self.show_warning = true;
            return false;
        }
        self.selected = Some(date);
        self.input = format_display(date);
        self.month = first_of_month(date);
        self.cursor = date;
        self.open = false;
        self.show_warning = false;
        true
    }

    pub fn on_input(&mut self, input: &str) {
        self.input = input.to_string();
        let normalized = input.replace(&['-', '.'][..], "/");
        if normalized.split('/').count() == 3 {
            match parse_date_input(input) {
                Some(date) => {
                    self.month = first_of_month(date);
                    self.cursor = date;
                    self.select(date);
                }
                None => {
                    self.candidate = None;
                    self.selected = None;
                    self.show_warning = true;
                }
            }
        } else {
            self.candidate = None;
            self.selected = None;
        }
        if input.chars().count() > MAX_INPUT_LEN {
            self.show_warning = true;
        }
    }

    pub fn push_char(&mut self, c: char) {
        let mut input = self.input.clone();
        input.push(c);
        self.on_input(&input);
    }

    pub fn pop_char(&mut self) {
        let mut input = self.input.clone();
        input.pop();
        self.on_input(&input);
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
        if self.open {
            self.cursor = self.selected.unwrap_or(self.today);
            self.month = first_of_month(self.cursor);
        }
    }

    /// Navigation stops at the edges of the representable date range.
    pub fn prev_month(&mut self) {
        if let Some(month) = self.month.checked_sub_months(Months::new(1)) {
            self.month = month;
            self.cursor = month;
        }
    }

    pub fn next_month(&mut self) {
        if let Some(month) = self.month.checked_add_months(Months::new(1)) {
            self.month = month;
            self.cursor = month;
        }
    }

    /// Moves the calendar cursor by `days`, following it across months.
    pub fn move_cursor(&mut self, days: i64) {
        if let Some(cursor) = self.cursor.checked_add_signed(Duration::days(days)) {
            self.cursor = cursor;
            self.month = first_of_month(cursor);
        }
    }

    pub fn select_cursor(&mut self) -> bool {
        self.select(self.cursor)
    }

    pub fn set_today(&mut self) {
        self.select(self.today);
    }

    pub fn reset(&mut self) {
        *self = DatePicker::new(self.today);
    }

    /// Monday-first grid: leading blanks, then every day of the shown month.
    pub fn grid(&self) -> Vec<Option<CalendarDay>> {
        let start = self.month;
        let leading = start.weekday().num_days_from_monday() as usize;
        let mut days: Vec<Option<CalendarDay>> = vec![None; leading];
        let mut date = start;
        while date.month() == start.month() {
            days.push(Some(CalendarDay {
                date,
                is_today: date == self.today,
                is_selected: self.selected == Some(date),
            }));
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        days
    }
}
