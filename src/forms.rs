use crate::calendar::DatePicker;
use crate::models::{initials, Category, Contact, Priority, Status, Subtask, Task};
use crate::services::contacts::split_full_name;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Text entry shared by every form: characters go to whichever field has focus.
pub trait FormInput {
    /// The focused text buffer, if the focused field takes text.
    fn input(&mut self) -> Option<&mut String>;

    /// Called after the focused buffer changed.
    fn touched(&mut self) {}

    fn next_field(&mut self);

    fn prev_field(&mut self);

    fn push_char(&mut self, c: char) {
        if let Some(buffer) = self.input() {
            buffer.push(c);
            self.touched();
        }
    }

    fn pop_char(&mut self) {
        if let Some(buffer) = self.input() {
            buffer.pop();
            self.touched();
        }
    }
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("static regex")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_re().is_match(email.trim())
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let len = all.len();
    let index = all.iter().position(|&v| v == current).unwrap_or(0);
    let next = if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    };
    all[next]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Description,
    DueDate,
    Category,
    Priority,
    Assigned,
    Subtasks,
}

impl TaskField {
    pub const ORDER: [TaskField; 7] = [
        TaskField::Title,
        TaskField::Description,
        TaskField::DueDate,
        TaskField::Category,
        TaskField::Priority,
        TaskField::Assigned,
        TaskField::Subtasks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskField::Title => "Title",
            TaskField::Description => "Description",
            TaskField::DueDate => "Due date",
            TaskField::Category => "Category",
            TaskField::Priority => "Prio",
            TaskField::Assigned => "Assigned to",
            TaskField::Subtasks => "Subtasks",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskWarnings {
    pub title: bool,
    pub category: bool,
    pub date: bool,
}

impl TaskWarnings {
    pub fn any(&self) -> bool {
        self.title || self.category || self.date
    }
}

/// State of the add/edit task form.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskForm {
    /// Set when editing an existing task.
    pub id: Option<u64>,
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub priority: Priority,
    pub status: Status,
    pub due: DatePicker,
    pub assigned: Vec<u64>,
    pub subtasks: Vec<Subtask>,
    pub subtask_input: String,
    /// Index of the subtask whose title is being rewritten.
    pub editing_subtask: Option<usize>,
    pub subtask_cursor: usize,
    pub contact_cursor: usize,
    pub focus: TaskField,
    pub warnings: TaskWarnings,
}

impl TaskForm {
    pub fn new(status: Status, today: NaiveDate) -> Self {
        TaskForm {
            id: None,
            title: String::new(),
            description: String::new(),
            category: None,
            priority: Priority::Medium,
            status,
            due: DatePicker::new(today),
            assigned: Vec::new(),
            subtasks: Vec::new(),
            subtask_input: String::new(),
            editing_subtask: None,
            subtask_cursor: 0,
            contact_cursor: 0,
            focus: TaskField::Title,
            warnings: TaskWarnings::default(),
        }
    }

    pub fn edit(task: &Task, today: NaiveDate) -> Self {
        let due = match task.due_date {
            Some(date) => DatePicker::with_date(today, date),
            None => DatePicker::new(today),
        };
        TaskForm {
            id: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone(),
            category: task.category,
            priority: task.priority,
            status: task.status,
            due,
            assigned: task.assigned_to.clone(),
            subtasks: task.subtasks.clone(),
            ..TaskForm::new(task.status, today)
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn clear_warning(&mut self, field: TaskField) {
        match field {
            TaskField::Title => self.warnings.title = false,
            TaskField::Category => self.warnings.category = false,
            TaskField::DueDate => self.warnings.date = false,
            _ => {}
        }
    }

    /// Raises a warning for every failing field. Returns true when the form can be saved.
    pub fn validate(&mut self) -> bool {
        self.warnings = TaskWarnings {
            title: self.title.trim().is_empty(),
            category: self.category.is_none(),
            date: !self.due.is_valid(),
        };
        !self.warnings.any()
    }

    /// The task to send, or `None` if validation failed.
    pub fn to_task(&mut self) -> Option<Task> {
        if !self.validate() {
            return None;
        }
        Some(Task {
            id: self.id.unwrap_or(0),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category,
            priority: self.priority,
            status: self.status,
            due_date: self.due.selected,
            assigned_to: self.assigned.clone(),
            subtasks: self.subtasks.clone(),
        })
    }

    pub fn cycle_category(&mut self, forward: bool) {
        self.category = Some(match self.category {
            Some(current) => cycle(&Category::ALL, current, forward),
            None => Category::ALL[0],
        });
        self.clear_warning(TaskField::Category);
    }

    pub fn cycle_priority(&mut self, forward: bool) {
        self.priority = cycle(&Priority::ALL, self.priority, forward);
    }

    pub fn toggle_contact(&mut self, id: u64) {
        if let Some(pos) = self.assigned.iter().position(|&a| a == id) {
            self.assigned.remove(pos);
        } else {
            self.assigned.push(id);
        }
    }

    /// Adds the typed subtask, or stores it back when an existing one is being edited.
    pub fn commit_subtask(&mut self) -> bool {
        let title = self.subtask_input.trim().to_string();
        if title.is_empty() {
            return false;
        }
        match self.editing_subtask.take() {
            Some(index) if index < self.subtasks.len() => self.subtasks[index].title = title,
            _ => {
                self.subtasks.push(Subtask::new(title));
                self.subtask_cursor = self.subtasks.len() - 1;
            }
        }
        self.subtask_input.clear();
        true
    }

    pub fn edit_subtask(&mut self, index: usize) {
        if let Some(subtask) = self.subtasks.get(index) {
            self.subtask_input = subtask.title.clone();
            self.editing_subtask = Some(index);
        }
    }

    pub fn delete_subtask(&mut self, index: usize) {
        if index < self.subtasks.len() {
            self.subtasks.remove(index);
            self.editing_subtask = None;
            self.subtask_cursor = self.subtask_cursor.min(self.subtasks.len().saturating_sub(1));
        }
    }

    pub fn toggle_subtask(&mut self, index: usize) {
        if let Some(subtask) = self.subtasks.get_mut(index) {
            subtask.done = !subtask.done;
        }
    }

    /// Blank form that keeps the column status it was opened for.
    pub fn reset(&mut self) {
        *self = TaskForm::new(self.status, self.due.today());
    }
}

impl FormInput for TaskForm {
    fn input(&mut self) -> Option<&mut String> {
        match self.focus {
            TaskField::Title => Some(&mut self.title),
            TaskField::Description => Some(&mut self.description),
            TaskField::Subtasks => Some(&mut self.subtask_input),
            _ => None,
        }
    }

    fn touched(&mut self) {
        self.clear_warning(self.focus);
    }

    fn next_field(&mut self) {
        let index = TaskField::ORDER.iter().position(|&f| f == self.focus).unwrap_or(0);
        self.focus = TaskField::ORDER[(index + 1) % TaskField::ORDER.len()];
    }

    fn prev_field(&mut self) {
        let len = TaskField::ORDER.len();
        let index = TaskField::ORDER.iter().position(|&f| f == self.focus).unwrap_or(0);
        self.focus = TaskField::ORDER[(index + len - 1) % len];
    }

    fn push_char(&mut self, c: char) {
        if self.focus == TaskField::DueDate {
            self.due.push_char(c);
            self.warnings.date = false;
        } else if let Some(buffer) = self.input() {
            buffer.push(c);
            self.touched();
        }
    }

    fn pop_char(&mut self) {
        if self.focus == TaskField::DueDate {
            self.due.pop_char();
            self.warnings.date = false;
        } else if let Some(buffer) = self.input() {
            buffer.pop();
            self.touched();
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Phone,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContactWarnings {
    pub name: bool,
    pub email: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactForm {
    pub id: Option<u64>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub focus: ContactField,
    pub warnings: ContactWarnings,
}

/// Capitalises each word and collapses runs of spaces.
pub fn normalize_name(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Default for ContactForm {
    fn default() -> Self {
        ContactForm::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        ContactForm {
            id: None,
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            focus: ContactField::Name,
            warnings: ContactWarnings::default(),
        }
    }

    pub fn edit(contact: &Contact) -> Self {
        ContactForm {
            id: Some(contact.id),
            full_name: contact.full_name(),
            email: contact.email.clone(),
            phone: contact.phone_number.clone(),
            ..ContactForm::new()
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    /// Initials of the name as typed so far.
    pub fn live_initials(&self) -> String {
        let (first, last) = split_full_name(&self.full_name);
        initials(&first, &last)
    }

    pub fn validate(&mut self) -> bool {
        self.warnings = ContactWarnings {
            name: self.full_name.trim().is_empty(),
            email: !is_valid_email(&self.email),
        };
        !(self.warnings.name || self.warnings.email)
    }

    pub fn to_contact(&mut self) -> Option<Contact> {
        if !self.validate() {
            return None;
        }
        let (first_name, last_name) = split_full_name(&normalize_name(&self.full_name));
        Some(Contact {
            id: self.id.unwrap_or(0),
            first_name,
            last_name,
            email: self.email.trim().to_string(),
            phone_number: self.phone.trim().to_string(),
        })
    }
}

impl FormInput for ContactForm {
    fn input(&mut self) -> Option<&mut String> {
        Some(match self.focus {
            ContactField::Name => &mut self.full_name,
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
        })
    }

    fn touched(&mut self) {
        match self.focus {
            ContactField::Name => self.warnings.name = false,
            ContactField::Email => self.warnings.email = false,
            ContactField::Phone => {}
        }
    }

    fn next_field(&mut self) {
        self.focus = match self.focus {
            ContactField::Name => ContactField::Email,
            ContactField::Email => ContactField::Phone,
            ContactField::Phone => ContactField::Name,
        };
    }

    fn prev_field(&mut self) {
        self.focus = match self.focus {
            ContactField::Name => ContactField::Phone,
            ContactField::Email => ContactField::Name,
            ContactField::Phone => ContactField::Email,
        };
    }
}

pub fn mask(secret: &str, visible: bool) -> String {
    if visible {
        secret.to_string()
    } else {
        "*".repeat(secret.chars().count())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub show_password: bool,
    pub focus: LoginField,
    /// Missing input or rejected credentials.
    pub warn: bool,
}

impl Default for LoginForm {
    fn default() -> Self {
        LoginForm {
            email: String::new(),
            password: String::new(),
            show_password: false,
            focus: LoginField::Email,
            warn: false,
        }
    }
}

impl LoginForm {
    pub fn validate(&mut self) -> bool {
        self.warn = self.email.trim().is_empty() || self.password.is_empty();
        !self.warn
    }

    pub fn toggle_password(&mut self) {
        self.show_password = !self.show_password;
    }

    pub fn masked_password(&self) -> String {
        mask(&self.password, self.show_password)
    }
}

impl FormInput for LoginForm {
    fn input(&mut self) -> Option<&mut String> {
        Some(match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        })
    }

    fn touched(&mut self) {
        self.warn = false;
    }

    fn next_field(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    fn prev_field(&mut self) {
        self.next_field();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignUpField {
    Name,
    Email,
    Password,
    Confirm,
    Privacy,
}

impl SignUpField {
    pub const ORDER: [SignUpField; 5] = [
        SignUpField::Name,
        SignUpField::Email,
        SignUpField::Password,
        SignUpField::Confirm,
        SignUpField::Privacy,
    ];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignUpWarnings {
    pub missing: bool,
    pub email: bool,
    pub short_password: bool,
    pub mismatch: bool,
    pub privacy: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub privacy_accepted: bool,
    pub show_password: bool,
    pub focus: SignUpField,
    pub warnings: SignUpWarnings,
}

impl Default for SignUpForm {
    fn default() -> Self {
        SignUpForm {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm: String::new(),
            privacy_accepted: false,
            show_password: false,
            focus: SignUpField::Name,
            warnings: SignUpWarnings::default(),
        }
    }
}

impl SignUpForm {
    pub fn toggle_privacy(&mut self) {
        self.privacy_accepted = !self.privacy_accepted;
        self.warnings.privacy = !self.privacy_accepted;
    }

    pub fn toggle_password(&mut self) {
        self.show_password = !self.show_password;
    }

    pub fn validate(&mut self) -> bool {
        let missing = self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
            || self.confirm.is_empty();
        self.warnings = SignUpWarnings {
            missing,
            email: !self.email.trim().is_empty() && !is_valid_email(&self.email),
            short_password: !self.password.is_empty()
                && self.password.chars().count() < MIN_PASSWORD_LEN,
            mismatch: self.password != self.confirm,
            privacy: !self.privacy_accepted,
        };
        let w = self.warnings;
        !(w.missing || w.email || w.short_password || w.mismatch || w.privacy)
    }
}

impl FormInput for SignUpForm {
    fn input(&mut self) -> Option<&mut String> {
        match self.focus {
            SignUpField::Name => Some(&mut self.name),
            SignUpField::Email => Some(&mut self.email),
            SignUpField::Password => Some(&mut self.password),
            SignUpField::Confirm => Some(&mut self.confirm),
            SignUpField::Privacy => None,
        }
    }

    fn touched(&mut self) {
        let privacy = self.warnings.privacy;
        self.warnings = SignUpWarnings {
            privacy,
            ..Default::default()
        };
    }

    fn next_field(&mut self) {
        let index = SignUpField::ORDER.iter().position(|&f| f == self.focus).unwrap_or(0);
        self.focus = SignUpField::ORDER[(index + 1) % SignUpField::ORDER.len()];
    }

    fn prev_field(&mut self) {
        let len = SignUpField::ORDER.len();
        let index = SignUpField::ORDER.iter().position(|&f| f == self.focus).unwrap_or(0);
        self.focus = SignUpField::ORDER[(index + len - 1) % len];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn type_into<F: FormInput>(form: &mut F, text: &str) {
        for c in text.chars() {
            form.push_char(c);
        }
    }

    #[test]
    fn test_empty_task_form_raises_every_warning() {
        let mut form = TaskForm::new(Status::Todo, today());
        assert_eq!(form.to_task(), None);
        assert_eq!(
            form.warnings,
            TaskWarnings {
                title: true,
                category: true,
                date: true
            }
        );
    }

    #[test]
    fn test_editing_a_field_clears_its_warning() {
        let mut form = TaskForm::new(Status::Todo, today());
        form.validate();
        type_into(&mut form, "Plan sprint");
        assert!(!form.warnings.title);
        assert!(form.warnings.category);
        form.cycle_category(true);
        assert!(!form.warnings.category);
        form.focus = TaskField::DueDate;
        form.push_char('0');
        assert!(!form.warnings.date);
    }

    #[test]
    fn test_valid_task_form_builds_task() {
        let mut form = TaskForm::new(Status::AwaitFeedback, today());
        type_into(&mut form, "  Plan sprint ");
        form.next_field();
        type_into(&mut form, "with the team");
        form.next_field();
        type_into(&mut form, "01/11/2026");
        form.cycle_category(true);
        form.cycle_category(true);
        form.cycle_priority(true);
        form.toggle_contact(4);
        form.toggle_contact(7);
        form.toggle_contact(4);

        let task = form.to_task().unwrap();
        assert_eq!(task.id, 0);
        assert_eq!(task.title, "Plan sprint");
        assert_eq!(task.description, "with the team");
        assert_eq!(task.category, Some(Category::TechnicalTask));
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, Status::AwaitFeedback);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 11, 1));
        assert_eq!(task.assigned_to, vec![7]);
    }

    #[test]
    fn test_past_due_date_is_rejected() {
        let mut form = TaskForm::new(Status::Todo, today());
        form.title = "Late".to_string();
        form.category = Some(Category::UserStory);
        form.due.on_input("01/10/2026");
        assert!(!form.validate());
        assert!(form.warnings.date);
        assert!(!form.warnings.title);
    }

    #[test]
    fn test_five_digit_year_is_not_sent() {
        let mut form = TaskForm::new(Status::Todo, today());
        form.title = "Far future".to_string();
        form.category = Some(Category::UserStory);
        form.due.on_input("01/01/20277");
        assert_eq!(form.to_task(), None);
        assert!(form.warnings.date);
    }

    #[test]
    fn test_edit_prefills_from_task() {
        let task = Task {
            id: 9,
            title: "Review".to_string(),
            category: Some(Category::UserStory),
            priority: Priority::Low,
            status: Status::Doing,
            due_date: NaiveDate::from_ymd_opt(2026, 12, 24),
            subtasks: vec![Subtask::new("read")],
            ..Default::default()
        };
        let mut form = TaskForm::edit(&task, today());
        assert!(form.is_edit());
        assert_eq!(form.due.input, "24/12/2026");
        let back = form.to_task().unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_subtask_editor() {
        let mut form = TaskForm::new(Status::Todo, today());
        form.focus = TaskField::Subtasks;
        assert!(!form.commit_subtask());
        type_into(&mut form, "write tests");
        assert!(form.commit_subtask());
        type_into(&mut form, "   ");
        assert!(!form.commit_subtask());
        form.subtask_input = "ship".to_string();
        form.commit_subtask();
        assert_eq!(form.subtasks.len(), 2);
        assert_eq!(form.subtask_cursor, 1);

        form.edit_subtask(0);
        assert_eq!(form.subtask_input, "write tests");
        form.subtask_input = "write more tests".to_string();
        form.commit_subtask();
        assert_eq!(form.subtasks[0].title, "write more tests");
        assert_eq!(form.subtasks.len(), 2);

        form.toggle_subtask(1);
        assert!(form.subtasks[1].done);
        form.delete_subtask(1);
        assert_eq!(form.subtasks, vec![Subtask::new("write more tests")]);
        assert_eq!(form.subtask_cursor, 0);
    }

    #[test]
    fn test_reset_keeps_status() {
        let mut form = TaskForm::new(Status::Doing, today());
        form.title = "x".to_string();
        form.validate();
        form.reset();
        assert_eq!(form, TaskForm::new(Status::Doing, today()));
    }

    #[test]
    fn test_field_focus_wraps() {
        let mut form = TaskForm::new(Status::Todo, today());
        form.prev_field();
        assert_eq!(form.focus, TaskField::Subtasks);
        form.next_field();
        assert_eq!(form.focus, TaskField::Title);
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("max@example.com"));
        assert!(is_valid_email(" a.b+c@mail.example.org "));
        assert!(!is_valid_email("max@example"));
        assert!(!is_valid_email("max example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_contact_form_validation_and_split() {
        let mut form = ContactForm::new();
        assert_eq!(form.to_contact(), None);
        assert!(form.warnings.name && form.warnings.email);

        type_into(&mut form, "anna  maria berg");
        assert!(!form.warnings.name);
        assert_eq!(form.live_initials(), "AM");
        form.next_field();
        type_into(&mut form, "anna@example.com");
        let contact = form.to_contact().unwrap();
        assert_eq!(contact.first_name, "Anna");
        assert_eq!(contact.last_name, "Maria Berg");
        assert_eq!(contact.phone_number, "");
    }

    #[test]
    fn test_contact_form_edit_prefills() {
        let contact = Contact {
            id: 3,
            first_name: "Max".to_string(),
            last_name: "Muster".to_string(),
            email: "max@example.com".to_string(),
            phone_number: "0123".to_string(),
        };
        let mut form = ContactForm::edit(&contact);
        assert!(form.is_edit());
        assert_eq!(form.full_name, "Max Muster");
        assert_eq!(form.to_contact(), Some(contact));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  jane   van doe "), "Jane Van Doe");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_login_form() {
        let mut form = LoginForm::default();
        assert!(!form.validate());
        assert!(form.warn);
        type_into(&mut form, "ada@example.com");
        assert!(!form.warn);
        form.next_field();
        type_into(&mut form, "secret");
        assert_eq!(form.masked_password(), "******");
        form.toggle_password();
        assert_eq!(form.masked_password(), "secret");
        assert!(form.validate());
    }

    #[test]
    fn test_sign_up_requires_privacy_and_matching_passwords() {
        let mut form = SignUpForm {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "correct-horse".to_string(),
            confirm: "correct-horse".to_string(),
            ..Default::default()
        };
        assert!(!form.validate());
        assert!(form.warnings.privacy);
        assert!(!form.warnings.mismatch);

        form.toggle_privacy();
        assert!(!form.warnings.privacy);
        form.confirm = "correct-horsE".to_string();
        assert!(!form.validate());
        assert!(form.warnings.mismatch);

        form.confirm = "correct-horse".to_string();
        assert!(form.validate());
    }

    #[test]
    fn test_sign_up_password_rules() {
        let mut form = SignUpForm {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            confirm: "short".to_string(),
            privacy_accepted: true,
            ..Default::default()
        };
        assert!(!form.validate());
        assert!(form.warnings.short_password);
        assert!(form.warnings.email);
        assert!(!form.warnings.missing);

        form.focus = SignUpField::Privacy;
        form.push_char('x');
        assert_eq!(form.input(), None);
        form.prev_field();
        assert_eq!(form.focus, SignUpField::Confirm);
    }
}
