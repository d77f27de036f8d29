use crate::app::{App, InputMode, Modal};
use crate::calendar::{format_display, DAY_NAMES};
use crate::display::{profile_color, truncate, UNKNOWN_PROFILE};
use crate::forms::{
    mask, ContactField, ContactForm, LoginField, SignUpField, TaskField, TaskForm,
};
use crate::models::{
    Category, Contact, NotificationPosition, NotificationType, Priority, Status, Task,
};
use crate::routes::Page;
use crate::summary::{greeting, Summary};
use chrono::{Datelike, Local, Timelike};
use crossterm::event::{self, Event as CEvent};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

const ACCENT: Color = Color::Rgb(0x29, 0xAB, 0xE2);
const WARN: Color = Color::Rgb(0xFF, 0x81, 0x90);

fn centered_rect_absolute(width: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length((r.height.saturating_sub(height)) / 2),
                Constraint::Length(height),
                Constraint::Length((r.height.saturating_sub(height) + 1) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Length((r.width.saturating_sub(width)) / 2),
                Constraint::Length(width),
                Constraint::Length((r.width.saturating_sub(width) + 1) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}

/// Corner rectangle for a toast of the given size.
fn corner_rect(position: NotificationPosition, width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    let right = r.x + r.width - width;
    let bottom = r.y + r.height - height;
    let (x, y) = match position {
        NotificationPosition::TopRight => (right, r.y),
        NotificationPosition::TopLeft => (r.x, r.y),
        NotificationPosition::BottomLeft => (r.x, bottom),
        NotificationPosition::BottomRight => (right, bottom),
    };
    Rect::new(x, y, width, height)
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

fn key_hint(key: &'static str, action: &'static str) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!(" {} ", key), Style::default().fg(Color::Red)),
        Span::raw(format!(": {} ", action)),
    ]
}

fn get_legend(app: &App) -> Text<'static> {
    let hints: &[(&'static str, &'static str)] = match (app.input_mode, &app.modal, app.page) {
        (InputMode::Insert, _, _) => &[("Enter", "Submit"), ("Tab", "Next Field"), ("Esc", "Stop Typing")],
        (InputMode::Search, _, _) => &[("Enter", "Keep Filter"), ("Esc", "Clear Filter")],
        (_, Modal::TaskDetail { .. }, _) => &[
            ("j/k", "Subtask"),
            ("Space", "Toggle Subtask"),
            ("e", "Edit"),
            ("d", "Delete"),
            ("Esc", "Close"),
        ],
        (_, Modal::TaskForm(_), _) | (_, Modal::None, Page::AddTask) => &[
            ("Tab", "Next Field"),
            ("i", "Type"),
            ("h/l", "Change"),
            ("Space", "Toggle"),
            ("t", "Today"),
            ("c", "Clear"),
            ("w", "Save"),
            ("Esc", "Cancel"),
        ],
        (_, Modal::MoveTo { .. }, _) => &[("j/k", "Choose"), ("Enter", "Move"), ("Esc", "Cancel")],
        (_, Modal::ConfirmDeleteTask(_), _) | (_, Modal::ConfirmDeleteContact(_), _) => {
            &[("y", "Delete"), ("n", "Keep")]
        }
        (_, Modal::ContactForm(_), _) => &[
            ("Tab", "Next Field"),
            ("i", "Type"),
            ("w", "Save"),
            ("Esc", "Cancel"),
        ],
        (_, Modal::QuickAdd(_), _) => &[("Enter", "Create"), ("Esc", "Cancel")],
        (_, Modal::None, Page::Login) => &[
            ("i", "Type"),
            ("Tab", "Next Field"),
            ("Enter", "Submit"),
            ("v", "Show Password"),
            ("s", "Sign Up / Log In"),
            ("g", "Guest Log In"),
            ("p", "Privacy"),
            ("q", "Quit"),
        ],
        (_, Modal::None, Page::Board) => &[
            ("h/l", "Column"),
            ("j/k", "Task"),
            ("H/L", "Move Task"),
            ("J/K", "Reorder"),
            ("m", "Move To"),
            ("Enter", "Details"),
            ("a", "Add Task"),
            ("A", "Quick Add"),
            ("/", "Search"),
            ("e", "Edit"),
            ("d", "Delete"),
        ],
        (_, Modal::None, Page::Help) => &[("p", "Privacy & Legal"), ("Esc", "Back"), ("q", "Quit")],
        (_, Modal::None, Page::Legal) => &[("Esc", "Back"), ("q", "Quit")],
        (_, Modal::None, Page::Contacts) => &[
            ("j/k", "Select"),
            ("a", "Add Contact"),
            ("e", "Edit"),
            ("d", "Delete"),
        ],
        (_, Modal::None, _) => &[
            ("1-5", "Pages"),
            ("r", "Refresh"),
            ("O", "Log Out"),
            ("?", "Help"),
            ("q", "Quit"),
        ],
    };
    let spans: Vec<Span<'static>> = hints
        .iter()
        .flat_map(|&(key, action)| key_hint(key, action))
        .collect();
    Text::from(Line::from(spans))
}

pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    loop {
        app.sync();
        terminal.draw(|f| draw(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let CEvent::Key(key) = event::read()? {
                let should_quit = app.handle_input(key).await?;
                if should_quit {
                    return Ok(());
                }
            }
        }
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(2)].as_ref())
        .split(size);
    let header_chunk = chunks[0];
    let body_chunk = chunks[1];
    let footer_chunk = chunks[2];

    draw_header(f, app, header_chunk);

    match app.page {
        Page::Login => draw_login(f, app, body_chunk),
        Page::Summary => draw_summary(f, app, body_chunk),
        Page::Board => draw_board(f, app, body_chunk),
        Page::Contacts => draw_contacts(f, app, body_chunk),
        Page::AddTask => draw_task_form(
            f,
            body_chunk,
            &app.task_form,
            &app.contacts(),
            app.input_mode == InputMode::Insert,
        ),
        Page::Help => draw_help(f, body_chunk),
        Page::Legal => draw_legal(f, body_chunk),
    }

    draw_modal(f, app, body_chunk);
    draw_toast(f, app, size);

    let legend = Paragraph::new(get_legend(app))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(legend, footer_chunk);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(28)].as_ref())
        .split(area);

    let titles: Vec<Line> = Page::NAV
        .iter()
        .enumerate()
        .map(|(i, page)| Line::from(format!("{} {}", i + 1, page.title())))
        .collect();
    let selected = Page::NAV.iter().position(|&p| p == app.page);
    let mut tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Join "))
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    if let Some(index) = selected {
        tabs = tabs.select(index);
    }
    f.render_widget(tabs, chunks[0]);

    let user = match app.services.users.current() {
        Some(user) => {
            let name = user.display_name();
            let initials: String = name
                .split_whitespace()
                .filter_map(|w| w.chars().next())
                .take(2)
                .flat_map(char::to_uppercase)
                .collect();
            // Green dot while the board is kept in sync with the server.
            let live = if app.is_polling() { Color::Green } else { Color::DarkGray };
            Line::from(vec![
                Span::styled("● ", Style::default().fg(live)),
                Span::styled(
                    format!(" {} ", initials),
                    Style::default().fg(Color::Black).bg(ACCENT),
                ),
                Span::raw(format!(" {}", name)),
            ])
        }
        None => Line::from(Span::styled("not logged in", Style::default().fg(Color::DarkGray))),
    };
    let user = Paragraph::new(user)
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(user, chunks[1]);
}

fn label(text: &str, focused: bool) -> Span<'static> {
    let style = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    Span::styled(format!("{:<13}", text), style)
}

fn warning_line(show: bool, text: &'static str) -> Option<Line<'static>> {
    show.then(|| {
        Line::from(Span::styled(
            format!("{:13}{}", "", text),
            Style::default().fg(WARN),
        ))
    })
}

fn cursor_suffix(focused: bool, typing: bool) -> Span<'static> {
    if focused && typing {
        Span::styled("_", Style::default().fg(ACCENT).add_modifier(Modifier::SLOW_BLINK))
    } else {
        Span::raw("")
    }
}

fn draw_login(f: &mut Frame, app: &App, area: Rect) {
    let typing = app.input_mode == InputMode::Insert;
    let mut lines: Vec<Line<'static>> = Vec::new();

    if app.signing_up {
        let form = &app.signup;
        let field = |which: SignUpField, name: &str, value: String| {
            let focused = form.focus == which;
            Line::from(vec![
                label(name, focused),
                Span::raw(value),
                cursor_suffix(focused, typing),
            ])
        };
        lines.push(field(SignUpField::Name, "Name", form.name.clone()));
        lines.push(field(SignUpField::Email, "Email", form.email.clone()));
        lines.push(field(
            SignUpField::Password,
            "Password",
            mask(&form.password, form.show_password),
        ));
        lines.push(field(
            SignUpField::Confirm,
            "Confirm",
            mask(&form.confirm, form.show_password),
        ));
        let checkbox = if form.privacy_accepted { "[x]" } else { "[ ]" };
        lines.push(Line::from(vec![
            label("", form.focus == SignUpField::Privacy),
            Span::styled(
                format!("{} I accept the Privacy policy", checkbox),
                if form.focus == SignUpField::Privacy {
                    Style::default().fg(ACCENT)
                } else {
                    Style::default()
                },
            ),
        ]));
        lines.push(Line::from(""));
        let w = form.warnings;
        lines.extend(warning_line(w.missing, "Please fill in every field."));
        lines.extend(warning_line(w.email, "Please enter a valid email address."));
        lines.extend(warning_line(
            w.short_password,
            "The password needs at least 8 characters.",
        ));
        lines.extend(warning_line(w.mismatch, "Your passwords don't match. Please try again."));
        lines.extend(warning_line(w.privacy, "Please accept the privacy policy."));
    } else {
        let form = &app.login;
        lines.push(Line::from(vec![
            label("Email", form.focus == LoginField::Email),
            Span::raw(form.email.clone()),
            cursor_suffix(form.focus == LoginField::Email, typing),
        ]));
        lines.push(Line::from(vec![
            label("Password", form.focus == LoginField::Password),
            Span::raw(form.masked_password()),
            cursor_suffix(form.focus == LoginField::Password, typing),
        ]));
        lines.push(Line::from(""));
        lines.extend(warning_line(form.warn, "Check your email and password. Please try again."));
        lines.push(Line::from(Span::styled(
            "Not a Join user? Press s to sign up, or g for a guest log in.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = if app.signing_up { " Sign up " } else { " Log in " };
    let popup = centered_rect_absolute(64, 13, area);
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, popup);
}

fn draw_summary(f: &mut Frame, app: &App, area: Rect) {
    let summary = Summary::from_tasks(&app.tasks);
    let now = Local::now();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Length(5),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    let hello = Paragraph::new(Line::from(vec![
        Span::raw(format!("{}, ", greeting(now.hour()))),
        Span::styled(
            app.services.users.display_name(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Join 360 "));
    f.render_widget(hello, rows[0]);

    let stat = |value: usize, name: &'static str| {
        Paragraph::new(vec![
            Line::from(Span::styled(
                value.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(name),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
    };

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(rows[1]);
    f.render_widget(stat(summary.todo, "To-do"), top[0]);
    f.render_widget(stat(summary.done, "Done"), top[1]);

    let urgent = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(rows[2]);
    f.render_widget(stat(summary.urgent, "Urgent"), urgent[0]);
    let deadline = summary
        .next_urgent
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| "No urgent deadline".to_string());
    let deadline = Paragraph::new(vec![
        Line::from(Span::styled(deadline, Style::default().add_modifier(Modifier::BOLD))),
        Line::from("Upcoming Deadline"),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(deadline, urgent[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ]
            .as_ref(),
        )
        .split(rows[3]);
    f.render_widget(stat(summary.total, "Tasks in Board"), bottom[0]);
    f.render_widget(stat(summary.doing, "Tasks in Progress"), bottom[1]);
    f.render_widget(stat(summary.await_feedback, "Awaiting Feedback"), bottom[2]);
}

fn category_style(category: Option<Category>) -> Style {
    let bg = match category {
        Some(Category::UserStory) => Color::Rgb(0x00, 0x38, 0xFF),
        Some(Category::TechnicalTask) => Color::Rgb(0x1F, 0xD7, 0xC1),
        None => Color::DarkGray,
    };
    Style::default().fg(Color::White).bg(bg)
}

fn priority_span(priority: Priority) -> Span<'static> {
    let (symbol, color) = match priority {
        Priority::Low => ("▼", Color::Green),
        Priority::Medium => ("=", Color::Rgb(0xFF, 0xA8, 0x00)),
        Priority::High => ("▲", Color::Red),
    };
    Span::styled(symbol, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn avatar(contacts: &[Contact], id: u64) -> Span<'static> {
    match contacts.iter().find(|c| c.id == id) {
        Some(contact) => Span::styled(
            format!(" {} ", contact.initials()),
            Style::default()
                .fg(Color::White)
                .bg(rgb(profile_color(&contact.id.to_string()).unwrap_or(UNKNOWN_PROFILE))),
        ),
        None => Span::styled(
            " ?? ",
            Style::default().fg(Color::White).bg(rgb(UNKNOWN_PROFILE)),
        ),
    }
}

fn task_card(task: &Task, contacts: &[Contact], width: usize) -> ListItem<'static> {
    let text_width = width.saturating_sub(6).max(8);
    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {} ", task.category_label()),
            category_style(task.category),
        )),
        Line::from(Span::styled(
            truncate(&task.title, text_width),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    if !task.description.is_empty() {
        lines.push(Line::from(Span::styled(
            truncate(&task.description, text_width),
            Style::default().fg(Color::Gray),
        )));
    }
    if !task.subtasks.is_empty() {
        lines.push(Line::from(format!(
            "{}/{} Subtasks",
            task.subtasks_done(),
            task.subtasks.len()
        )));
    }
    let mut footer: Vec<Span<'static>> = task
        .assigned_to
        .iter()
        .map(|&id| avatar(contacts, id))
        .collect();
    footer.push(Span::raw(" "));
    footer.push(priority_span(task.priority));
    lines.push(Line::from(footer));
    lines.push(Line::from(""));
    ListItem::new(lines)
}

fn draw_board(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let searching = app.input_mode == InputMode::Search;
    let search = Paragraph::new(Line::from(vec![
        Span::raw(app.board.search.clone()),
        cursor_suffix(true, searching),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Find Task ({} shown) ", app.board.total()))
            .border_style(if searching {
                Style::default().fg(ACCENT)
            } else {
                Style::default()
            }),
    );
    f.render_widget(search, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4].as_ref())
        .split(rows[1]);

    let contacts = app.contacts();
    for (index, column) in app.board.columns.iter().enumerate() {
        let area = columns[index];
        let active = index == app.column;
        let title = format!(" {} ({}) ", column.name(), column.items.len());
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(if active {
                Style::default().fg(ACCENT)
            } else {
                Style::default()
            });

        if column.items.is_empty() {
            let empty = Paragraph::new(format!("No tasks {}", column.name().to_lowercase()))
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(empty, area);
            continue;
        }

        let items: Vec<ListItem> = column
            .items
            .iter()
            .map(|task| task_card(task, &contacts, area.width as usize))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .highlight_symbol(">> ");
        let mut state = ListState::default();
        if active {
            state.select(Some(app.rows[index]));
        }
        f.render_stateful_widget(list, area, &mut state);
    }
}

fn draw_contacts(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(area);

    let groups = app.services.contacts.groups();
    let mut items: Vec<ListItem> = Vec::new();
    let mut selected_row = None;
    let mut position = 0;
    for (letter, contacts) in &groups {
        items.push(ListItem::new(Line::from(Span::styled(
            letter.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))));
        for contact in contacts {
            if position == app.contact_cursor {
                selected_row = Some(items.len());
            }
            position += 1;
            items.push(ListItem::new(vec![
                Line::from(vec![
                    avatar(std::slice::from_ref(contact), contact.id),
                    Span::raw(format!(" {}", contact.full_name())),
                ]),
                Line::from(Span::styled(
                    format!("     {}", contact.email),
                    Style::default().fg(ACCENT),
                )),
            ]));
        }
    }

    let block = Block::default().borders(Borders::ALL).title(" Contacts ");
    if items.is_empty() {
        let empty = Paragraph::new("No contacts yet. Press a to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, chunks[0]);
    } else {
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .highlight_symbol(">> ");
        let mut state = ListState::default();
        state.select(selected_row);
        f.render_stateful_widget(list, chunks[0], &mut state);
    }

    let detail_block = Block::default()
        .borders(Borders::ALL)
        .title(" Contact Information ");
    match app.selected_contact() {
        Some(contact) => {
            let color = rgb(profile_color(&contact.id.to_string()).unwrap_or(UNKNOWN_PROFILE));
            let lines = vec![
                Line::from(vec![
                    Span::styled(
                        format!("  {}  ", contact.initials()),
                        Style::default()
                            .fg(Color::White)
                            .bg(color)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", contact.full_name()),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(""),
                Line::from(vec![label("Email", false), Span::styled(contact.email.clone(), Style::default().fg(ACCENT))]),
                Line::from(vec![label("Phone", false), Span::raw(contact.phone_number.clone())]),
            ];
            let paragraph = Paragraph::new(lines)
                .block(detail_block)
                .wrap(Wrap { trim: true });
            f.render_widget(paragraph, chunks[1]);
        }
        None => {
            let paragraph = Paragraph::new("Select a contact to see the details")
                .block(detail_block)
                .wrap(Wrap { trim: true });
            f.render_widget(paragraph, chunks[1]);
        }
    }
}

fn task_label(form: &TaskForm, field: TaskField) -> Span<'static> {
    let required = matches!(
        field,
        TaskField::Title | TaskField::DueDate | TaskField::Category
    );
    let text = if required {
        format!("{}*", field.label())
    } else {
        field.label().to_string()
    };
    label(&text, form.focus == field)
}

fn draw_task_form(
    f: &mut Frame,
    area: Rect,
    form: &TaskForm,
    contacts: &[Contact],
    typing: bool,
) {
    let focused = |field: TaskField| form.focus == field;
    let mut lines: Vec<Line<'static>> = Vec::new();

    lines.push(Line::from(vec![
        task_label(form, TaskField::Title),
        Span::raw(form.title.clone()),
        cursor_suffix(focused(TaskField::Title), typing),
    ]));
    lines.extend(warning_line(form.warnings.title, "This field is required"));

    lines.push(Line::from(vec![
        task_label(form, TaskField::Description),
        Span::raw(form.description.clone()),
        cursor_suffix(focused(TaskField::Description), typing),
    ]));

    let due = if form.due.input.is_empty() {
        Span::styled("dd/mm/yyyy", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(form.due.input.clone())
    };
    lines.push(Line::from(vec![
        task_label(form, TaskField::DueDate),
        due,
        cursor_suffix(focused(TaskField::DueDate), typing),
    ]));
    lines.extend(warning_line(
        form.warnings.date || form.due.show_warning,
        "Please enter a valid date that is not in the past",
    ));

    let category = match form.category {
        Some(category) => Span::styled(format!(" {} ", category.label()), category_style(Some(category))),
        None => Span::styled("Select task category", Style::default().fg(Color::DarkGray)),
    };
    lines.push(Line::from(vec![task_label(form, TaskField::Category), category]));
    lines.extend(warning_line(form.warnings.category, "This field is required"));

    let mut priorities = vec![task_label(form, TaskField::Priority)];
    for priority in Priority::ALL {
        let style = if priority == form.priority {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        priorities.push(Span::styled(format!(" {} ", priority.label()), style));
        priorities.push(priority_span(priority));
        priorities.push(Span::raw(" "));
    }
    lines.push(Line::from(priorities));

    lines.push(Line::from(task_label(form, TaskField::Assigned)));
    if contacts.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("{:13}No contacts available", ""),
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (index, contact) in contacts.iter().enumerate() {
        let mark = if form.assigned.contains(&contact.id) { "[x]" } else { "[ ]" };
        let pointer = if focused(TaskField::Assigned) && index == form.contact_cursor {
            ">> "
        } else {
            "   "
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{:10}{}{} ", "", pointer, mark)),
            avatar(contacts, contact.id),
            Span::raw(format!(" {}", contact.full_name())),
        ]));
    }

    let editing = match form.editing_subtask {
        Some(_) => "Edit subtask",
        None => "Add subtask",
    };
    lines.push(Line::from(vec![
        task_label(form, TaskField::Subtasks),
        Span::styled(format!("{}: ", editing), Style::default().fg(Color::DarkGray)),
        Span::raw(form.subtask_input.clone()),
        cursor_suffix(focused(TaskField::Subtasks), typing),
    ]));
    for (index, subtask) in form.subtasks.iter().enumerate() {
        let mark = if subtask.done { "[x]" } else { "[ ]" };
        let pointer = if focused(TaskField::Subtasks) && index == form.subtask_cursor {
            ">> "
        } else {
            "   "
        };
        lines.push(Line::from(format!("{:10}{}{} {}", "", pointer, mark, subtask.title)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{:13}Status: {}    * required", "", form.status.label()),
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(if form.is_edit() { " Edit Task " } else { " Add Task " }),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);

    if form.due.open {
        draw_calendar(f, form, area);
    }
}

fn draw_calendar(f: &mut Frame, form: &TaskForm, area: Rect) {
    let picker = &form.due;
    let popup = centered_rect_absolute(30, 12, area);
    let mut lines: Vec<Line<'static>> = vec![Line::from(
        DAY_NAMES
            .iter()
            .map(|d| Span::styled(format!("{:>3} ", d), Style::default().add_modifier(Modifier::BOLD)))
            .collect::<Vec<_>>(),
    )];

    let mut week: Vec<Span<'static>> = Vec::new();
    for day in picker.grid() {
        let span = match day {
            None => Span::raw("    "),
            Some(day) => {
                let mut style = Style::default();
                if picker.is_past(day.date) {
                    style = style.fg(Color::DarkGray);
                }
                if day.is_today {
                    style = style.fg(ACCENT).add_modifier(Modifier::BOLD);
                }
                if day.is_selected {
                    style = style.bg(ACCENT).fg(Color::Black);
                }
                if day.date == picker.cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Span::styled(format!("{:>3} ", day.date.day()), style)
            }
        };
        week.push(span);
        if week.len() == 7 {
            lines.push(Line::from(std::mem::take(&mut week)));
        }
    }
    if !week.is_empty() {
        lines.push(Line::from(week));
    }

    let title = format!(" {} ", picker.month.format("%B %Y"));
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_bottom(" [ ] month  t today ")
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
    };
    let row = |key: &'static str, text: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<8}", key), Style::default().fg(Color::Red)),
            Span::raw(text),
        ])
    };
    let lines = vec![
        Line::from("Join is a kanban-based task manager for small teams."),
        Line::from(""),
        section("Everywhere"),
        row("1-5", "Summary, Board, Contacts, Add Task, Help"),
        row("r", "Reload tasks and contacts"),
        row("O", "Log out"),
        row("Ctrl+x", "Dismiss the current message"),
        row("q", "Quit"),
        Line::from(""),
        section("Board"),
        row("h/l", "Select column"),
        row("j/k", "Select task"),
        row("H/L", "Move the task to the previous or next column"),
        row("m", "Move the task to any column"),
        row("J/K", "Reorder inside the column"),
        row("A", "Quick add: !low !medium !urgent set the priority, #story #tech the category"),
        row("/", "Search titles and descriptions"),
        Line::from(""),
        section("Forms"),
        row("i", "Start typing in the focused field"),
        row("Tab", "Next field"),
        row("x", "Clear the due date (on the due date field)"),
        row("w", "Save"),
        row("Esc", "Stop typing or cancel"),
        Line::from(""),
        row("p", "Privacy policy and legal notice"),
    ];
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn draw_legal(f: &mut Frame, area: Rect) {
    let heading = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
    };
    let lines = vec![
        heading("Privacy Policy"),
        Line::from("Join stores the data you enter to run your board: your name, email address and password,"),
        Line::from("the contacts you add and the tasks you create. It is used for nothing else."),
        Line::from("Your session token is saved locally so you stay logged in; logging out removes it."),
        Line::from("You may ask the operator of your Join server to export or delete your data at any time."),
        Line::from(""),
        heading("Legal Notice"),
        Line::from("Join is a learning project and comes without any warranty."),
        Line::from("The operator of the server you connect to is responsible for the data kept there."),
        Line::from("Tasks and contacts are entered by users; their content is not reviewed."),
    ];
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Privacy & Legal "))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn draw_task_detail(f: &mut Frame, app: &App, task: &Task, subtask: usize, area: Rect) {
    let contacts = app.contacts();
    let popup = centered_rect_absolute(area.width.min(70), area.height.min(24), area);
    let mut lines: Vec<Line<'static>> = vec![
        Line::from(Span::styled(
            format!(" {} ", task.category_label()),
            category_style(task.category),
        )),
        Line::from(""),
        Line::from(Span::styled(
            task.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    if task.description.is_empty() {
        lines.push(Line::from(Span::styled(
            "No description",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(task.description.clone()));
    }
    lines.push(Line::from(""));

    let due = task
        .due_date
        .map(format_display)
        .unwrap_or_else(|| "No due date".to_string());
    lines.push(Line::from(vec![label("Due date:", false), Span::raw(due)]));
    lines.push(Line::from(vec![
        label("Priority:", false),
        Span::raw(format!("{} ", task.priority.label())),
        priority_span(task.priority),
    ]));
    lines.push(Line::from(vec![label("Status:", false), Span::raw(task.status.label())]));

    lines.push(Line::from(label("Assigned To:", false)));
    if task.assigned_to.is_empty() {
        lines.push(Line::from(Span::styled("  Nobody", Style::default().fg(Color::DarkGray))));
    }
    for &id in &task.assigned_to {
        let name = contacts
            .iter()
            .find(|c| c.id == id)
            .map(Contact::full_name)
            .unwrap_or_else(|| "Unknown contact".to_string());
        lines.push(Line::from(vec![
            Span::raw("  "),
            avatar(&contacts, id),
            Span::raw(format!(" {}", name)),
        ]));
    }

    lines.push(Line::from(label("Subtasks", false)));
    if task.subtasks.is_empty() {
        lines.push(Line::from(Span::styled("  None", Style::default().fg(Color::DarkGray))));
    }
    for (index, item) in task.subtasks.iter().enumerate() {
        let mark = if item.done { "[x]" } else { "[ ]" };
        let style = if index == subtask {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let pointer = if index == subtask { ">> " } else { "   " };
        lines.push(Line::from(Span::styled(
            format!("{}{} {}", pointer, mark, item.title),
            style,
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Task "))
        .wrap(Wrap { trim: true });
    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn draw_contact_form(f: &mut Frame, form: &ContactForm, typing: bool, area: Rect) {
    let popup = centered_rect_absolute(60, 12, area);
    let title = if form.is_edit() { " Edit contact " } else { " Add contact " };
    let field = |field: ContactField, name: &str, value: &str| {
        let focused = form.focus == field;
        Line::from(vec![
            label(name, focused),
            Span::raw(value.to_string()),
            cursor_suffix(focused, typing),
        ])
    };
    let initials = form.live_initials();
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("  {}  ", if initials.is_empty() { "?".to_string() } else { initials }),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            ),
            Span::styled(
                if form.is_edit() { "" } else { "  Tasks are better with a team!" },
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
        field(ContactField::Name, "Name", &form.full_name),
    ];
    lines.extend(warning_line(form.warnings.name, "Please enter a name"));
    lines.push(field(ContactField::Email, "Email", &form.email));
    lines.extend(warning_line(form.warnings.email, "Please enter a valid email address"));
    lines.push(field(ContactField::Phone, "Phone", &form.phone));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn draw_confirm(f: &mut Frame, question: String, area: Rect) {
    let popup = centered_rect_absolute(50, 5, area);
    let paragraph = Paragraph::new(vec![
        Line::from(question),
        Line::from(Span::styled("y: delete   n: keep", Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Delete ")
            .style(Style::default().fg(Color::Red)),
    );
    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn calculate_wrapped_lines(text: &str, max_width: u16) -> usize {
    let max_width = max_width.max(1);
    let mut line_count = 0;
    for line in text.lines() {
        let line_width = line.chars().count() as u16;
        line_count += line_width.div_ceil(max_width).max(1) as usize;
    }
    line_count
}

fn draw_modal(f: &mut Frame, app: &App, area: Rect) {
    match &app.modal {
        Modal::None => {}
        Modal::TaskDetail { task, subtask } => draw_task_detail(f, app, task, *subtask, area),
        Modal::TaskForm(form) => {
            let popup = centered_rect_absolute(area.width.min(80), area.height, area);
            draw_task_form(
                f,
                popup,
                form,
                &app.contacts(),
                app.input_mode == InputMode::Insert,
            );
        }
        Modal::MoveTo { id, cursor } => {
            let from = app
                .board
                .columns
                .iter()
                .find(|c| c.items.iter().any(|t| t.id == *id))
                .map(|c| c.status)
                .unwrap_or(Status::Todo);
            let items: Vec<ListItem> = app
                .board
                .others(from)
                .into_iter()
                .map(|name| ListItem::new(name))
                .collect();
            let popup = centered_rect_absolute(30, 5, area);
            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title(" Move to "))
                .highlight_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
                .highlight_symbol(">> ");
            let mut state = ListState::default();
            state.select(Some(*cursor));
            f.render_widget(Clear, popup);
            f.render_stateful_widget(list, popup, &mut state);
        }
        Modal::ConfirmDeleteTask(id) => {
            let title = app
                .tasks
                .iter()
                .find(|t| t.id == *id)
                .map(|t| truncate(&t.title, 24))
                .unwrap_or_default();
            draw_confirm(f, format!("Delete task \"{}\"?", title), area);
        }
        Modal::ContactForm(form) => {
            draw_contact_form(f, form, app.input_mode == InputMode::Insert, area)
        }
        Modal::ConfirmDeleteContact(id) => {
            let name = app
                .services
                .contacts
                .get_by_id(*id)
                .map(|c| c.full_name())
                .unwrap_or_default();
            draw_confirm(f, format!("Delete contact \"{}\"?", name), area);
        }
        Modal::QuickAdd(text) => {
            let popup_width = (area.width / 10 * 6).saturating_sub(2);
            let lines_required = calculate_wrapped_lines(text, popup_width).max(1) as u16;
            let popup_height = (lines_required + 2).min(area.height.saturating_sub(2));
            let popup = centered_rect_absolute(popup_width + 2, popup_height, area);
            let title = format!(" New task in {} (Enter to create) ", app.current_status().label());
            let input = Paragraph::new(text.as_str())
                .style(Style::default().fg(Color::White))
                .block(
                    Block::default()
                        .title(title)
                        .borders(Borders::ALL)
                        .style(Style::default().fg(Color::Green)),
                )
                .wrap(Wrap { trim: false });
            f.render_widget(Clear, popup);
            f.render_widget(input, popup);
        }
    }
}

fn draw_toast(f: &mut Frame, app: &App, area: Rect) {
    let Some(notification) = app.services.notifications.current() else {
        return;
    };
    let color = match notification.kind {
        NotificationType::Success => Color::Green,
        NotificationType::Error => Color::Red,
        NotificationType::Warning => Color::Yellow,
    };
    let width = (notification.message.chars().count() as u16 + 4).min(area.width);
    let rect = corner_rect(notification.position, width, 3, area);
    let toast = Paragraph::new(notification.to_string())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .style(Style::default().fg(color));
    f.render_widget(Clear, rect);
    f.render_widget(toast, rect);
}
