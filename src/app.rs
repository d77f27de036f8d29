use crate::board::Board;
use crate::forms::{ContactForm, FormInput, LoginForm, SignUpField, SignUpForm, TaskField, TaskForm};
use crate::models::{Contact, ContactPatch, Status, Task, TaskPatch};
use crate::parser::parse_task_input;
use crate::routes::{guard, Guard, Page};
use crate::services::contacts::split_full_name;
use crate::services::Services;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{error, info, warn};
use std::io;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const SIGN_UP_PHONE_PLACEHOLDER: &str = "No phone number added yet";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Insert,
    Search,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Modal {
    None,
    TaskDetail { task: Task, subtask: usize },
    TaskForm(TaskForm),
    MoveTo { id: u64, cursor: usize },
    ConfirmDeleteTask(u64),
    ContactForm(ContactForm),
    ConfirmDeleteContact(u64),
    QuickAdd(String),
}

enum FormAction {
    Stay,
    Insert,
    Save,
    Cancel,
}

pub struct App {
    pub services: Services,
    pub page: Page,
    pub input_mode: InputMode,
    pub modal: Modal,
    pub board: Board,
    pub tasks: Vec<Task>,
    pub column: usize,
    pub rows: [usize; 4],
    pub task_form: TaskForm,
    pub contact_cursor: usize,
    pub login: LoginForm,
    pub signup: SignUpForm,
    pub signing_up: bool,
    pub today: NaiveDate,
    poll_every: Duration,
    poller: Option<JoinHandle<()>>,
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
    }
}

impl App {
    pub fn new(services: Services, poll_every: Duration, today: NaiveDate) -> App {
        App {
            services,
            page: Page::Login,
            input_mode: InputMode::Normal,
            modal: Modal::None,
            board: Board::new(),
            tasks: Vec::new(),
            column: 0,
            rows: [0; 4],
            task_form: TaskForm::new(Status::Todo, today),
            contact_cursor: 0,
            login: LoginForm::default(),
            signup: SignUpForm::default(),
            signing_up: false,
            today,
            poll_every,
            poller: None,
        }
    }

    /// Resumes a saved session, if any; otherwise stays on the login page.
    pub async fn start(&mut self) {
        if self.services.users.restore().is_some() {
            self.begin_session().await;
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }

    pub fn current_status(&self) -> Status {
        Status::ALL[self.column]
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.board.task(self.current_status(), self.rows[self.column])
    }

    pub fn contacts(&self) -> Vec<Contact> {
        self.services.contacts.all()
    }

    pub fn selected_contact(&self) -> Option<Contact> {
        self.contacts().into_iter().nth(self.contact_cursor)
    }

    /// Picks up task list changes published by the poller and enforces the login guard.
    pub fn sync(&mut self) {
        if !self.services.users.is_logged_in() {
            if self.page.requires_auth() {
                self.page = Page::Login;
                self.modal = Modal::None;
            }
            return;
        }
        let tasks = self.services.tasks.snapshot();
        if tasks != self.tasks {
            let selected = self.selected_task().map(|t| t.id);
            self.tasks = tasks;
            self.board.rebuild(&self.tasks);
            match selected {
                Some(id) => self.select_task_id(id),
                None => self.clamp_rows(),
            }
        }
    }

    fn clamp_rows(&mut self) {
        for (index, column) in self.board.columns.iter().enumerate() {
            self.rows[index] = self.rows[index].min(column.items.len().saturating_sub(1));
        }
        let contacts = self.contacts().len();
        self.contact_cursor = self.contact_cursor.min(contacts.saturating_sub(1));
    }

    fn select_task_id(&mut self, id: u64) {
        self.clamp_rows();
        for (index, column) in self.board.columns.iter().enumerate() {
            if let Some(row) = column.items.iter().position(|t| t.id == id) {
                self.column = index;
                self.rows[index] = row;
                return;
            }
        }
    }

    pub fn navigate(&mut self, target: Page) {
        match guard(target, self.services.users.is_logged_in()) {
            Guard::Allow(page) => {
                self.page = page;
                self.modal = Modal::None;
            }
            Guard::Redirect => {
                self.page = Page::Login;
                self.services.notifications.warning("Please log in first.");
            }
        }
    }

    async fn begin_session(&mut self) {
        if let Err(err) = self.services.tasks.refresh().await {
            if err.is_unauthorized() {
                warn!("event=session status=expired");
                self.end_session().await;
                self.services.notifications.warning("Please log in first.");
                return;
            }
            self.services.notifications.error("Could not load tasks!");
        }
        if let Err(err) = self.services.contacts.refresh().await {
            error!("event=contacts_load status=error error={}", err);
        }
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
        self.poller = Some(self.services.tasks.spawn_polling(self.poll_every));
        self.login = LoginForm::default();
        self.signup = SignUpForm::default();
        self.signing_up = false;
        self.page = Page::Summary;
        self.sync();
    }

    async fn end_session(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
        self.services.users.logout().await;
        self.tasks.clear();
        self.board.rebuild(&[]);
        self.rows = [0; 4];
        self.column = 0;
        self.contact_cursor = 0;
        self.task_form = TaskForm::new(Status::Todo, self.today);
        self.modal = Modal::None;
        self.input_mode = InputMode::Normal;
        self.page = Page::Login;
    }

    async fn refresh(&mut self) {
        let tasks = self.services.tasks.refresh().await;
        let contacts = self.services.contacts.refresh().await;
        if tasks.is_err() || contacts.is_err() {
            self.services.notifications.error("Could not reach the server!");
        }
        self.sync();
    }

    pub async fn handle_input(&mut self, key: KeyEvent) -> io::Result<bool> {
        if key.kind != KeyEventKind::Press {
            return Ok(false);
        }
        match self.input_mode {
            InputMode::Insert => {
                self.handle_insert(key).await;
                return Ok(false);
            }
            InputMode::Search => {
                self.handle_search(key);
                return Ok(false);
            }
            InputMode::Normal => {}
        }

        if self.modal != Modal::None {
            self.handle_modal(key).await;
            return Ok(false);
        }

        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Char('x') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.services.notifications.dismiss();
                return Ok(false);
            }
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.navigate(Page::NAV[index]);
                return Ok(false);
            }
            KeyCode::Char('?') => {
                self.navigate(Page::Help);
                return Ok(false);
            }
            KeyCode::Char('O') if self.services.users.is_logged_in() => {
                self.end_session().await;
                return Ok(false);
            }
            KeyCode::Char('r') if self.services.users.is_logged_in() => {
                self.refresh().await;
                return Ok(false);
            }
            _ => {}
        }

        match self.page {
            Page::Login => self.handle_login(key.code).await,
            Page::Summary => {
                if key.code == KeyCode::Enter {
                    self.navigate(Page::Board);
                }
            }
            Page::Board => self.handle_board(key.code).await,
            Page::Contacts => self.handle_contacts(key.code),
            Page::AddTask => self.handle_task_form(key.code).await,
            Page::Help if key.code == KeyCode::Char('p') => self.navigate(Page::Legal),
            Page::Help | Page::Legal => {
                if key.code == KeyCode::Esc {
                    let back = if self.services.users.is_logged_in() {
                        Page::Summary
                    } else {
                        Page::Login
                    };
                    self.navigate(back);
                }
            }
        }
        Ok(false)
    }

    fn active_form(&mut self) -> Option<&mut dyn FormInput> {
        match &mut self.modal {
            Modal::TaskForm(form) => return Some(form as &mut dyn FormInput),
            Modal::ContactForm(form) => return Some(form as &mut dyn FormInput),
            Modal::None => {}
            _ => return None,
        }
        match self.page {
            Page::AddTask => Some(&mut self.task_form as &mut dyn FormInput),
            Page::Login if self.signing_up => Some(&mut self.signup as &mut dyn FormInput),
            Page::Login => Some(&mut self.login as &mut dyn FormInput),
            _ => None,
        }
    }

    fn active_task_form(&mut self) -> Option<&mut TaskForm> {
        match &mut self.modal {
            Modal::TaskForm(form) => Some(form),
            Modal::None if self.page == Page::AddTask => Some(&mut self.task_form),
            _ => None,
        }
    }

    async fn handle_insert(&mut self, key: KeyEvent) {
        if let Modal::QuickAdd(text) = &mut self.modal {
            match key.code {
                KeyCode::Enter => {
                    let text = std::mem::take(text);
                    self.modal = Modal::None;
                    self.input_mode = InputMode::Normal;
                    self.quick_add(&text).await;
                }
                KeyCode::Esc => {
                    self.modal = Modal::None;
                    self.input_mode = InputMode::Normal;
                }
                KeyCode::Char(c) => text.push(c),
                KeyCode::Backspace => {
                    text.pop();
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => {
                if let Some(form) = self.active_task_form() {
                    if form.focus == TaskField::Subtasks {
                        form.commit_subtask();
                        return;
                    }
                }
                self.input_mode = InputMode::Normal;
                if self.page == Page::Login && self.modal == Modal::None {
                    self.submit_login().await;
                }
            }
            code => match self.active_form() {
                Some(form) => match code {
                    KeyCode::Char(c) => form.push_char(c),
                    KeyCode::Backspace => form.pop_char(),
                    KeyCode::Tab => form.next_field(),
                    KeyCode::BackTab => form.prev_field(),
                    _ => {}
                },
                None => self.input_mode = InputMode::Normal,
            },
        }
    }

    fn handle_search(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.input_mode = InputMode::Normal,
            KeyCode::Esc => {
                self.board.search.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Char(c) => self.board.search.push(c),
            KeyCode::Backspace => {
                self.board.search.pop();
            }
            _ => return,
        }
        self.board.rebuild(&self.tasks);
        self.clamp_rows();
    }

    async fn handle_login(&mut self, code: KeyCode) {
        match code {
            KeyCode::Tab | KeyCode::Char('j') | KeyCode::Down => self.login_form().next_field(),
            KeyCode::BackTab | KeyCode::Char('k') | KeyCode::Up => self.login_form().prev_field(),
            KeyCode::Char('i') => {
                if self.login_form().input().is_some() {
                    self.input_mode = InputMode::Insert;
                }
            }
            KeyCode::Char(' ') if self.signing_up && self.signup.focus == SignUpField::Privacy => {
                self.signup.toggle_privacy();
            }
            KeyCode::Char('v') => {
                if self.signing_up {
                    self.signup.toggle_password();
                } else {
                    self.login.toggle_password();
                }
            }
            KeyCode::Char('s') => self.signing_up = !self.signing_up,
            KeyCode::Char('g') => self.guest_login().await,
            KeyCode::Char('p') => self.navigate(Page::Legal),
            KeyCode::Enter => self.submit_login().await,
            KeyCode::Esc if self.signing_up => self.signing_up = false,
            _ => {}
        }
    }

    fn login_form(&mut self) -> &mut dyn FormInput {
        if self.signing_up {
            &mut self.signup
        } else {
            &mut self.login
        }
    }

    async fn submit_login(&mut self) {
        if self.signing_up {
            self.sign_up().await;
            return;
        }
        if !self.login.validate() {
            return;
        }
        let email = self.login.email.clone();
        let password = self.login.password.clone();
        match self.services.users.login(&email, &password).await {
            Ok(_) => self.begin_session().await,
            Err(_) => self.login.warn = true,
        }
    }

    async fn sign_up(&mut self) {
        if !self.signup.validate() {
            return;
        }
        let form = self.signup.clone();
        if let Err(err) = self
            .services
            .users
            .register(&form.name, &form.email, &form.password)
            .await
        {
            error!("event=sign_up status=error error={}", err);
            self.services.notifications.error("Error creating your account!");
            return;
        }
        self.begin_session().await;
        let (first_name, last_name) = split_full_name(&form.name);
        let contact = Contact {
            id: 0,
            first_name,
            last_name,
            email: form.email.trim().to_string(),
            phone_number: SIGN_UP_PHONE_PLACEHOLDER.to_string(),
        };
        match self.services.contacts.add(&contact).await {
            Ok(_) => self
                .services
                .notifications
                .success("Your account was created successfully!"),
            Err(_) => self
                .services
                .notifications
                .error("Error adding contact for your User Account!"),
        }
    }

    async fn guest_login(&mut self) {
        match self.services.users.login_guest().await {
            Ok(_) => self.begin_session().await,
            Err(err) => {
                error!("event=guest_login status=error error={}", err);
                self.services
                    .notifications
                    .error("Error adding Guest Account!");
            }
        }
    }

    async fn handle_board(&mut self, code: KeyCode) {
        let len = self.board.columns[self.column].items.len();
        match code {
            KeyCode::Char('h') | KeyCode::Left => self.column = self.column.saturating_sub(1),
            KeyCode::Char('l') | KeyCode::Right => self.column = (self.column + 1).min(3),
            KeyCode::Char('j') | KeyCode::Down => {
                if len > 0 {
                    self.rows[self.column] = (self.rows[self.column] + 1) % len;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if len > 0 {
                    self.rows[self.column] = (self.rows[self.column] + len - 1) % len;
                }
            }
            KeyCode::Char('J') => {
                let row = self.rows[self.column];
                if row + 1 < len {
                    self.board.move_within(self.current_status(), row, row + 1);
                    self.rows[self.column] = row + 1;
                }
            }
            KeyCode::Char('K') => {
                let row = self.rows[self.column];
                if row > 0 {
                    self.board.move_within(self.current_status(), row, row - 1);
                    self.rows[self.column] = row - 1;
                }
            }
            KeyCode::Char('H') => {
                if self.column > 0 {
                    self.move_selected(Status::ALL[self.column - 1]).await;
                }
            }
            KeyCode::Char('L') => {
                if self.column < 3 {
                    self.move_selected(Status::ALL[self.column + 1]).await;
                }
            }
            KeyCode::Char('m') => {
                if let Some(task) = self.selected_task() {
                    self.modal = Modal::MoveTo {
                        id: task.id,
                        cursor: 0,
                    };
                }
            }
            KeyCode::Enter => self.open_task_detail().await,
            KeyCode::Char('e') => {
                if let Some(task) = self.selected_task() {
                    self.modal = Modal::TaskForm(TaskForm::edit(task, self.today));
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_task() {
                    self.modal = Modal::ConfirmDeleteTask(task.id);
                }
            }
            KeyCode::Char('a') => {
                self.task_form.status = self.current_status();
                self.navigate(Page::AddTask);
            }
            KeyCode::Char('A') => {
                self.modal = Modal::QuickAdd(String::new());
                self.input_mode = InputMode::Insert;
            }
            KeyCode::Char('/') => self.input_mode = InputMode::Search,
            _ => {}
        }
    }

    /// Moves the selected task to another column and tells the server about it.
    async fn move_selected(&mut self, to: Status) {
        let from = self.current_status();
        let row = self.rows[self.column];
        let at = self.board.column(to).items.len();
        let Some((id, patch)) = self.board.transfer(from, row, to, at) else {
            return;
        };
        self.column = to.index();
        self.rows[self.column] = at;
        self.clamp_rows();
        match self.services.tasks.update(id, &patch).await {
            Ok(()) => {
                info!("event=task_move status=ok id={} to={:?}", id, to);
                self.sync();
                self.select_task_id(id);
            }
            Err(_) => {
                self.services.notifications.error("Failed to update task!");
                self.board.rebuild(&self.tasks);
                self.select_task_id(id);
            }
        }
    }

    async fn open_task_detail(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id) else {
            return;
        };
        match self.services.tasks.get(id).await {
            Ok(task) => self.modal = Modal::TaskDetail { task, subtask: 0 },
            Err(err) => {
                error!("event=task_detail status=error id={} error={}", id, err);
                self.services.notifications.error("Could not load task!");
            }
        }
    }

    fn find_task(&self, id: u64) -> Option<Task> {
        self.services
            .tasks
            .snapshot()
            .into_iter()
            .find(|t| t.id == id)
    }

    async fn handle_modal(&mut self, key: KeyEvent) {
        match &mut self.modal {
            Modal::TaskForm(_) => self.handle_task_form(key.code).await,
            Modal::ContactForm(_) => self.handle_contact_form(key.code).await,
            Modal::TaskDetail { task, subtask } => match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    if !task.subtasks.is_empty() {
                        *subtask = (*subtask + 1) % task.subtasks.len();
                    }
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    if !task.subtasks.is_empty() {
                        *subtask = (*subtask + task.subtasks.len() - 1) % task.subtasks.len();
                    }
                }
                KeyCode::Char(' ') | KeyCode::Char('x') => {
                    let (task, index) = (task.clone(), *subtask);
                    self.toggle_subtask(task, index).await;
                }
                KeyCode::Char('e') => {
                    self.modal = Modal::TaskForm(TaskForm::edit(task, self.today));
                }
                KeyCode::Char('d') => self.modal = Modal::ConfirmDeleteTask(task.id),
                KeyCode::Esc | KeyCode::Char('q') => self.modal = Modal::None,
                _ => {}
            },
            Modal::MoveTo { id, cursor } => {
                let id = *id;
                let from = self
                    .board
                    .columns
                    .iter()
                    .find(|c| c.items.iter().any(|t| t.id == id))
                    .map(|c| c.status)
                    .unwrap_or(Status::Todo);
                let targets: Vec<Status> =
                    Status::ALL.iter().copied().filter(|&s| s != from).collect();
                match key.code {
                    KeyCode::Char('j') | KeyCode::Down => *cursor = (*cursor + 1) % targets.len(),
                    KeyCode::Char('k') | KeyCode::Up => {
                        *cursor = (*cursor + targets.len() - 1) % targets.len()
                    }
                    KeyCode::Enter => {
                        let to = targets[*cursor];
                        self.modal = Modal::None;
                        self.select_task_id(id);
                        self.move_selected(to).await;
                    }
                    KeyCode::Esc | KeyCode::Char('q') => self.modal = Modal::None,
                    _ => {}
                }
            }
            Modal::ConfirmDeleteTask(id) => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    let id = *id;
                    self.modal = Modal::None;
                    match self.services.tasks.delete(id).await {
                        Ok(()) => self
                            .services
                            .notifications
                            .success("Task deleted successfully!"),
                        Err(_) => self.services.notifications.error("Failed to delete task!"),
                    }
                    self.sync();
                }
                KeyCode::Char('n') | KeyCode::Esc => self.modal = Modal::None,
                _ => {}
            },
            Modal::ConfirmDeleteContact(id) => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    let id = *id;
                    self.modal = Modal::None;
                    match self.services.contacts.delete(id).await {
                        Ok(()) => self
                            .services
                            .notifications
                            .success("Contact deleted successfully!"),
                        Err(_) => self.services.notifications.error("Error deleting Contact!"),
                    }
                    self.clamp_rows();
                }
                KeyCode::Char('n') | KeyCode::Esc => self.modal = Modal::None,
                _ => {}
            },
            Modal::QuickAdd(_) => {
                if key.code == KeyCode::Esc {
                    self.modal = Modal::None;
                } else {
                    self.input_mode = InputMode::Insert;
                }
            }
            Modal::None => {}
        }
    }

    async fn toggle_subtask(&mut self, task: Task, index: usize) {
        let mut subtasks = task.subtasks.clone();
        let Some(subtask) = subtasks.get_mut(index) else {
            return;
        };
        subtask.done = !subtask.done;
        match self
            .services
            .tasks
            .update(task.id, &TaskPatch::subtasks(subtasks))
            .await
        {
            Ok(()) => {
                if let Some(fresh) = self.find_task(task.id) {
                    self.modal = Modal::TaskDetail {
                        task: fresh,
                        subtask: index,
                    };
                }
                self.sync();
            }
            Err(_) => self.services.notifications.error("Failed to update task!"),
        }
    }

    async fn quick_add(&mut self, text: &str) {
        let parsed = parse_task_input(text);
        if parsed.title.is_empty() {
            self.services
                .notifications
                .warning("Task title cannot be empty.");
            return;
        }
        let task = Task {
            title: parsed.title,
            priority: parsed.priority.unwrap_or_default(),
            category: parsed.category,
            status: self.current_status(),
            ..Default::default()
        };
        match self.services.tasks.add(&task).await {
            Ok(created) => {
                self.services
                    .notifications
                    .success("Task created successfully!");
                self.sync();
                self.select_task_id(created.id);
            }
            Err(_) => self.services.notifications.error("Failed to save task!"),
        }
    }

    async fn handle_task_form(&mut self, code: KeyCode) {
        let contacts = self.contacts();
        let Some(form) = self.active_task_form() else {
            return;
        };
        match task_form_key(form, &contacts, code) {
            FormAction::Stay => {}
            FormAction::Insert => self.input_mode = InputMode::Insert,
            FormAction::Save => self.save_task_form().await,
            FormAction::Cancel => match &self.modal {
                Modal::TaskForm(form) => {
                    let id = form.id.unwrap_or(0);
                    self.modal = match self.find_task(id) {
                        Some(task) => Modal::TaskDetail { task, subtask: 0 },
                        None => Modal::None,
                    };
                }
                _ => self.task_form.reset(),
            },
        }
    }

    async fn save_task_form(&mut self) {
        if let Modal::TaskForm(form) = &mut self.modal {
            let Some(task) = form.to_task() else {
                return;
            };
            match self
                .services
                .tasks
                .update(task.id, &TaskPatch::from_task(&task))
                .await
            {
                Ok(()) => {
                    self.services
                        .notifications
                        .success("Task updated successfully!");
                    let fresh = self.find_task(task.id).unwrap_or(task);
                    self.modal = Modal::TaskDetail {
                        task: fresh,
                        subtask: 0,
                    };
                    self.sync();
                }
                Err(_) => self.services.notifications.error("Failed to update task!"),
            }
            return;
        }

        let Some(task) = self.task_form.to_task() else {
            return;
        };
        match self.services.tasks.add(&task).await {
            Ok(created) => {
                self.services
                    .notifications
                    .success("Task created successfully!");
                self.task_form = TaskForm::new(Status::Todo, self.today);
                self.navigate(Page::Board);
                self.sync();
                self.select_task_id(created.id);
            }
            Err(_) => self.services.notifications.error("Failed to save task!"),
        }
    }

    fn handle_contacts(&mut self, code: KeyCode) {
        let len = self.contacts().len();
        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                if len > 0 {
                    self.contact_cursor = (self.contact_cursor + 1) % len;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if len > 0 {
                    self.contact_cursor = (self.contact_cursor + len - 1) % len;
                }
            }
            KeyCode::Char('a') => self.modal = Modal::ContactForm(ContactForm::new()),
            KeyCode::Char('e') => {
                if let Some(contact) = self.selected_contact() {
                    self.modal = Modal::ContactForm(ContactForm::edit(&contact));
                }
            }
            KeyCode::Char('d') => {
                if let Some(contact) = self.selected_contact() {
                    self.modal = Modal::ConfirmDeleteContact(contact.id);
                }
            }
            _ => {}
        }
    }

    async fn handle_contact_form(&mut self, code: KeyCode) {
        let Modal::ContactForm(form) = &mut self.modal else {
            return;
        };
        match code {
            KeyCode::Tab | KeyCode::Char('j') | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Char('k') | KeyCode::Up => form.prev_field(),
            KeyCode::Char('i') => self.input_mode = InputMode::Insert,
            KeyCode::Esc | KeyCode::Char('q') => self.modal = Modal::None,
            KeyCode::Char('w') | KeyCode::Enter => self.save_contact_form().await,
            _ => {}
        }
    }

    async fn save_contact_form(&mut self) {
        let Modal::ContactForm(form) = &mut self.modal else {
            return;
        };
        let editing = form.is_edit();
        let Some(contact) = form.to_contact() else {
            return;
        };
        let contacts = &self.services.contacts;
        let notifications = &self.services.notifications;
        let saved = if editing {
            let result = contacts
                .update(contact.id, &ContactPatch::from_contact(&contact))
                .await;
            match &result {
                Ok(()) => notifications.success("Contact updated successfully!"),
                Err(_) => notifications.error("Error updating Contact!"),
            }
            result.map(|_| contact.id)
        } else {
            let result = contacts.add(&contact).await;
            match &result {
                Ok(_) => notifications.success("Contact added successfully!"),
                Err(_) => notifications.error("Error adding Contact!"),
            }
            result.map(|created| created.id)
        };
        if let Ok(id) = saved {
            self.modal = Modal::None;
            if let Some(index) = self.contacts().iter().position(|c| c.id == id) {
                self.contact_cursor = index;
            }
        }
    }
}

/// Normal-mode keys of the task form, shared by the Add Task page and the edit modal.
fn task_form_key(form: &mut TaskForm, contacts: &[Contact], code: KeyCode) -> FormAction {
    if form.due.open {
        match code {
            KeyCode::Char('h') | KeyCode::Left => form.due.move_cursor(-1),
            KeyCode::Char('l') | KeyCode::Right => form.due.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => form.due.move_cursor(-7),
            KeyCode::Char('j') | KeyCode::Down => form.due.move_cursor(7),
            KeyCode::Char('[') => form.due.prev_month(),
            KeyCode::Char(']') => form.due.next_month(),
            KeyCode::Char('t') => {
                form.due.set_today();
                form.clear_warning(TaskField::DueDate);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                form.due.select_cursor();
                form.clear_warning(TaskField::DueDate);
            }
            KeyCode::Esc => form.due.open = false,
            _ => {}
        }
        return FormAction::Stay;
    }

    match (form.focus, code) {
        (_, KeyCode::Char('w')) => return FormAction::Save,
        (_, KeyCode::Esc) => return FormAction::Cancel,
        (_, KeyCode::Tab) => form.next_field(),
        (_, KeyCode::BackTab) => form.prev_field(),
        (TaskField::Assigned, KeyCode::Char('j') | KeyCode::Down) => {
            if !contacts.is_empty() {
                form.contact_cursor = (form.contact_cursor + 1) % contacts.len();
            }
        }
        (TaskField::Assigned, KeyCode::Char('k') | KeyCode::Up) => {
            if !contacts.is_empty() {
                form.contact_cursor = (form.contact_cursor + contacts.len() - 1) % contacts.len();
            }
        }
        (TaskField::Assigned, KeyCode::Char(' ') | KeyCode::Enter) => {
            if let Some(contact) = contacts.get(form.contact_cursor) {
                form.toggle_contact(contact.id);
            }
        }
        (TaskField::Subtasks, KeyCode::Char('j') | KeyCode::Down) => {
            if !form.subtasks.is_empty() {
                form.subtask_cursor = (form.subtask_cursor + 1) % form.subtasks.len();
            }
        }
        (TaskField::Subtasks, KeyCode::Char('k') | KeyCode::Up) => {
            if !form.subtasks.is_empty() {
                let len = form.subtasks.len();
                form.subtask_cursor = (form.subtask_cursor + len - 1) % len;
            }
        }
        (TaskField::Subtasks, KeyCode::Char(' ')) => form.toggle_subtask(form.subtask_cursor),
        (TaskField::Subtasks, KeyCode::Char('x') | KeyCode::Delete) => {
            form.delete_subtask(form.subtask_cursor)
        }
        (TaskField::Subtasks, KeyCode::Char('e')) => {
            if form.subtask_cursor < form.subtasks.len() {
                form.edit_subtask(form.subtask_cursor);
                return FormAction::Insert;
            }
        }
        (TaskField::Subtasks, KeyCode::Char('i') | KeyCode::Enter) => return FormAction::Insert,
        (TaskField::Category, KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ')) => {
            form.cycle_category(true)
        }
        (TaskField::Category, KeyCode::Char('h') | KeyCode::Left) => form.cycle_category(false),
        (TaskField::Priority, KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ')) => {
            form.cycle_priority(true)
        }
        (TaskField::Priority, KeyCode::Char('h') | KeyCode::Left) => form.cycle_priority(false),
        (TaskField::DueDate, KeyCode::Enter | KeyCode::Char(' ')) => form.due.toggle(),
        (TaskField::DueDate, KeyCode::Char('t')) => {
            form.due.set_today();
            form.clear_warning(TaskField::DueDate);
        }
        (TaskField::DueDate, KeyCode::Char('i')) => return FormAction::Insert,
        (TaskField::DueDate, KeyCode::Char('x') | KeyCode::Delete) => form.due.reset(),
        (_, KeyCode::Char('j') | KeyCode::Down) => form.next_field(),
        (_, KeyCode::Char('k') | KeyCode::Up) => form.prev_field(),
        (_, KeyCode::Char('i') | KeyCode::Enter) => {
            if form.input().is_some() {
                return FormAction::Insert;
            }
        }
        (_, KeyCode::Char('c')) => form.reset(),
        _ => {}
    }
    FormAction::Stay
}
