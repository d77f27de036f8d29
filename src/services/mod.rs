pub mod contacts;
pub mod notification;
pub mod tasks;
pub mod user;

use crate::api::{AuthApi, ContactApi, TaskApi};
use crate::config::{Config, SessionStore};
use std::sync::Arc;

pub use contacts::ContactsService;
pub use notification::NotificationService;
pub use tasks::TasksService;
pub use user::UserService;

/// One instance of every service, shared by all pages.
pub struct Services {
    pub tasks: Arc<TasksService>,
    pub contacts: Arc<ContactsService>,
    pub users: UserService,
    pub notifications: NotificationService,
}

impl Services {
    pub fn new<A>(api: Arc<A>, session: SessionStore, config: &Config) -> Self
    where
        A: TaskApi + ContactApi + AuthApi + 'static,
    {
        let guest = config
            .guest_credentials()
            .map(|(email, password)| (email.to_string(), password.to_string()));
        Services {
            tasks: Arc::new(TasksService::new(api.clone())),
            contacts: Arc::new(ContactsService::new(api.clone())),
            users: UserService::new(api, session, guest),
            notifications: NotificationService::new(
                config.notification_duration(),
                config.notification_position,
            ),
        }
    }
}

#[cfg(test)]
pub mod fake {
    use crate::api::{AuthApi, ContactApi, TaskApi};
    use crate::error::{JoinError, JoinResult};
    use crate::models::{Contact, ContactPatch, Registration, Status, Task, TaskPatch, User};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    struct FakeState {
        tasks: Vec<Task>,
        contacts: Vec<Contact>,
        patches: Vec<(u64, TaskPatch)>,
        token: Option<String>,
        list_calls: usize,
    }

    /// In-memory stand-in for the REST backend.
    #[derive(Default)]
    pub struct FakeBackend {
        state: Mutex<FakeState>,
        failing: AtomicBool,
    }

    impl FakeBackend {
        pub const EMAIL: &'static str = "ada@example.com";
        pub const PASSWORD: &'static str = "correct-horse";

        pub fn with_tasks(tasks: Vec<Task>) -> Self {
            let backend = FakeBackend::default();
            backend.state().tasks = tasks;
            backend
        }

        pub fn with_contacts(contacts: Vec<Contact>) -> Self {
            let backend = FakeBackend::default();
            backend.state().contacts = contacts;
            backend
        }

        pub fn task(id: u64, title: &str, status: Status) -> Task {
            Task {
                id,
                title: title.to_string(),
                status,
                ..Default::default()
            }
        }

        pub fn contact(id: u64, first_name: &str, last_name: &str) -> Contact {
            Contact {
                id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: format!("{}@example.com", first_name.to_lowercase()),
                phone_number: String::new(),
            }
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn patches(&self) -> Vec<(u64, TaskPatch)> {
            self.state().patches.clone()
        }

        pub fn tasks(&self) -> Vec<Task> {
            self.state().tasks.clone()
        }

        pub fn contacts(&self) -> Vec<Contact> {
            self.state().contacts.clone()
        }

        pub fn token(&self) -> Option<String> {
            self.state().token.clone()
        }

        pub fn list_calls(&self) -> usize {
            self.state().list_calls
        }

        fn state(&self) -> MutexGuard<'_, FakeState> {
            self.state.lock().unwrap()
        }

        fn check(&self) -> JoinResult<()> {
            if self.failing.load(Ordering::SeqCst) {
                Err(JoinError::Status {
                    status: 500,
                    body: "Internal Server Error".to_string(),
                })
            } else {
                Ok(())
            }
        }

        fn not_found() -> JoinError {
            JoinError::Status {
                status: 404,
                body: "{\"detail\":\"Not found.\"}".to_string(),
            }
        }

        fn user(first_name: &str, last_name: &str, email: &str) -> User {
            User {
                id: 1,
                token: format!("token-{}", email),
                username: email.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
            }
        }
    }

    fn apply(task: &mut Task, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = description.clone();
        }
        if let Some(category) = patch.category {
            task.category = category;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if patch.due_date.is_some() {
            task.due_date = patch.due_date;
        }
        if let Some(assigned) = &patch.assigned_to {
            task.assigned_to = assigned.clone();
        }
        if let Some(subtasks) = &patch.subtasks {
            task.subtasks = subtasks.clone();
        }
    }

    #[async_trait]
    impl TaskApi for FakeBackend {
        async fn list_tasks(&self) -> JoinResult<Vec<Task>> {
            self.state().list_calls += 1;
            self.check()?;
            Ok(self.state().tasks.clone())
        }

        async fn get_task(&self, id: u64) -> JoinResult<Task> {
            self.check()?;
            self.state()
                .tasks
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .ok_or_else(FakeBackend::not_found)
        }

        async fn create_task(&self, task: &Task) -> JoinResult<Task> {
            self.check()?;
            let mut state = self.state();
            let id = state.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
            let created = Task { id, ..task.clone() };
            state.tasks.push(created.clone());
            Ok(created)
        }

        async fn patch_task(&self, id: u64, patch: &TaskPatch) -> JoinResult<Task> {
            self.check()?;
            let mut state = self.state();
            state.patches.push((id, patch.clone()));
            let task = state
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(FakeBackend::not_found)?;
            apply(task, patch);
            Ok(task.clone())
        }

        async fn delete_task(&self, id: u64) -> JoinResult<()> {
            self.check()?;
            self.state().tasks.retain(|t| t.id != id);
            Ok(())
        }
    }

    #[async_trait]
    impl ContactApi for FakeBackend {
        async fn list_contacts(&self) -> JoinResult<Vec<Contact>> {
            self.check()?;
            Ok(self.state().contacts.clone())
        }

        async fn create_contact(&self, contact: &Contact) -> JoinResult<Contact> {
            self.check()?;
            let mut state = self.state();
            let id = state.contacts.iter().map(|c| c.id).max().unwrap_or(0) + 1;
            let created = Contact {
                id,
                ..contact.clone()
            };
            state.contacts.push(created.clone());
            Ok(created)
        }

        async fn patch_contact(&self, id: u64, patch: &ContactPatch) -> JoinResult<Contact> {
            self.check()?;
            let mut state = self.state();
            let contact = state
                .contacts
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(FakeBackend::not_found)?;
            if let Some(v) = &patch.first_name {
                contact.first_name = v.clone();
            }
            if let Some(v) = &patch.last_name {
                contact.last_name = v.clone();
            }
            if let Some(v) = &patch.email {
                contact.email = v.clone();
            }
            if let Some(v) = &patch.phone_number {
                contact.phone_number = v.clone();
            }
            Ok(contact.clone())
        }

        async fn delete_contact(&self, id: u64) -> JoinResult<()> {
            self.check()?;
            self.state().contacts.retain(|c| c.id != id);
            Ok(())
        }
    }

    #[async_trait]
    impl AuthApi for FakeBackend {
        async fn login(&self, email: &str, password: &str) -> JoinResult<User> {
            self.check()?;
            if email == FakeBackend::EMAIL && password == FakeBackend::PASSWORD {
                Ok(FakeBackend::user("Ada", "Lovelace", email))
            } else {
                Err(JoinError::Status {
                    status: 401,
                    body: "Unable to log in with provided credentials.".to_string(),
                })
            }
        }

        async fn register(&self, registration: &Registration<'_>) -> JoinResult<User> {
            self.check()?;
            Ok(FakeBackend::user(
                registration.first_name,
                registration.last_name,
                registration.email,
            ))
        }

        async fn logout(&self) -> JoinResult<()> {
            self.check()
        }

        fn set_token(&self, token: Option<String>) {
            self.state().token = token;
        }
    }
}
