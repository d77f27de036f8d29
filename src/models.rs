use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

// Board column a task lives in. Travels as 1..=4.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Status {
    #[default]
    Todo,
    Doing,
    AwaitFeedback,
    Done,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Todo,
        Status::Doing,
        Status::AwaitFeedback,
        Status::Done,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "To do",
            Status::Doing => "In progress",
            Status::AwaitFeedback => "Await feedback",
            Status::Done => "Done",
        }
    }

    /// Position of the column on the board, starting at 0.
    pub fn index(self) -> usize {
        u8::from(self) as usize - 1
    }
}

impl TryFrom<u8> for Status {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Status::Todo),
            2 => Ok(Status::Doing),
            3 => Ok(Status::AwaitFeedback),
            4 => Ok(Status::Done),
            other => Err(format!("unknown task status {}", other)),
        }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        match status {
            Status::Todo => 1,
            Status::Doing => 2,
            Status::AwaitFeedback => 3,
            Status::Done => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "Urgent",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::High),
            other => Err(format!("unknown task priority {}", other)),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> u8 {
        match priority {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    UserStory,
    TechnicalTask,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::UserStory, Category::TechnicalTask];

    pub fn label(self) -> &'static str {
        match self {
            Category::UserStory => "User Story",
            Category::TechnicalTask => "Technical Task",
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Category::UserStory => 1,
            Category::TechnicalTask => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Category> {
        match code {
            1 => Some(Category::UserStory),
            2 => Some(Category::TechnicalTask),
            _ => None,
        }
    }
}

// The backend stores an unset category as 0.
mod category_code {
    use super::Category;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Category>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(value.map(Category::code).unwrap_or(0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Category>, D::Error> {
        let code = Option::<u8>::deserialize(d)?;
        Ok(code.and_then(Category::from_code))
    }
}

// One task with a code this client does not know must not fail the whole list.
fn code_or_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u8> + Default,
{
    let code = Option::<i64>::deserialize(d)?;
    Ok(code
        .and_then(|c| u8::try_from(c).ok())
        .and_then(|c| T::try_from(c).ok())
        .unwrap_or_default())
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

impl Subtask {
    pub fn new(title: impl Into<String>) -> Self {
        Subtask {
            title: title.into(),
            done: false,
        }
    }
}

/// A task record as the backend stores it.
///
/// The id is only ever carried in the URL, so it is never serialized.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, skip_serializing)]
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "category_code")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "code_or_default")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "code_or_default")]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub assigned_to: Vec<u64>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    pub fn subtasks_done(&self) -> usize {
        self.subtasks.iter().filter(|s| s.done).count()
    }

    pub fn category_label(&self) -> &'static str {
        self.category.map(Category::label).unwrap_or("Default Task")
    }

    /// Case-insensitive match against title or description.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }
}

/// Partial update sent with PATCH. Unset fields are left alone by the server.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_category_patch"
    )]
    pub category: Option<Option<Category>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Subtask>>,
}

fn serialize_category_patch<S: Serializer>(
    value: &Option<Option<Category>>,
    s: S,
) -> Result<S::Ok, S::Error> {
    s.serialize_u8(value.flatten().map(Category::code).unwrap_or(0))
}

impl TaskPatch {
    pub fn status(status: Status) -> Self {
        TaskPatch {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn subtasks(subtasks: Vec<Subtask>) -> Self {
        TaskPatch {
            subtasks: Some(subtasks),
            ..Default::default()
        }
    }

    /// Every editable field of `task`, as the edit form sends it.
    pub fn from_task(task: &Task) -> Self {
        TaskPatch {
            title: Some(task.title.clone()),
            description: Some(task.description.clone()),
            category: Some(task.category),
            priority: Some(task.priority),
            status: Some(task.status),
            due_date: task.due_date,
            assigned_to: Some(task.assigned_to.clone()),
            subtasks: Some(task.subtasks.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default, skip_serializing)]
    pub id: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Uppercase first letters of first and last name, e.g. "JD".
    pub fn initials(&self) -> String {
        initials(&self.first_name, &self.last_name)
    }

    /// Letter the contact list groups this contact under; `#` when there is no first name.
    pub fn group_letter(&self) -> String {
        self.first_name
            .trim_start()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "#".to_string())
    }
}

pub fn initials(first_name: &str, last_name: &str) -> String {
    first_name
        .chars()
        .take(1)
        .chain(last_name.chars().take(1))
        .flat_map(char::to_uppercase)
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl ContactPatch {
    pub fn from_contact(contact: &Contact) -> Self {
        ContactPatch {
            first_name: Some(contact.first_name.clone()),
            last_name: Some(contact.last_name.clone()),
            email: Some(contact.email.clone()),
            phone_number: Some(contact.phone_number.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ContactPatch::default()
    }
}

// Authenticated account as returned by login and registration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub token: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if !full.is_empty() {
            full.to_string()
        } else if !self.username.is_empty() {
            self.username.clone()
        } else {
            "Guest".to_string()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct Registration<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NotificationType {
    #[default]
    Success,
    Error,
    Warning,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationPosition {
    #[default]
    TopRight,
    TopLeft,
    BottomLeft,
    BottomRight,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationType,
    pub position: NotificationPosition,
    pub duration: Duration,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_from_backend_json() {
        let raw = json!({
            "id": 7,
            "title": "Write docs",
            "description": "",
            "subtasks": [{"title": "outline", "done": true}, {"title": "draft", "done": false}],
            "priority": 3,
            "category": 2,
            "dueDate": "2026-11-02",
            "assignedTo": [1, 4],
            "status": 3
        });
        let task: Task = serde_json::from_value(raw).unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.category, Some(Category::TechnicalTask));
        assert_eq!(task.status, Status::AwaitFeedback);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 11, 2));
        assert_eq!(task.assigned_to, vec![1, 4]);
        assert_eq!(task.subtasks_done(), 1);
    }

    #[test]
    fn test_unset_category_is_zero_on_the_wire() {
        let task = Task {
            title: "t".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["category"], 0);
        assert_eq!(value["priority"], 2);
        assert_eq!(value["status"], 1);
        assert!(value.get("id").is_none());
        assert!(value.get("dueDate").is_none());

        let back: Task = serde_json::from_value(json!({"title": "t", "category": 0})).unwrap();
        assert_eq!(back.category, None);
        assert_eq!(back.category_label(), "Default Task");
    }

    #[test]
    fn test_unknown_codes_fall_back_to_defaults() {
        let tasks: Vec<Task> = serde_json::from_value(json!([
            {"id": 1, "title": "ok", "status": 2, "priority": 3},
            {"id": 2, "title": "odd", "status": 0, "priority": 9},
            {"id": 3, "title": "null", "status": null, "priority": -1}
        ]))
        .unwrap();
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].status, Status::Doing);
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[1].status, Status::Todo);
        assert_eq!(tasks[1].priority, Priority::Medium);
        assert_eq!(tasks[2].status, Status::Todo);
        assert_eq!(tasks[2].priority, Priority::Medium);
        assert_eq!(Status::try_from(9), Err("unknown task status 9".to_string()));
    }

    #[test]
    fn test_status_patch_only_sends_status() {
        let value = serde_json::to_value(TaskPatch::status(Status::Done)).unwrap();
        assert_eq!(value, json!({"status": 4}));
        assert!(!TaskPatch::status(Status::Done).is_empty());
        assert!(TaskPatch::default().is_empty());
    }

    #[test]
    fn test_full_patch_uses_camel_case() {
        let task = Task {
            id: 3,
            title: "Ship".to_string(),
            category: Some(Category::UserStory),
            due_date: NaiveDate::from_ymd_opt(2027, 1, 9),
            assigned_to: vec![2],
            ..Default::default()
        };
        let value = serde_json::to_value(TaskPatch::from_task(&task)).unwrap();
        assert_eq!(value["dueDate"], "2027-01-09");
        assert_eq!(value["assignedTo"], json!([2]));
        assert_eq!(value["category"], 1);
    }

    #[test]
    fn test_task_matches_search_term() {
        let task = Task {
            title: "Fix Login".to_string(),
            description: "Redirect after SIGN-UP".to_string(),
            ..Default::default()
        };
        assert!(task.matches("login"));
        assert!(task.matches("  sign-up "));
        assert!(task.matches(""));
        assert!(!task.matches("board"));
    }

    #[test]
    fn test_contact_initials_and_group() {
        let contact = Contact {
            first_name: "anna".to_string(),
            last_name: "berg".to_string(),
            ..Default::default()
        };
        assert_eq!(contact.initials(), "AB");
        assert_eq!(contact.group_letter(), "A");
        assert_eq!(contact.full_name(), "anna berg");
        assert_eq!(initials("Cher", ""), "C");
    }

    #[test]
    fn test_contact_json_has_no_id() {
        let contact = Contact {
            id: 12,
            first_name: "Max".to_string(),
            last_name: "Muster".to_string(),
            email: "max@example.com".to_string(),
            phone_number: "123".to_string(),
        };
        let value = serde_json::to_value(&contact).unwrap();
        assert_eq!(
            value,
            json!({"firstName": "Max", "lastName": "Muster", "email": "max@example.com", "phoneNumber": "123"})
        );
    }

    #[test]
    fn test_user_display_name_fallbacks() {
        let mut user = User {
            id: 1,
            token: "abc".to_string(),
            username: "max@example.com".to_string(),
            first_name: "Max".to_string(),
            last_name: "Muster".to_string(),
            email: "max@example.com".to_string(),
        };
        assert_eq!(user.display_name(), "Max Muster");
        user.first_name.clear();
        user.last_name.clear();
        assert_eq!(user.display_name(), "max@example.com");
        user.username.clear();
        assert_eq!(user.display_name(), "Guest");
    }
}
