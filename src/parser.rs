use crate::models::{Category, Priority};
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, PartialEq)]
pub struct ParsedTask {
    pub title: String,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
}

fn priority_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!(\w+)\s*").expect("static regex"))
}

fn category_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)#(story|userstory|tech|technical)\b\s*").expect("static regex")
    })
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

fn priority_token(token: &str) -> Option<Priority> {
    match token.to_ascii_lowercase().as_str() {
        "1" | "low" => Some(Priority::Low),
        "2" | "medium" => Some(Priority::Medium),
        "3" | "high" | "urgent" => Some(Priority::High),
        _ => None,
    }
}

fn category_token(token: &str) -> Option<Category> {
    match token.to_ascii_lowercase().as_str() {
        "story" | "userstory" => Some(Category::UserStory),
        "tech" | "technical" => Some(Category::TechnicalTask),
        _ => None,
    }
}

/// Quick-add syntax: `!low`..`!urgent` (or `!1`..`!3`) and `#story` / `#tech`.
///
/// The first valid marker of each kind wins; every `!` marker and every
/// recognised `#` marker is stripped from the title.
pub fn parse_task_input(input: &str) -> ParsedTask {
    let priority = priority_re()
        .captures_iter(input)
        .filter_map(|caps| caps.get(1).and_then(|m| priority_token(m.as_str())))
        .next();
    let category = category_re()
        .captures_iter(input)
        .filter_map(|caps| caps.get(1).and_then(|m| category_token(m.as_str())))
        .next();

    let title = priority_re().replace_all(input, "");
    let title = category_re().replace_all(&title, "");
    let title = whitespace_re()
        .replace_all(&title, " ")
        .trim()
        .to_string();

    ParsedTask {
        title,
        priority,
        category,
    }
}
