#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Login,
    Summary,
    Board,
    Contacts,
    AddTask,
    Help,
    /// Privacy policy and legal notice, readable without an account.
    Legal,
}

impl Page {
    /// Pages reachable from the header, in tab order.
    pub const NAV: [Page; 5] = [
        Page::Summary,
        Page::Board,
        Page::Contacts,
        Page::AddTask,
        Page::Help,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Login => "Log in",
            Page::Summary => "Summary",
            Page::Board => "Board",
            Page::Contacts => "Contacts",
            Page::AddTask => "Add Task",
            Page::Help => "Help",
            Page::Legal => "Privacy & Legal",
        }
    }

    pub fn requires_auth(self) -> bool {
        matches!(
            self,
            Page::Summary | Page::Board | Page::Contacts | Page::AddTask
        )
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Guard {
    Allow(Page),
    /// Navigation refused; show the login page instead.
    Redirect,
}

pub fn guard(target: Page, logged_in: bool) -> Guard {
    if target.requires_auth() && !logged_in {
        Guard::Redirect
    } else {
        Guard::Allow(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_pages_need_login() {
        for page in [Page::Summary, Page::Board, Page::Contacts, Page::AddTask] {
            assert_eq!(guard(page, false), Guard::Redirect);
            assert_eq!(guard(page, true), Guard::Allow(page));
        }
    }

    #[test]
    fn test_public_pages_are_open() {
        assert_eq!(guard(Page::Help, false), Guard::Allow(Page::Help));
        assert_eq!(guard(Page::Login, false), Guard::Allow(Page::Login));
        assert_eq!(guard(Page::Legal, false), Guard::Allow(Page::Legal));
        assert!(!Page::NAV.contains(&Page::Legal));
    }
}
