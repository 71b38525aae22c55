use serde::Serialize;

/// User-facing event produced by a state mutation. The front end renders
/// these as toasts; the CLI prints them with the matching icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Info,
    Milestone,
    Achievement,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Notification { kind: NotificationKind::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notification { kind: NotificationKind::Info, message: message.into() }
    }

    pub fn milestone(message: impl Into<String>) -> Self {
        Notification { kind: NotificationKind::Milestone, message: message.into() }
    }

    pub fn achievement(message: impl Into<String>) -> Self {
        Notification { kind: NotificationKind::Achievement, message: message.into() }
    }

    pub fn icon(&self) -> &'static str {
        match self.kind {
            NotificationKind::Success => "✅",
            NotificationKind::Info => "ℹ️",
            NotificationKind::Milestone => "🥳",
            NotificationKind::Achievement => "🏆",
        }
    }
}
