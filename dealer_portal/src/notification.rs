//! The single modal notification.

/// Success or failure, which decides how the modal is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Content of a modal dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

/// At most one active notification. Showing a new one replaces the old.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationSlot {
    active: Option<Notification>,
}

impl NotificationSlot {
    pub fn show(&mut self, notification: Notification) {
        self.active = Some(notification);
    }

    /// Close the modal, returning what it showed.
    pub fn dismiss(&mut self) -> Option<Notification> {
        self.active.take()
    }

    pub fn active(&self) -> Option<&Notification> {
        self.active.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }
}
