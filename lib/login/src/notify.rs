//! Attempt notices for an external presentation layer.
//!
//! The login core renders nothing itself. Each resolved attempt is
//! reported through the [`Notifier`] port and whatever sits behind it
//! (a toast surface, a CLI printer) decides how to show it.

use std::sync::Mutex;

/// Severity of an attempt notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A user-facing report of one resolved login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptNotice {
    kind: NoticeKind,
    message: String,
}

impl AttemptNotice {
    /// Creates a success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// Creates an error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    /// Returns the severity of this notice.
    #[must_use]
    pub fn kind(&self) -> NoticeKind {
        self.kind
    }

    /// Returns the message to show the user.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Presentation port for resolved login attempts.
pub trait Notifier: Send + Sync {
    /// Delivers one notice. Must not block on user interaction.
    fn notify(&self, notice: AttemptNotice);
}

/// A notifier that records every notice it receives, in order.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<AttemptNotice>>,
}

impl RecordingNotifier {
    /// Creates an empty recording notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the notices received so far.
    #[must_use]
    pub fn notices(&self) -> Vec<AttemptNotice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: AttemptNotice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_keeps_notices_in_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(AttemptNotice::error("first"));
        notifier.notify(AttemptNotice::success("second"));

        let notices = notifier.notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].kind(), NoticeKind::Error);
        assert_eq!(notices[0].message(), "first");
        assert_eq!(notices[1].kind(), NoticeKind::Success);
        assert_eq!(notices[1].message(), "second");
    }
}
