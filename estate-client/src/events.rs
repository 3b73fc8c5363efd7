use crate::error::ApiError;
use crate::shell::Route;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Everything the lower layers need the user interface to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Notice(Notice),
    Navigate(Route),
}

pub type EventReceiver = mpsc::UnboundedReceiver<AppEvent>;

pub fn channel() -> (Notifier, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Notifier { tx }, rx)
}

/// Sending half handed to the client and controllers.
///
/// A closed receiver means the screen is gone, so send failures are dropped.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl Notifier {
    pub fn info(&self, message: impl Into<String>) {
        self.notice(NoticeLevel::Info, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notice(NoticeLevel::Error, message.into());
    }

    /// Shows the user-facing text of `err`, if it has one.
    pub fn report(&self, err: &ApiError) {
        if let Some(message) = err.notice() {
            self.error(message);
        }
    }

    pub fn navigate(&self, route: Route) {
        let _ = self.tx.send(AppEvent::Navigate(route));
    }

    fn notice(&self, level: NoticeLevel, message: String) {
        let _ = self.tx.send(AppEvent::Notice(Notice { level, message }));
    }
}
