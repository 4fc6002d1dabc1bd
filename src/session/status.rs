use tokio::sync::watch;

/// Observable session status: the single user-visible error slot and the
/// in-flight ("busy") indicator.
///
/// Components write through a cloned handle; observers (UI) subscribe to the
/// watch channels and never write. Only the newest value matters, which is
/// exactly the watch-channel contract.
#[derive(Clone)]
pub struct SessionStatus {
    busy: watch::Sender<bool>,
    error: watch::Sender<Option<String>>,
}

impl SessionStatus {
    pub fn new() -> Self {
        let (busy, _) = watch::channel(false);
        let (error, _) = watch::channel(None);
        Self { busy, error }
    }

    pub fn set_busy(&self, busy: bool) {
        self.busy.send_replace(busy);
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.error.send_replace(Some(message.into()));
    }

    pub fn clear_error(&self) {
        self.error.send_replace(None);
    }

    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    /// Read-only view of the busy indicator.
    pub fn watch_busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    /// Read-only view of the error slot.
    pub fn watch_error(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self::new()
    }
}
