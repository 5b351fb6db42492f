use crate::session::ChatHandle;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Handle to the running chat session
    pub chat: ChatHandle,
}

impl AppState {
    pub fn new(chat: ChatHandle) -> Self {
        Self { chat }
    }
}
