use std::sync::Arc;

use service::todos::TodoRepository;

/// Shared handler state. The store is built once at startup and handed in here;
/// there is no process-global instance.
#[derive(Clone)]
pub struct AppState {
    pub todos: Arc<dyn TodoRepository>,
}

impl AppState {
    pub fn new(todos: Arc<dyn TodoRepository>) -> Self {
        Self { todos }
    }
}
