use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::todos::model::{NewTodo, Todo, TodoMap};

/// Trait abstraction for todo storage as seen by the HTTP layer.
/// The file-backed [`TodoStore`](crate::todos::TodoStore) is the production implementation.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn create(&self, input: NewTodo) -> Result<Todo, ServiceError>;
    async fn list(&self) -> TodoMap;
    async fn clear(&self) -> Result<(), ServiceError>;
}
