//! Todo records: the data model, id minting, and the file-mirrored store.

pub mod id;
pub mod model;
pub mod repository;
pub mod store;

pub use id::{IdGenerator, UuidV4};
pub use model::{NewTodo, Todo, TodoMap};
pub use repository::TodoRepository;
pub use store::TodoStore;
