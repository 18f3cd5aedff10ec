use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A stored todo.
///
/// `id` is written to disk alongside the other fields but may be absent in
/// files that only carry `title`/`contents`; the store fills it from the key.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub contents: String,
}

/// Input for creating a todo. The id is assigned by the store.
///
/// Missing fields default to empty strings; fields of any other JSON type are
/// rejected at deserialization.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTodo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub contents: String,
}

impl NewTodo {
    pub fn new(title: impl Into<String>, contents: impl Into<String>) -> Self {
        Self { title: title.into(), contents: contents.into() }
    }

    pub(crate) fn into_todo(self, id: String) -> Todo {
        Todo { id, title: self.title, contents: self.contents }
    }
}

/// Snapshot of the store, keyed by todo id.
pub type TodoMap = HashMap<String, Todo>;
