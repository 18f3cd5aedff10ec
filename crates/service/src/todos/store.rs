use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use configs::OnCorrupt;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapFile;
use crate::todos::id::{IdGenerator, UuidV4};
use crate::todos::model::{NewTodo, Todo, TodoMap};
use crate::todos::repository::TodoRepository;

const MAX_ID_ATTEMPTS: usize = 8;

/// Map and file handle live under one lock: a mutation and the save that
/// mirrors it happen without any other operation in between.
struct Inner {
    todos: TodoMap,
    file: JsonMapFile<String, Todo>,
}

/// In-memory todo set mirrored to a single JSON file.
///
/// Built once at startup and shared behind an `Arc`. `create` and `clear`
/// persist before returning; when persistence fails the in-memory change is
/// kept and the error is returned, so the caller knows the state is not durable.
pub struct TodoStore {
    inner: Mutex<Inner>,
    ids: Box<dyn IdGenerator>,
    file_path: PathBuf,
}

impl TodoStore {
    /// Load the store from `path` using random UUID ids.
    pub async fn open<P: Into<PathBuf>>(
        path: P,
        on_corrupt: OnCorrupt,
    ) -> Result<Arc<Self>, ServiceError> {
        Self::open_with_ids(path, on_corrupt, UuidV4).await
    }

    /// Load the store from `path`, minting ids with `ids`.
    ///
    /// A missing or empty file gives an empty store. A file that cannot be
    /// decoded is handled according to `on_corrupt`.
    pub async fn open_with_ids<P, G>(
        path: P,
        on_corrupt: OnCorrupt,
        ids: G,
    ) -> Result<Arc<Self>, ServiceError>
    where
        P: Into<PathBuf>,
        G: IdGenerator + 'static,
    {
        let file = JsonMapFile::<String, Todo>::new(path);
        let file_path = file.path().to_path_buf();

        let todos = match file.load().await.and_then(|raw| reconcile_ids(&file_path, raw)) {
            Ok(todos) => todos,
            Err(e) if e.is_corrupt() => match on_corrupt {
                OnCorrupt::Abort => return Err(e),
                OnCorrupt::Discard => {
                    let moved = file.quarantine().await?;
                    warn!(
                        path = %file_path.display(),
                        moved_to = %moved.display(),
                        error = %e,
                        "data file is corrupt; moved aside and starting empty"
                    );
                    TodoMap::new()
                }
            },
            Err(e) => return Err(e),
        };

        info!(path = %file_path.display(), count = todos.len(), "todo store loaded");
        Ok(Arc::new(Self {
            inner: Mutex::new(Inner { todos, file }),
            ids: Box::new(ids),
            file_path,
        }))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Assign a fresh id, insert the todo and persist the whole map.
    #[instrument(skip_all)]
    pub async fn create(&self, input: NewTodo) -> Result<Todo, ServiceError> {
        let mut inner = self.inner.lock().await;

        let id = self.fresh_id(&inner.todos)?;
        let todo = input.into_todo(id.clone());
        inner.todos.insert(id.clone(), todo.clone());

        inner.file.save(&inner.todos).await?;
        info!(%id, count = inner.todos.len(), "todo created");
        Ok(todo)
    }

    /// Owned snapshot of every todo.
    pub async fn list(&self) -> TodoMap {
        self.inner.lock().await.todos.clone()
    }

    /// Remove every todo and truncate the data file.
    #[instrument(skip_all)]
    pub async fn clear(&self) -> Result<(), ServiceError> {
        let mut inner = self.inner.lock().await;
        let removed = inner.todos.len();
        inner.todos.clear();

        inner.file.wipe().await?;
        info!(removed, "todos cleared");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.todos.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn fresh_id(&self, taken: &TodoMap) -> Result<String, ServiceError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !id.is_empty() && !taken.contains_key(&id) {
                return Ok(id);
            }
            warn!(%id, "generated id unusable, drawing again");
        }
        Err(ServiceError::IdExhausted(MAX_ID_ATTEMPTS))
    }
}

/// Fill ids missing from on-disk records and reject records filed under a
/// key other than their own id.
fn reconcile_ids(path: &Path, raw: TodoMap) -> Result<TodoMap, ServiceError> {
    raw.into_iter()
        .map(|(key, mut todo)| {
            if todo.id.is_empty() {
                todo.id = key.clone();
            } else if todo.id != key {
                return Err(ServiceError::corrupt(
                    path,
                    format!("record under key {key:?} carries id {:?}", todo.id),
                ));
            }
            Ok((key, todo))
        })
        .collect()
}

#[async_trait]
impl TodoRepository for TodoStore {
    async fn create(&self, input: NewTodo) -> Result<Todo, ServiceError> {
        self.create(input).await
    }

    async fn list(&self) -> TodoMap {
        self.list().await
    }

    async fn clear(&self) -> Result<(), ServiceError> {
        self.clear().await
    }
}
