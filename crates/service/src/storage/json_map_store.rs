use std::{
    collections::HashMap,
    ffi::OsString,
    hash::Hash,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use tokio::{fs, io::AsyncWriteExt};
use tracing::debug;

use crate::errors::ServiceError;

/// Generic JSON file mirror for a `HashMap<K, V>`.
///
/// The whole map is written on every save; there are no deltas. The handle
/// does no locking of its own, so callers must serialize access (the todo
/// store keeps it behind the same mutex as the map it mirrors).
#[derive(Debug)]
pub struct JsonMapFile<K, V> {
    file_path: PathBuf,
    _entries: PhantomData<fn() -> (K, V)>,
}

impl<K, V> JsonMapFile<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned,
    V: serde::Serialize + serde::de::DeserializeOwned,
{
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), _entries: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read the file back into a map.
    ///
    /// A missing file or one holding only whitespace is an empty map. Anything
    /// else that is not a JSON object of `K -> V` is `CorruptState`.
    pub async fn load(&self) -> Result<HashMap<K, V>, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.file_path.display(), "data file missing, starting empty");
                return Ok(HashMap::new());
            }
            Err(e) => return Err(ServiceError::io(&self.file_path, e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(HashMap::new());
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::corrupt(&self.file_path, e.to_string()))
    }

    /// Serialize the entire map and replace the file with it.
    ///
    /// The document is written to `<file>.tmp`, synced, then renamed over the
    /// target so a concurrent reader sees either the old or the new content.
    pub async fn save(&self, map: &HashMap<K, V>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(map)?;
        self.ensure_parent().await?;

        let tmp = self.sibling(".tmp");
        if let Err(e) = write_synced(&tmp, &data).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::io(&tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::io(&self.file_path, e));
        }

        debug!(
            path = %self.file_path.display(),
            bytes = data.len(),
            entries = map.len(),
            "saved map"
        );
        Ok(())
    }

    /// Truncate the file to zero length, creating it if needed.
    pub async fn wipe(&self) -> Result<(), ServiceError> {
        self.ensure_parent().await?;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.file_path)
            .await
            .map_err(|e| ServiceError::io(&self.file_path, e))?;
        debug!(path = %self.file_path.display(), "wiped data file");
        Ok(())
    }

    /// Move the current file aside as `<file>.corrupt-<UTC timestamp>` and
    /// return the new location.
    pub async fn quarantine(&self) -> Result<PathBuf, ServiceError> {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let target = self.sibling(&format!(".corrupt-{stamp}"));
        fs::rename(&self.file_path, &target)
            .await
            .map_err(|e| ServiceError::io(&self.file_path, e))?;
        Ok(target)
    }

    async fn ensure_parent(&self) -> Result<(), ServiceError> {
        match self.file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::io(parent, e)),
            _ => Ok(()),
        }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = OsString::from(self.file_path.as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    }
}

async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    Ok(())
}
