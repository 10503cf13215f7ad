//! JSON file helpers shared by the file-backed stores
//!
//! Reads treat a missing file as the default value. Writes go to a sibling
//! temp file which is synced and then renamed over the target, so a reader
//! sees either the previous contents or the new ones.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{Error, Result};

/// Read and parse `path`, or return `T::default()` if it does not exist yet
pub async fn read_json_or_default<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match fs::read(path).await {
        Ok(bytes) => {
            debug!("Read {} bytes from {}", bytes.len(), path.display());
            serde_json::from_slice(&bytes).map_err(|err| {
                warn!("Invalid JSON in {}: {}", path.display(), err);
                Error::malformed(path, err)
            })
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("{} does not exist yet, using empty state", path.display());
            Ok(T::default())
        }
        Err(err) => Err(Error::unavailable(path, err)),
    }
}

/// Serialize `value` as pretty JSON and atomically replace `path` with it
pub async fn write_json_atomic<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');

    ensure_parent_dir(path).await?;

    let temp_path = temp_path_for(path);
    if let Err(err) = write_synced(&temp_path, &bytes).await {
        discard(&temp_path).await;
        return Err(Error::unavailable(path, err));
    }

    if let Err(err) = fs::rename(&temp_path, path).await {
        discard(&temp_path).await;
        return Err(Error::unavailable(path, err));
    }

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

async fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    match fs::metadata(parent).await {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!("Creating directory {}", parent.display());
            fs::create_dir_all(parent)
                .await
                .map_err(|err| Error::unavailable(parent, err))
        }
        Err(err) => Err(Error::unavailable(parent, err)),
    }
}

/// `<dir>/<name>.tmp.<pid>.<nonce>` so concurrent writers never share a temp file
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("store.json"));
    name.push(format!(
        ".tmp.{}.{}",
        std::process::id(),
        Uuid::new_v4().simple()
    ));
    path.with_file_name(name)
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    Ok(())
}

async fn discard(temp_path: &Path) {
    if let Err(err) = fs::remove_file(temp_path).await {
        if err.kind() != ErrorKind::NotFound {
            warn!(
                "Failed to remove temp file {}: {}",
                temp_path.display(),
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_reads_as_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");

        let values: Vec<u32> = read_json_or_default(&path).await.unwrap();
        assert!(values.is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn invalid_json_is_malformed_storage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "[{\"id\": ").unwrap();

        let result: Result<Vec<u32>> = read_json_or_default(&path).await;
        match result.unwrap_err() {
            Error::MalformedStorage { path: reported, .. } => assert_eq!(reported, path),
            e => panic!("Expected MalformedStorage error, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn write_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("deeper").join("data.json");

        write_json_atomic(&path, &vec![1u32, 2, 3]).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let values: Vec<u32> = serde_json::from_str(&content).unwrap();
        assert_eq!(values, vec![1, 2, 3]);
        assert!(content.ends_with('\n'));
    }

    #[tokio::test]
    async fn write_replaces_contents_and_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");

        write_json_atomic(&path, &vec![1u32]).await.unwrap();
        write_json_atomic(&path, &vec![7u32, 8]).await.unwrap();

        let values: Vec<u32> = read_json_or_default(&path).await.unwrap();
        assert_eq!(values, vec![7, 8]);

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![OsString::from("data.json")]);
    }

    #[tokio::test]
    async fn parent_that_is_a_file_is_storage_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("data.json");

        let result = write_json_atomic(&path, &vec![1u32]).await;
        match result.unwrap_err() {
            Error::StorageUnavailable { .. } => {}
            e => panic!("Expected StorageUnavailable error, got: {:?}", e),
        }
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            Err(serde::ser::Error::custom("refusing to serialize"))
        }
    }

    fn dir_entries(dir: &Path) -> Vec<OsString> {
        let mut entries: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        entries.sort();
        entries
    }

    #[tokio::test]
    async fn failed_serialization_keeps_previous_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");
        write_json_atomic(&path, &vec![4u32, 5]).await.unwrap();
        let before = std::fs::read(&path).unwrap();

        match write_json_atomic(&path, &Unserializable).await.unwrap_err() {
            Error::Serialization(_) => {}
            e => panic!("Expected Serialization error, got: {:?}", e),
        }

        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert_eq!(dir_entries(temp_dir.path()), vec![OsString::from("data.json")]);
    }

    #[tokio::test]
    async fn failed_rename_discards_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep.txt"), "untouched").unwrap();

        match write_json_atomic(&path, &vec![1u32]).await.unwrap_err() {
            Error::StorageUnavailable { path: reported, .. } => assert_eq!(reported, path),
            e => panic!("Expected StorageUnavailable error, got: {:?}", e),
        }

        assert_eq!(dir_entries(temp_dir.path()), vec![OsString::from("data.json")]);
        assert_eq!(
            std::fs::read_to_string(path.join("keep.txt")).unwrap(),
            "untouched"
        );
    }

    #[test]
    fn temp_path_is_a_sibling() {
        let path = Path::new("/data/tasks.json");
        let temp = temp_path_for(path);
        assert_eq!(temp.parent(), path.parent());
        assert!(temp
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("tasks.json.tmp."));
    }
}
