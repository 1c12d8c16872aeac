use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use blog_core::ports::{ImageStorage, StorageError};

use super::upload_url;

/// Images stored as plain files under one directory.
#[derive(Debug)]
pub struct LocalImageStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalImageStorage {
    /// Root storage at `root`, creating the directory if necessary.
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        tracing::info!(dir = %root.display(), "Image storage ready");
        Ok(Self {
            root,
            public_base_url: public_base_url.into(),
        })
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(name);
        let single_file = relative.components().count() == 1
            && matches!(relative.components().next(), Some(Component::Normal(_)));
        if !single_file {
            return Err(StorageError::Io(format!("invalid image name `{name}`")));
        }
        Ok(self.root.join(relative))
    }
}

fn io_err(err: std::io::Error) -> StorageError {
    match err.kind() {
        ErrorKind::PermissionDenied | ErrorKind::StorageFull => {
            StorageError::Unavailable(err.to_string())
        }
        _ => StorageError::Io(err.to_string()),
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn put(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let target = self.resolve(name)?;
        // Write beside the target and rename, so readers never see a partial file.
        let staging = self.root.join(format!(".{name}.part"));

        let mut file = fs::File::create(&staging).await.map_err(io_err)?;
        if let Err(err) = file.write_all(bytes).await {
            drop(file);
            let _ = fs::remove_file(&staging).await;
            return Err(io_err(err));
        }
        file.flush().await.map_err(io_err)?;
        drop(file);

        fs::rename(&staging, &target).await.map_err(io_err)?;
        tracing::debug!(image = name, size = bytes.len(), "Image written");
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.resolve(name)?;
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_err(err)),
        }
    }

    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.resolve(name)?;
        fs::try_exists(path).await.map_err(io_err)
    }

    fn public_url(&self, name: &str) -> String {
        upload_url(&self.public_base_url, name)
    }
}
