use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::DynamicImage;
use tokio::fs;

use crate::{
    error::{Result, Vid2DocError},
    provider::ContentStore,
};

/// Writes frames as JPEG files under one root directory.
///
/// Keys may contain `/` to nest files in subdirectories. Every call touches
/// only the file named by its key, so concurrent callers with distinct keys
/// never contend.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn put_frame(&self, key: &str, image: DynamicImage) -> Result<String> {
        let path = self.root.join(key);
        let target = path.clone();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // JPEG has no alpha channel
        tokio::task::spawn_blocking(move || image.to_rgb8().save(&target))
            .await
            .map_err(|e| Vid2DocError::TaskFailed(e.to_string()))??;

        Ok(path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_frame_writes_jpeg_under_nested_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsContentStore::open(dir.path().join("frames")).await.unwrap();

        let handle = store
            .put_frame("section_001/frame_30.00.jpg", DynamicImage::new_rgba8(4, 4))
            .await
            .unwrap();

        let expected = dir
            .path()
            .join("frames")
            .join("section_001")
            .join("frame_30.00.jpg");
        assert_eq!(handle, expected.to_string_lossy());
        let decoded = image::open(&expected).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 4));
    }

    #[tokio::test]
    async fn test_put_frame_overwrites_same_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsContentStore::open(dir.path()).await.unwrap();

        store
            .put_frame("frame_0.00.jpg", DynamicImage::new_rgb8(2, 2))
            .await
            .unwrap();
        let handle = store
            .put_frame("frame_0.00.jpg", DynamicImage::new_rgb8(8, 6))
            .await
            .unwrap();

        let decoded = image::open(handle).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }
}
