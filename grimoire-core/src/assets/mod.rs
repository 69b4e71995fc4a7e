//! Cover image asset store
//!
//! Uploaded covers are decoded, scaled to a fixed width, re-encoded as JPEG and
//! written under `images/` through a [`StorageProvider`]. The returned
//! [`AssetRef`] is the public URL the image is served from.

use crate::error::{CatalogError, Result, StorageError};
use crate::storage::StorageProvider;
use crate::types::AssetRef;
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Storage prefix (and URL segment) for cover images
pub const IMAGE_DIR: &str = "images";

/// Width covers are scaled to
pub const COVER_WIDTH: u32 = 400;

/// JPEG quality covers are encoded with
pub const JPEG_QUALITY: u8 = 80;

const MAX_STEM_LEN: usize = 64;

/// Binary asset storage with publicly addressable references
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Transform and persist raw upload bytes, returning the stored reference
    async fn store(&self, data: Vec<u8>, original_name: &str) -> Result<AssetRef>;

    /// Remove a stored asset. Deleting an asset that is already gone succeeds.
    async fn delete(&self, asset: &AssetRef) -> Result<()>;
}

/// [`AssetStore`] for cover images backed by a [`StorageProvider`]
pub struct ImageAssetStore {
    storage: Arc<dyn StorageProvider>,
    public_base: String,
    width: u32,
    quality: u8,
}

impl ImageAssetStore {
    /// Create a store that publishes images under `<public_base>/images/`
    pub fn new(storage: Arc<dyn StorageProvider>, public_base: impl Into<String>) -> Self {
        Self {
            storage,
            public_base: public_base.into().trim_end_matches('/').to_string(),
            width: COVER_WIDTH,
            quality: JPEG_QUALITY,
        }
    }

    /// Override the output width and JPEG quality
    pub fn with_encoding(mut self, width: u32, quality: u8) -> Self {
        self.width = width.max(1);
        self.quality = quality.clamp(1, 100);
        self
    }

    fn storage_path(file_name: &str) -> String {
        format!("{IMAGE_DIR}/{file_name}")
    }

    /// Recover the stored file name from a public reference
    fn file_name<'a>(&self, asset: &'a AssetRef) -> Result<&'a str> {
        let marker = format!("/{IMAGE_DIR}/");
        asset
            .as_str()
            .rsplit_once(marker.as_str())
            .map(|(_, name)| name)
            .filter(|name| !name.is_empty() && !name.contains('/'))
            .ok_or_else(|| CatalogError::NotFound(format!("asset {asset}")))
    }
}

#[async_trait]
impl AssetStore for ImageAssetStore {
    async fn store(&self, data: Vec<u8>, original_name: &str) -> Result<AssetRef> {
        let (width, quality) = (self.width, self.quality);
        let encoded = tokio::task::spawn_blocking(move || transcode_cover(&data, width, quality))
            .await
            .map_err(|e| StorageError::BackendError(format!("image task failed: {e}")))??;

        // The uuid keeps same-named uploads within one millisecond apart
        let file_name = format!(
            "{}-{}-{}.jpg",
            chrono::Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            sanitize_stem(original_name)
        );
        self.storage
            .write(&Self::storage_path(&file_name), encoded)
            .await?;

        tracing::debug!(asset = %file_name, "stored cover image");
        Ok(AssetRef::new(format!(
            "{}/{IMAGE_DIR}/{file_name}",
            self.public_base
        )))
    }

    async fn delete(&self, asset: &AssetRef) -> Result<()> {
        let file_name = self.file_name(asset)?;
        match self.storage.delete(&Self::storage_path(file_name)).await {
            Ok(()) | Err(StorageError::NotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Decode an uploaded image, scale it to `width` and encode it as JPEG
pub fn transcode_cover(data: &[u8], width: u32, quality: u8) -> Result<Vec<u8>> {
    let image = image::load_from_memory(data)
        .map_err(|e| CatalogError::Validation(format!("unreadable image: {e}")))?;

    // Height is unbounded so the aspect ratio decides it
    let resized = image.resize(width, u32::MAX, FilterType::Lanczos3);

    let mut output = Vec::new();
    DynamicImage::ImageRgb8(resized.to_rgb8())
        .write_with_encoder(JpegEncoder::new_with_quality(&mut output, quality))
        .map_err(|e| StorageError::BackendError(format!("jpeg encoding failed: {e}")))?;
    Ok(output)
}

/// Reduce an uploaded file name to a safe stem
fn sanitize_stem(original_name: &str) -> String {
    let stem = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let cleaned: String = stem
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(MAX_STEM_LEN)
        .collect();

    if cleaned.is_empty() {
        "cover".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use image::{GenericImageView, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_sanitize_stem() {
        assert_eq!(sanitize_stem("my cover  art.png"), "my_cover_art");
        assert_eq!(sanitize_stem("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_stem("???.png"), "cover");
        assert_eq!(sanitize_stem(""), "cover");
    }

    #[test]
    fn test_transcode_scales_to_width() {
        let jpeg = transcode_cover(&png(800, 600), COVER_WIDTH, JPEG_QUALITY).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (400, 300));
    }

    #[test]
    fn test_transcode_rejects_garbage() {
        assert!(matches!(
            transcode_cover(b"not an image", COVER_WIDTH, JPEG_QUALITY),
            Err(CatalogError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_store_and_delete() {
        let storage = Arc::new(MemoryStorage::new());
        let assets = ImageAssetStore::new(storage.clone(), "http://localhost:4000/");

        let asset = assets.store(png(40, 20), "front cover.png").await.unwrap();
        assert!(asset.as_str().starts_with("http://localhost:4000/images/"));
        assert!(asset.as_str().ends_with("-front_cover.jpg"));
        assert_eq!(storage.len().await, 1);

        assets.delete(&asset).await.unwrap();
        assert!(storage.is_empty().await);

        // Already gone
        assets.delete(&asset).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_named_uploads_get_distinct_refs() {
        let storage = Arc::new(MemoryStorage::new());
        let assets = Arc::new(ImageAssetStore::new(storage.clone(), "http://localhost"));

        let mut uploads = tokio::task::JoinSet::new();
        for _ in 0..20 {
            let assets = assets.clone();
            uploads.spawn(async move { assets.store(png(2, 2), "cover.png").await.unwrap() });
        }

        let mut refs = std::collections::HashSet::new();
        while let Some(asset) = uploads.join_next().await {
            refs.insert(asset.unwrap());
        }

        assert_eq!(refs.len(), 20);
        assert_eq!(storage.len().await, 20);
    }

    #[tokio::test]
    async fn test_delete_foreign_reference_fails() {
        let assets = ImageAssetStore::new(Arc::new(MemoryStorage::new()), "http://localhost");
        let err = assets
            .delete(&AssetRef::new("http://elsewhere/cover.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }
}
