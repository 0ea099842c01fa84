//! Asset Repository
//!
//! Filesystem-backed blob store for item photos. Blobs land under a root
//! directory and are addressed publicly as `<base_url>/<key>`.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fs;
use std::path::PathBuf;

use super::traits::AssetStore;
use crate::domain::{FeedError, FeedResult};

/// Characters escaped when a key is embedded in a URL path segment
const URL_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'#')
    .add(b'%');

/// Filesystem implementation of the asset store
pub struct AssetRepository {
    root: PathBuf,
    base_url: String,
}

impl AssetRepository {
    pub fn new(root: PathBuf, base_url: &str) -> Self {
        Self {
            root,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AssetStore for AssetRepository {
    async fn upload(&self, key: &str, bytes: &[u8]) -> FeedResult<()> {
        fs::create_dir_all(&self.root)
            .map_err(|e| FeedError::Upload(format!("failed to create asset directory: {}", e)))?;

        let path = self.root.join(key);
        fs::write(&path, bytes)
            .map_err(|e| FeedError::Upload(format!("failed to write asset: {}", e)))?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, utf8_percent_encode(key, URL_UNSAFE))
    }
}
