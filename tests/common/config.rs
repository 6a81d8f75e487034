//! Test configuration helpers for creating downloaders against a mock content host

use linguanodon_sync::config::{ContentConfig, PersistenceConfig};
use linguanodon_sync::{Config, Downloader};
use tempfile::TempDir;

/// Config pointing at `base_url` with a database inside `temp_dir`
pub fn create_test_config(base_url: &str, temp_dir: &TempDir) -> Config {
    Config {
        content: ContentConfig {
            base_url: base_url.to_string(),
            request_timeout_secs: 5,
            ..Default::default()
        },
        persistence: PersistenceConfig {
            database_path: temp_dir.path().join("content.db"),
        },
    }
}

/// Downloader built through [`Downloader::from_config`] against `base_url`.
/// Returns the tempdir too (which must be kept alive).
pub async fn create_test_downloader(base_url: &str) -> (Downloader, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = create_test_config(base_url, &temp_dir);
    let downloader = Downloader::from_config(&config).await.unwrap();
    (downloader, temp_dir)
}
