//! Extraction options

use crate::error::StorageError;
use jagcache_formats::DEFAULT_SAMPLE_RATE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Audio-bearing categories of the reference cache
pub const DEFAULT_CATEGORIES: [u32; 3] = [4, 14, 15];

/// Cache location used by the reference client install
pub const DEFAULT_CACHE_DIR: &str = "~/.runelite/jagexcache/oldschool/LIVE";

/// Default root for extracted files
pub const DEFAULT_OUTPUT_DIR: &str = "extracted";

/// File naming inside a cache directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheLayout {
    /// Name of the shared data file
    pub data_file_name: String,

    /// Index files are named `<prefix><category>`
    pub index_file_prefix: String,
}

impl Default for CacheLayout {
    fn default() -> Self {
        Self {
            data_file_name: "main_file_cache.dat2".to_string(),
            index_file_prefix: "main_file_cache.idx".to_string(),
        }
    }
}

impl CacheLayout {
    /// Path of the shared data file under `cache_dir`
    pub fn data_path(&self, cache_dir: &Path) -> PathBuf {
        cache_dir.join(&self.data_file_name)
    }

    /// Path of a category's index file under `cache_dir`
    pub fn index_path(&self, cache_dir: &Path, category: u32) -> PathBuf {
        cache_dir.join(format!("{}{category}", self.index_file_prefix))
    }
}

/// Options for an extraction run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Directory holding the index files and the data file
    pub cache_dir: PathBuf,

    /// Root directory for output; each category writes into `idx<category>/`
    pub output_dir: PathBuf,

    /// Categories processed by a full run, in order
    pub categories: Vec<u32>,

    /// Sample rate recorded in every written WAV header
    pub sample_rate: u32,

    /// Cache file naming
    pub layout: CacheLayout,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            cache_dir: expand_home(DEFAULT_CACHE_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            categories: DEFAULT_CATEGORIES.to_vec(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            layout: CacheLayout::default(),
        }
    }
}

impl ExtractOptions {
    /// Create options for a cache directory with every other field defaulted
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Self {
        Self {
            cache_dir: expand_home(cache_dir),
            ..Default::default()
        }
    }

    /// Load options from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StorageError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut options: Self =
            serde_json::from_str(&text).map_err(|source| StorageError::OptionsFile {
                path: path.to_path_buf(),
                source,
            })?;
        options.cache_dir = expand_home(&options.cache_dir);
        Ok(options)
    }

    /// Set the cache directory
    #[must_use]
    pub fn with_cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = expand_home(path);
        self
    }

    /// Set the output root
    #[must_use]
    pub fn with_output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    /// Set the categories processed by a full run
    #[must_use]
    pub fn with_categories(mut self, categories: impl Into<Vec<u32>>) -> Self {
        self.categories = categories.into();
        self
    }

    /// Set the WAV sample rate
    #[must_use]
    pub const fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the cache file naming
    #[must_use]
    pub fn with_layout(mut self, layout: CacheLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Path of the shared data file
    pub fn data_path(&self) -> PathBuf {
        self.layout.data_path(&self.cache_dir)
    }

    /// Path of a category's index file
    pub fn index_path(&self, category: u32) -> PathBuf {
        self.layout.index_path(&self.cache_dir, category)
    }

    /// Output directory for a category
    pub fn category_dir(&self, category: u32) -> PathBuf {
        self.output_dir.join(format!("idx{category}"))
    }

    /// Check the options before a run
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.sample_rate == 0 {
            return Err(StorageError::Config(
                "sample rate must be greater than zero".to_string(),
            ));
        }
        if self.categories.is_empty() {
            return Err(StorageError::Config(
                "at least one category is required".to_string(),
            ));
        }
        if self.layout.data_file_name.is_empty() {
            return Err(StorageError::Config(
                "data file name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Expand a leading `~` to the user's home directory.
///
/// Paths are returned unchanged when `HOME` is not set.
pub fn expand_home<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(rest);
    }
    path.to_path_buf()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_default_paths() {
        let options = ExtractOptions::new("/cache");
        assert_eq!(options.data_path(), PathBuf::from("/cache/main_file_cache.dat2"));
        assert_eq!(options.index_path(14), PathBuf::from("/cache/main_file_cache.idx14"));
        assert_eq!(options.category_dir(4), PathBuf::from("extracted/idx4"));
        assert_eq!(options.categories, vec![4, 14, 15]);
        assert_eq!(options.sample_rate, 22050);
    }

    #[test]
    fn test_custom_layout() {
        let layout = CacheLayout {
            data_file_name: "blob.dat".to_string(),
            index_file_prefix: "table".to_string(),
        };
        let options = ExtractOptions::new("/c").with_layout(layout);
        assert_eq!(options.data_path(), PathBuf::from("/c/blob.dat"));
        assert_eq!(options.index_path(0), PathBuf::from("/c/table0"));
    }

    #[test]
    fn test_validate() {
        assert!(ExtractOptions::new("/c").validate().is_ok());
        assert!(ExtractOptions::new("/c").with_sample_rate(0).validate().is_err());
        assert!(
            ExtractOptions::new("/c")
                .with_categories(Vec::new())
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_expand_home_leaves_other_paths() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_home("rel/~/path"), PathBuf::from("rel/~/path"));
    }

    #[test]
    fn test_expand_home() {
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(expand_home("~/cache"), PathBuf::from(home).join("cache"));
        }
    }

    #[test]
    fn test_load_partial_options_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{ "cache_dir": "/data", "categories": [14] }"#).unwrap();

        let options = ExtractOptions::load(&path).expect("load");
        assert_eq!(options.cache_dir, PathBuf::from("/data"));
        assert_eq!(options.categories, vec![14]);
        assert_eq!(options.sample_rate, 22050);
        assert_eq!(options.layout, CacheLayout::default());
    }

    #[test]
    fn test_load_invalid_options_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("options.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            ExtractOptions::load(&path),
            Err(StorageError::OptionsFile { .. })
        ));
    }
}
