//! Settings used to open an on-disk store.

use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;

/// Default LMDB map size: 10 MiB is far beyond what a demo catalog needs.
pub const DEFAULT_MAP_SIZE: usize = 10 * 1024 * 1024;

/// How a store is opened.
///
/// ```rust
/// use storefront_core::store_config::StoreConfig;
///
/// let config = StoreConfig::from_json(r#"{"name":"shop","seed_on_open":false}"#)?;
/// assert_eq!(config.name, "shop");
/// assert!(!config.seed_on_open);
/// assert_eq!(config.lmdb_dir(), "shop.lmdb");
/// # Ok::<(), storefront_core::app_response::AppResponse>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database name; the environment lives in the directory `<name>.lmdb`.
    pub name: String,
    /// Upper bound on the size of the memory map, in bytes.
    pub map_size: usize,
    /// Populate demo data the first time the store is opened.
    pub seed_on_open: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "storefront".to_string(),
            map_size: DEFAULT_MAP_SIZE,
            seed_on_open: true,
        }
    }
}

impl StoreConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_map_size(mut self, map_size: usize) -> Self {
        self.map_size = map_size;
        self
    }

    pub fn with_seed_on_open(mut self, seed_on_open: bool) -> Self {
        self.seed_on_open = seed_on_open;
        self
    }

    /// Parses a JSON object; omitted fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, AppResponse> {
        let config: StoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppResponse> {
        if self.name.trim().is_empty() {
            return Err(AppResponse::ValidationError(
                "Store name cannot be empty".to_string(),
            ));
        }
        if self.map_size == 0 {
            return Err(AppResponse::ValidationError(
                "Map size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn lmdb_dir(&self) -> String {
        format!("{}.lmdb", self.name)
    }
}
