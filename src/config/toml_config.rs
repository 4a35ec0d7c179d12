use crate::config::cli::LocalStorage;
use crate::utils::error::{InventoryError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_INVENTORY_FILE: &str = "inventory.json";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 庫存檔案 (相對於 base_dir)
    #[serde(default = "default_inventory_file")]
    pub path: String,
    pub base_dir: Option<String>,
    pub autoload: Option<bool>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_inventory_file(),
            base_dir: None,
            autoload: None,
        }
    }
}

fn default_inventory_file() -> String {
    DEFAULT_INVENTORY_FILE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl InventoryConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| InventoryError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${INVENTORY_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| InventoryError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("storage.path", &self.storage.path)?;

        if let Some(base_dir) = &self.storage.base_dir {
            validate_path("storage.base_dir", base_dir)?;
        }

        if let Some(level) = self.log_level() {
            validate_non_empty_string("logging.level", level)?;
            if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(InventoryError::validation(
                    "logging.level",
                    format!("'{}' is not one of: {}", level, LOG_LEVELS.join(", ")),
                ));
            }
        }

        Ok(())
    }

    pub fn storage_path(&self) -> &str {
        &self.storage.path
    }

    /// 預設在啟動時載入既有的庫存檔
    pub fn autoload(&self) -> bool {
        self.storage.autoload.unwrap_or(true)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn storage(&self) -> LocalStorage {
        LocalStorage::new(self.storage.base_dir.clone().unwrap_or_default())
    }
}

impl Validate for InventoryConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
