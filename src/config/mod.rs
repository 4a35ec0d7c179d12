pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::InventoryConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "small-inventory")]
#[command(about = "Interactive inventory manager for electronics, grocery and clothing products")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Inventory JSON file (overrides storage.path from the config)
    #[arg(short, long)]
    pub file: Option<String>,

    #[arg(long, help = "Do not load the inventory file at startup")]
    pub no_autoload: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 讀取 TOML (若有指定) 並套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<InventoryConfig> {
        let mut config = match &self.config {
            Some(path) => InventoryConfig::from_file(path)?,
            None => InventoryConfig::default(),
        };

        if let Some(file) = &self.file {
            config.storage.path = file.clone();
        }
        if self.no_autoload {
            config.storage.autoload = Some(false);
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let cli = CliConfig::parse_from(["small-inventory", "--file", "shop.json", "--no-autoload"]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.storage_path(), "shop.json");
        assert!(!config.autoload());
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let cli = CliConfig {
            config: Some("/definitely/not/here.toml".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            cli.resolve(),
            Err(crate::utils::error::InventoryError::IoError(_))
        ));
    }
}
