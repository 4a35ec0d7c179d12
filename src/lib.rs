pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::Shell;
pub use config::{cli::LocalStorage, toml_config::InventoryConfig};
pub use core::inventory::{Inventory, InventoryDocument};
pub use domain::model::{CommonFields, Product, ProductDetails, ProductKind, Record, VariantFields};
pub use domain::ports::{Clock, FixedClock, Storage, SystemClock};
pub use utils::error::{InventoryError, Result};
