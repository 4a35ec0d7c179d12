pub mod inventory;

pub use crate::domain::model::{CommonFields, Product, ProductKind, Record, VariantFields};
pub use crate::domain::ports::{Clock, FixedClock, Storage, SystemClock};
pub use crate::utils::error::Result;
