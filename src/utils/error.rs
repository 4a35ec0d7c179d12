use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Validation error on '{field}': {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Product ID '{id}' already exists")]
    DuplicateIdError { id: String },

    #[error("Product '{id}' not found")]
    NotFoundError { id: String },

    #[error("Insufficient stock for '{id}': requested {requested}, available {available}")]
    InsufficientStockError {
        id: String,
        requested: i64,
        available: u64,
    },

    #[error("Invalid product type: {tag}")]
    InvalidTypeError { tag: String },

    #[error("Deserialization error: {message}")]
    DeserializationError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 使用者輸入錯誤，可以直接重試
    Input,
    /// 庫存狀態衝突 (重複 ID、庫存不足、找不到商品)
    State,
    /// 檔案讀寫或格式問題
    Persistence,
    Configuration,
}

impl InventoryError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::DeserializationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } | Self::InvalidTypeError { .. } => ErrorCategory::Input,
            Self::DuplicateIdError { .. }
            | Self::NotFoundError { .. }
            | Self::InsufficientStockError { .. } => ErrorCategory::State,
            Self::DeserializationError { .. } | Self::IoError(_) => ErrorCategory::Persistence,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { field, reason } => format!("Invalid {}: {}", field, reason),
            Self::DuplicateIdError { id } => {
                format!("The product ID '{}' already exists.", id)
            }
            Self::NotFoundError { id } => format!("No product with ID '{}'.", id),
            Self::InsufficientStockError {
                requested,
                available,
                ..
            } => {
                if *requested <= 0 {
                    format!("Quantity must be positive (got {}).", requested)
                } else {
                    format!(
                        "Sorry! Not enough stock: requested {}, only {} available.",
                        requested, available
                    )
                }
            }
            Self::InvalidTypeError { tag } => format!(
                "Unknown product type '{}'. Use Electronics, Grocery or Clothing.",
                tag
            ),
            Self::DeserializationError { message } => {
                format!("The inventory file could not be read: {}", message)
            }
            Self::IoError(e) => format!("File operation failed: {}", e),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => "Check the entered values and try again",
            Self::DuplicateIdError { .. } => "Choose a different product ID",
            Self::NotFoundError { .. } => "List the inventory to see the existing IDs",
            Self::InsufficientStockError { .. } => "Restock the product or sell fewer units",
            Self::InvalidTypeError { .. } => "Use one of: electronics, grocery, clothing",
            Self::DeserializationError { .. } => {
                "Make sure the file was written by this program and is valid JSON"
            }
            Self::IoError(_) => "Check that the path exists and is readable/writable",
            Self::ConfigError { .. } => "Fix the TOML configuration file",
        }
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            InventoryError::validation("price", "negative").category(),
            ErrorCategory::Input
        );
        assert_eq!(
            InventoryError::NotFoundError { id: "X".into() }.category(),
            ErrorCategory::State
        );
        let io = InventoryError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.category(), ErrorCategory::Persistence);
    }

    #[test]
    fn test_non_positive_sell_message() {
        let err = InventoryError::InsufficientStockError {
            id: "E1".into(),
            requested: 0,
            available: 5,
        };
        assert!(err.user_friendly_message().contains("must be positive"));
    }
}
