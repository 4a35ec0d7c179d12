use crate::utils::error::{InventoryError, Result};
use chrono::NaiveDate;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(InventoryError::validation(field_name, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(InventoryError::validation(field_name, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(InventoryError::validation(
            field_name,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_non_negative_price(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(InventoryError::validation(
            field_name,
            format!("Value must be a finite number, got {}", value),
        ));
    }
    if value < 0.0 {
        return Err(InventoryError::validation(
            field_name,
            format!("Value cannot be negative, got {}", value),
        ));
    }
    Ok(())
}

/// 將有號整數轉成庫存用的無號數量，負數視為驗證錯誤
pub fn validate_non_negative_count(field_name: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| {
        InventoryError::validation(field_name, format!("Value cannot be negative, got {}", value))
    })
}

pub fn validate_positive_count(field_name: &str, value: i64) -> Result<u64> {
    if value <= 0 {
        return Err(InventoryError::validation(
            field_name,
            format!("Value must be greater than 0, got {}", value),
        ));
    }
    Ok(value as u64)
}

/// 解析 ISO 日期 (YYYY-MM-DD)
pub fn parse_iso_date(field_name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        InventoryError::validation(
            field_name,
            format!("'{}' is not a valid YYYY-MM-DD date ({})", value, e),
        )
    })
}
