use crate::utils::error::{InventoryError, Result};
use crate::utils::validation::{
    parse_iso_date, validate_non_empty_string, validate_non_negative_count,
    validate_non_negative_price, validate_positive_count, DATE_FORMAT,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// 檔案中的 `quantity` 以有號整數讀取
pub const MAX_QUANTITY: u64 = i64::MAX as u64;

/// 商品種類 (序列化時的 `type` 標籤)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Electronics,
    Grocery,
    Clothing,
}

impl ProductKind {
    pub const ALL: [ProductKind; 3] = [
        ProductKind::Electronics,
        ProductKind::Grocery,
        ProductKind::Clothing,
    ];

    /// 檔案中使用的標籤
    pub fn tag(&self) -> &'static str {
        match self {
            ProductKind::Electronics => "electronics",
            ProductKind::Grocery => "grocery",
            ProductKind::Clothing => "clothing",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductKind::Electronics => "Electronics",
            ProductKind::Grocery => "Grocery",
            ProductKind::Clothing => "Clothing",
        }
    }
}

impl FromStr for ProductKind {
    type Err = InventoryError;

    /// 不分大小寫，"Electronics" 與 "electronics" 皆可
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        ProductKind::ALL
            .into_iter()
            .find(|kind| kind.tag() == normalized)
            .ok_or_else(|| InventoryError::InvalidTypeError { tag: s.to_string() })
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 扁平的 JSON 物件，持久化時每個商品一筆
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.data.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    fn field(&self, key: &str) -> Result<&Value> {
        self.data
            .get(key)
            .ok_or_else(|| InventoryError::deserialization(format!("missing field '{}'", key)))
    }

    fn str_field(&self, key: &str) -> Result<&str> {
        self.field(key)?
            .as_str()
            .ok_or_else(|| malformed(key, "a string"))
    }

    fn f64_field(&self, key: &str) -> Result<f64> {
        self.field(key)?
            .as_f64()
            .ok_or_else(|| malformed(key, "a number"))
    }

    fn i64_field(&self, key: &str) -> Result<i64> {
        self.field(key)?
            .as_i64()
            .ok_or_else(|| malformed(key, "an integer"))
    }
}

fn malformed(key: &str, expected: &str) -> InventoryError {
    InventoryError::deserialization(format!("field '{}' must be {}", key, expected))
}

/// 所有商品共用的原始輸入欄位 (尚未驗證)
#[derive(Debug, Clone, PartialEq)]
pub struct CommonFields {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

impl CommonFields {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64, quantity: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
        }
    }
}

/// 各種類專屬的原始輸入欄位 (尚未驗證)
#[derive(Debug, Clone, PartialEq)]
pub enum VariantFields {
    Electronics { brand: String, warranty_years: i64 },
    Grocery { expiry_date: String },
    Clothing { size: String, material: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductDetails {
    Electronics { brand: String, warranty_years: u32 },
    Grocery { expiry_date: NaiveDate },
    Clothing { size: String, material: String },
}

impl ProductDetails {
    fn from_fields(fields: VariantFields) -> Result<Self> {
        match fields {
            VariantFields::Electronics {
                brand,
                warranty_years,
            } => {
                let years = validate_non_negative_count("warranty_years", warranty_years)?;
                let warranty_years = u32::try_from(years).map_err(|_| {
                    InventoryError::validation("warranty_years", format!("{} is too large", years))
                })?;
                Ok(Self::Electronics {
                    brand,
                    warranty_years,
                })
            }
            VariantFields::Grocery { expiry_date } => Ok(Self::Grocery {
                expiry_date: parse_iso_date("expiry_date", &expiry_date)?,
            }),
            VariantFields::Clothing { size, material } => Ok(Self::Clothing { size, material }),
        }
    }

    pub fn kind(&self) -> ProductKind {
        match self {
            Self::Electronics { .. } => ProductKind::Electronics,
            Self::Grocery { .. } => ProductKind::Grocery,
            Self::Clothing { .. } => ProductKind::Clothing,
        }
    }

    fn write_record(&self, record: &mut Record) {
        match self {
            Self::Electronics {
                brand,
                warranty_years,
            } => {
                record.insert("brand", brand.as_str());
                record.insert("warranty_years", *warranty_years);
            }
            Self::Grocery { expiry_date } => {
                record.insert("expiry_date", expiry_date.format(DATE_FORMAT).to_string());
            }
            Self::Clothing { size, material } => {
                record.insert("size", size.as_str());
                record.insert("material", material.as_str());
            }
        }
    }

    fn read_record(kind: ProductKind, record: &Record) -> Result<VariantFields> {
        Ok(match kind {
            ProductKind::Electronics => VariantFields::Electronics {
                brand: record.str_field("brand")?.to_string(),
                warranty_years: record.i64_field("warranty_years")?,
            },
            ProductKind::Grocery => VariantFields::Grocery {
                expiry_date: record.str_field("expiry_date")?.to_string(),
            },
            ProductKind::Clothing => VariantFields::Clothing {
                size: record.str_field("size")?.to_string(),
                material: record.str_field("material")?.to_string(),
            },
        })
    }
}

impl fmt::Display for ProductDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Electronics {
                brand,
                warranty_years,
            } => write!(f, "Brand: {} | Warranty: {} year(s)", brand, warranty_years),
            Self::Grocery { expiry_date } => {
                write!(f, "Expiry Date: {}", expiry_date.format(DATE_FORMAT))
            }
            Self::Clothing { size, material } => {
                write!(f, "Size: {} | Material: {}", size, material)
            }
        }
    }
}

/// 單一商品；建構後 `id` 與 `price` 不可變
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: String,
    name: String,
    price: f64,
    quantity: u64,
    details: ProductDetails,
}

impl Product {
    pub fn new(common: CommonFields, variant: VariantFields) -> Result<Self> {
        validate_non_empty_string("id", &common.id)?;
        validate_non_empty_string("name", &common.name)?;
        validate_non_negative_price("price", common.price)?;
        let quantity = validate_non_negative_count("quantity", common.quantity)?;
        let details = ProductDetails::from_fields(variant)?;

        Ok(Self {
            id: common.id,
            name: common.name,
            price: common.price,
            quantity,
            details,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn details(&self) -> &ProductDetails {
        &self.details
    }

    pub fn kind(&self) -> ProductKind {
        self.details.kind()
    }

    pub fn total_value(&self) -> f64 {
        self.price * self.quantity as f64
    }

    /// 只有 Grocery 會過期：到期日嚴格早於參考日期
    pub fn is_expired(&self, reference_date: NaiveDate) -> bool {
        match &self.details {
            ProductDetails::Grocery { expiry_date } => *expiry_date < reference_date,
            _ => false,
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "[{}] ID: {} | Name: {} | Price: {:.2} | Quantity: {} | {}",
            self.kind().label(),
            self.id,
            self.name,
            self.price,
            self.quantity,
            self.details
        )
    }

    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("type", self.kind().tag());
        record.insert("id", self.id.as_str());
        record.insert("name", self.name.as_str());
        record.insert("price", self.price);
        record.insert("quantity", self.quantity);
        self.details.write_record(&mut record);
        record
    }

    pub fn from_record(record: &Record) -> Result<Self> {
        let tag = record.str_field("type")?;
        let kind: ProductKind = tag.parse().map_err(|_| {
            InventoryError::deserialization(format!("unknown product type '{}'", tag))
        })?;

        let id = record.str_field("id")?.to_string();
        let common = CommonFields {
            id: id.clone(),
            name: record.str_field("name")?.to_string(),
            price: record.f64_field("price")?,
            quantity: record.i64_field("quantity")?,
        };
        let variant = ProductDetails::read_record(kind, record)?;

        Self::new(common, variant).map_err(|e| {
            InventoryError::deserialization(format!("record '{}' is invalid: {}", id, e))
        })
    }

    pub(crate) fn remove_stock(&mut self, count: i64) -> Result<()> {
        if count <= 0 || count as u64 > self.quantity {
            return Err(InventoryError::InsufficientStockError {
                id: self.id.clone(),
                requested: count,
                available: self.quantity,
            });
        }
        self.quantity -= count as u64;
        Ok(())
    }

    /// 數量上限為 `MAX_QUANTITY`，確保存檔後仍能讀回
    pub(crate) fn add_stock(&mut self, count: i64) -> Result<()> {
        let count = validate_positive_count("count", count)?;
        self.quantity = self
            .quantity
            .checked_add(count)
            .filter(|total| *total <= MAX_QUANTITY)
            .ok_or_else(|| {
                InventoryError::validation(
                    "count",
                    format!(
                        "restocking {} would exceed the maximum stock of {}",
                        count, MAX_QUANTITY
                    ),
                )
            })?;
        Ok(())
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn laptop() -> Product {
        Product::new(
            CommonFields::new("E1", "Laptop", 100.0, 5),
            VariantFields::Electronics {
                brand: "Acme".to_string(),
                warranty_years: 1,
            },
        )
        .unwrap()
    }

    fn milk(expiry: &str) -> Product {
        Product::new(
            CommonFields::new("G1", "Milk", 1.5, 10),
            VariantFields::Grocery {
                expiry_date: expiry.to_string(),
            },
        )
        .unwrap()
    }

    fn shirt() -> Product {
        Product::new(
            CommonFields::new("C1", "Shirt", 19.99, 3),
            VariantFields::Clothing {
                size: "M".to_string(),
                material: "cotton".to_string(),
            },
        )
        .unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Grocery".parse::<ProductKind>().unwrap(), ProductKind::Grocery);
        assert_eq!(" clothing ".parse::<ProductKind>().unwrap(), ProductKind::Clothing);
        assert!(matches!(
            "toy".parse::<ProductKind>(),
            Err(InventoryError::InvalidTypeError { .. })
        ));
    }

    #[test]
    fn test_construction_rejects_invalid_common_fields() {
        let electronics = || VariantFields::Electronics {
            brand: "Acme".to_string(),
            warranty_years: 1,
        };
        let cases = [
            CommonFields::new("", "Laptop", 1.0, 1),
            CommonFields::new("E1", " ", 1.0, 1),
            CommonFields::new("E1", "Laptop", -1.0, 1),
            CommonFields::new("E1", "Laptop", 1.0, -1),
        ];
        for common in cases {
            let result = Product::new(common, electronics());
            assert!(matches!(result, Err(InventoryError::ValidationError { .. })));
        }
    }

    #[test]
    fn test_construction_rejects_invalid_variant_fields() {
        let negative_warranty = Product::new(
            CommonFields::new("E1", "Laptop", 1.0, 1),
            VariantFields::Electronics {
                brand: "Acme".to_string(),
                warranty_years: -2,
            },
        );
        assert!(matches!(
            negative_warranty,
            Err(InventoryError::ValidationError { ref field, .. }) if field == "warranty_years"
        ));

        let bad_date = Product::new(
            CommonFields::new("G1", "Milk", 1.0, 1),
            VariantFields::Grocery {
                expiry_date: "next week".to_string(),
            },
        );
        assert!(matches!(
            bad_date,
            Err(InventoryError::ValidationError { ref field, .. }) if field == "expiry_date"
        ));
    }

    #[test]
    fn test_record_round_trip_for_every_variant() {
        for product in [laptop(), milk("2030-01-01"), shirt()] {
            let record = product.to_record();
            assert_eq!(Product::from_record(&record).unwrap(), product);
        }
    }

    #[test]
    fn test_record_layout() {
        let record = laptop().to_record();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "electronics",
                "id": "E1",
                "name": "Laptop",
                "price": 100.0,
                "quantity": 5,
                "brand": "Acme",
                "warranty_years": 1
            })
        );

        let grocery = milk("2030-01-01").to_record();
        assert_eq!(grocery.get("expiry_date"), Some(&json!("2030-01-01")));
    }

    #[test]
    fn test_from_record_failures() {
        let unknown: Record = serde_json::from_value(json!({
            "type": "toy", "id": "T1", "name": "Ball", "price": 1.0, "quantity": 1
        }))
        .unwrap();
        assert!(matches!(
            Product::from_record(&unknown),
            Err(InventoryError::DeserializationError { .. })
        ));

        let missing_size: Record = serde_json::from_value(json!({
            "type": "clothing", "id": "C1", "name": "Shirt", "price": 1.0, "quantity": 1,
            "material": "cotton"
        }))
        .unwrap();
        assert!(matches!(
            Product::from_record(&missing_size),
            Err(InventoryError::DeserializationError { .. })
        ));

        let negative_quantity: Record = serde_json::from_value(json!({
            "type": "grocery", "id": "G1", "name": "Milk", "price": 1.0, "quantity": -3,
            "expiry_date": "2030-01-01"
        }))
        .unwrap();
        assert!(matches!(
            Product::from_record(&negative_quantity),
            Err(InventoryError::DeserializationError { .. })
        ));

        let wrong_type: Record = serde_json::from_value(json!({
            "type": "electronics", "id": "E1", "name": "Laptop", "price": "cheap",
            "quantity": 1, "brand": "Acme", "warranty_years": 1
        }))
        .unwrap();
        assert!(matches!(
            Product::from_record(&wrong_type),
            Err(InventoryError::DeserializationError { .. })
        ));
    }

    #[test]
    fn test_is_expired() {
        let product = milk("2024-06-15");
        assert!(!product.is_expired(date("2024-06-14")));
        assert!(!product.is_expired(date("2024-06-15")));
        assert!(product.is_expired(date("2024-06-16")));
        assert!(!laptop().is_expired(date("2999-01-01")));
    }

    #[test]
    fn test_describe_field_order() {
        assert_eq!(
            laptop().describe(),
            "[Electronics] ID: E1 | Name: Laptop | Price: 100.00 | Quantity: 5 | Brand: Acme | Warranty: 1 year(s)"
        );
        assert_eq!(
            shirt().to_string(),
            "[Clothing] ID: C1 | Name: Shirt | Price: 19.99 | Quantity: 3 | Size: M | Material: cotton"
        );
        assert!(milk("2030-01-01").describe().ends_with("Expiry Date: 2030-01-01"));
    }

    #[test]
    fn test_stock_changes() {
        let mut product = laptop();
        product.remove_stock(5).unwrap();
        assert_eq!(product.quantity(), 0);
        assert!(product.remove_stock(1).is_err());
        assert!(product.remove_stock(0).is_err());
        product.add_stock(2).unwrap();
        assert_eq!(product.quantity(), 2);
        assert!(matches!(
            product.add_stock(-1),
            Err(InventoryError::ValidationError { .. })
        ));
        assert_eq!(product.total_value(), 200.0);
    }

    #[test]
    fn test_restock_cannot_exceed_max_quantity() {
        let mut product = Product::new(
            CommonFields::new("E1", "Laptop", 100.0, i64::MAX),
            VariantFields::Electronics {
                brand: "Acme".to_string(),
                warranty_years: 1,
            },
        )
        .unwrap();

        assert!(matches!(
            product.add_stock(10),
            Err(InventoryError::ValidationError { .. })
        ));
        assert_eq!(product.quantity(), MAX_QUANTITY);

        let restored = Product::from_record(&product.to_record()).unwrap();
        assert_eq!(restored.quantity(), MAX_QUANTITY);
    }
}
