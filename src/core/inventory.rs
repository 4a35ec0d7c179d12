use crate::config::cli::LocalStorage;
use crate::domain::model::{Product, ProductKind, Record};
use crate::domain::ports::{Clock, Storage, SystemClock};
use crate::utils::error::{InventoryError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 存檔格式：`{"products": [ ... ]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryDocument {
    pub products: Vec<Record>,
}

/// 讀檔時也接受單純的 JSON 陣列
#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentShape {
    Wrapped(InventoryDocument),
    Bare(Vec<Record>),
}

impl DocumentShape {
    fn into_records(self) -> Vec<Record> {
        match self {
            DocumentShape::Wrapped(document) => document.products,
            DocumentShape::Bare(records) => records,
        }
    }
}

/// 以 `id` 為鍵的商品集合，依加入順序迭代
///
/// 過期的 Grocery 商品在搜尋時會被略過，並在 `list_all` 或 `load` 時被永久移除。
#[derive(Debug, Clone)]
pub struct Inventory<C: Clock = SystemClock> {
    products: Vec<Product>,
    clock: C,
}

impl Inventory<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Inventory<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Inventory<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            products: Vec::new(),
            clock,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.products.iter().position(|p| p.id() == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or_else(|| InventoryError::NotFoundError { id: id.to_string() })
    }

    /// 依 ID 查詢 (不檢查過期)
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id() == id)
    }

    pub fn add(&mut self, product: Product) -> Result<()> {
        if self.position(product.id()).is_some() {
            return Err(InventoryError::DuplicateIdError {
                id: product.id().to_string(),
            });
        }
        self.products.push(product);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<Product> {
        let index = self
            .position(id)
            .ok_or_else(|| InventoryError::NotFoundError { id: id.to_string() })?;
        Ok(self.products.remove(index))
    }

    /// 賣出 `count` 件，回傳剩餘數量；數量歸零的商品仍保留
    pub fn sell(&mut self, id: &str, count: i64) -> Result<u64> {
        let product = self.get_mut(id)?;
        product.remove_stock(count)?;
        Ok(product.quantity())
    }

    pub fn restock(&mut self, id: &str, count: i64) -> Result<u64> {
        let product = self.get_mut(id)?;
        product.add_stock(count)?;
        Ok(product.quantity())
    }

    /// 名稱包含 `substring` (不分大小寫) 且未過期的商品
    pub fn search_by_name(&self, substring: &str) -> impl Iterator<Item = &Product> + '_ {
        let needle = substring.to_lowercase();
        let today = self.today();
        self.products
            .iter()
            .filter(move |p| !p.is_expired(today) && p.name().to_lowercase().contains(&needle))
    }

    pub fn search_by_type(&self, tag: &str) -> Result<impl Iterator<Item = &Product> + '_> {
        let kind: ProductKind = tag.parse()?;
        Ok(self.search_by_kind(kind))
    }

    pub fn search_by_kind(&self, kind: ProductKind) -> impl Iterator<Item = &Product> + '_ {
        let today = self.today();
        self.products
            .iter()
            .filter(move |p| p.kind() == kind && !p.is_expired(today))
    }

    /// 移除所有已過期商品，回傳移除數量；重複呼叫不會有額外效果
    pub fn purge_expired(&mut self) -> usize {
        let today = self.today();
        let before = self.products.len();
        self.products.retain(|p| !p.is_expired(today));
        before - self.products.len()
    }

    pub fn list_all(&mut self) -> impl Iterator<Item = &Product> + '_ {
        self.purge_expired();
        self.products.iter()
    }

    /// 未過期商品的總價值 (price * quantity)
    pub fn total_value(&self) -> f64 {
        let today = self.today();
        self.products
            .iter()
            .filter(|p| !p.is_expired(today))
            .map(Product::total_value)
            .sum()
    }

    /// 包含尚未清除的過期商品
    pub fn to_document(&self) -> InventoryDocument {
        InventoryDocument {
            products: self.products.iter().map(Product::to_record).collect(),
        }
    }

    pub fn save(&self, path: &str) -> Result<()> {
        self.save_with(&LocalStorage::default(), path)
    }

    pub fn save_with<S: Storage>(&self, storage: &S, path: &str) -> Result<()> {
        let data = serde_json::to_vec_pretty(&self.to_document()).map_err(std::io::Error::other)?;
        storage.write_file(path, &data)
    }

    /// 整批取代目前的庫存，回傳載入 (且未過期) 的商品數
    pub fn load(&mut self, path: &str) -> Result<usize> {
        self.load_with(&LocalStorage::default(), path)
    }

    pub fn load_with<S: Storage>(&mut self, storage: &S, path: &str) -> Result<usize> {
        let data = storage.read_file(path)?;
        let candidate = parse_document(&data)?;

        // 全部驗證通過後才取代，失敗時保留原本的庫存
        self.products = candidate;
        self.purge_expired();
        Ok(self.products.len())
    }
}

fn parse_document(data: &[u8]) -> Result<Vec<Product>> {
    let shape: DocumentShape = serde_json::from_slice(data).map_err(|e| {
        InventoryError::deserialization(format!("invalid inventory document: {}", e))
    })?;

    let mut seen = HashSet::new();
    let mut products = Vec::new();
    for (index, record) in shape.into_records().iter().enumerate() {
        let product = Product::from_record(record).map_err(|e| match e {
            InventoryError::DeserializationError { message } => {
                InventoryError::deserialization(format!("record #{}: {}", index, message))
            }
            other => other,
        })?;
        if !seen.insert(product.id().to_string()) {
            return Err(InventoryError::deserialization(format!(
                "record #{}: duplicate product ID '{}'",
                index,
                product.id()
            )));
        }
        products.push(product);
    }
    Ok(products)
}
