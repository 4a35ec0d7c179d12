use crate::config::cli::LocalStorage;
use crate::config::toml_config::InventoryConfig;
use crate::core::inventory::Inventory;
use crate::domain::model::{CommonFields, Product, ProductKind, VariantFields};
use crate::domain::ports::{Clock, SystemClock};
use crate::utils::error::InventoryError;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

const SEPARATOR_WIDTH: usize = 50;

#[derive(Error, Debug)]
enum CommandError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("{0}")]
    Input(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

type CommandResult = std::result::Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// 互動式選單；讀取 `input`，把結果寫到 `output`
pub struct Shell<R, W, C: Clock = SystemClock> {
    input: R,
    output: W,
    inventory: Inventory<C>,
    storage: LocalStorage,
    default_path: String,
}

impl<R: BufRead, W: Write, C: Clock> Shell<R, W, C> {
    pub fn new(input: R, output: W, inventory: Inventory<C>, config: &InventoryConfig) -> Self {
        Self {
            input,
            output,
            inventory,
            storage: config.storage(),
            default_path: config.storage_path().to_string(),
        }
    }

    pub fn inventory(&self) -> &Inventory<C> {
        &self.inventory
    }

    pub fn into_inventory(self) -> Inventory<C> {
        self.inventory
    }

    /// 執行選單直到使用者選擇離開或輸入結束
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "================= Welcome to the Inventory Management System ================"
        )?;

        loop {
            self.print_menu()?;
            let choice = match self.prompt("Enter Your Choice: ") {
                Ok(choice) => choice,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            };

            match self.dispatch(choice.trim()) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    tracing::debug!("Input ended in the middle of a command");
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        writeln!(self.output, "Thank you for using this program.")?;
        self.output.flush()
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "1. Add Product")?;
        writeln!(self.output, "2. Sell Product")?;
        writeln!(self.output, "3. Restock Product")?;
        writeln!(self.output, "4. Remove Product")?;
        writeln!(self.output, "5. Search Product")?;
        writeln!(self.output, "6. View All Products")?;
        writeln!(self.output, "7. Inventory Value")?;
        writeln!(self.output, "8. Save Inventory")?;
        writeln!(self.output, "9. Load Inventory")?;
        writeln!(self.output, "0. Exit")
    }

    fn dispatch(&mut self, choice: &str) -> io::Result<Flow> {
        let result = match choice {
            "1" => self.add_product(),
            "2" => self.sell_product(),
            "3" => self.restock_product(),
            "4" => self.remove_product(),
            "5" => self.search_products(),
            "6" => self.view_all(),
            "7" => self.inventory_value(),
            "8" => self.save_inventory(),
            "9" => self.load_inventory(),
            "0" => return Ok(Flow::Exit),
            _ => Err(CommandError::Input(
                "Invalid choice! Please try again.".to_string(),
            )),
        };

        match result {
            Ok(()) => {}
            Err(CommandError::Inventory(e)) => {
                tracing::warn!("Command failed: {} (Category: {:?})", e, e.category());
                writeln!(self.output, "❌ {}", e.user_friendly_message())?;
                writeln!(self.output, "💡 {}", e.recovery_suggestion())?;
            }
            Err(CommandError::Input(message)) => {
                writeln!(self.output, "❌ {}", message)?;
            }
            Err(CommandError::Io(e)) => return Err(e),
        }
        Ok(Flow::Continue)
    }

    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    fn prompt_number<T: FromStr>(&mut self, label: &str, field: &str) -> Result<T, CommandError> {
        let raw = self.prompt(label)?;
        raw.trim()
            .parse()
            .map_err(|_| CommandError::Input(format!("{} must be a number, got '{}'", field, raw)))
    }

    /// 空白輸入代表使用設定檔中的預設路徑
    fn prompt_path(&mut self) -> Result<String, CommandError> {
        let label = format!("Filename [{}]: ", self.default_path);
        let raw = self.prompt(&label)?;
        let path = raw.trim();
        Ok(if path.is_empty() {
            self.default_path.clone()
        } else {
            path.to_string()
        })
    }

    fn add_product(&mut self) -> CommandResult {
        let kind: ProductKind = self
            .prompt("Enter Type Of Product (Electronics/Grocery/Clothing): ")?
            .parse()?;
        let id = self.prompt("Product ID: ")?.trim().to_string();
        let name = self.prompt("Name: ")?.trim().to_string();
        let price: f64 = self.prompt_number("Price: ", "Price")?;
        let quantity: i64 = self.prompt_number("Quantity: ", "Quantity")?;

        let variant = match kind {
            ProductKind::Electronics => {
                let brand = self.prompt("Brand: ")?;
                let warranty_years =
                    self.prompt_number("Warranty (years): ", "Warranty")?;
                VariantFields::Electronics {
                    brand,
                    warranty_years,
                }
            }
            ProductKind::Grocery => VariantFields::Grocery {
                expiry_date: self.prompt("Expiry Date (YYYY-MM-DD): ")?,
            },
            ProductKind::Clothing => VariantFields::Clothing {
                size: self.prompt("Size: ")?,
                material: self.prompt("Material: ")?,
            },
        };

        let product = Product::new(CommonFields::new(id, name, price, quantity), variant)?;
        tracing::info!("Adding {} product '{}'", product.kind(), product.id());
        self.inventory.add(product)?;
        writeln!(self.output, "✅ Product has been added.")?;
        Ok(())
    }

    fn sell_product(&mut self) -> CommandResult {
        let id = self.prompt("Product ID: ")?;
        let count: i64 = self.prompt_number("Quantity: ", "Quantity")?;

        let remaining = self.inventory.sell(id.trim(), count)?;
        tracing::info!("Sold {} x '{}', {} left", count, id.trim(), remaining);
        writeln!(
            self.output,
            "✅ Sold {} unit(s). Remaining stock: {}",
            count, remaining
        )?;
        Ok(())
    }

    fn restock_product(&mut self) -> CommandResult {
        let id = self.prompt("Product ID: ")?;
        let count: i64 = self.prompt_number("Quantity to add: ", "Quantity")?;

        let total = self.inventory.restock(id.trim(), count)?;
        tracing::info!("Restocked '{}' by {}, now {}", id.trim(), count, total);
        writeln!(self.output, "✅ Restocked. Current stock: {}", total)?;
        Ok(())
    }

    fn remove_product(&mut self) -> CommandResult {
        let id = self.prompt("Product ID: ")?;

        let removed = self.inventory.remove(id.trim())?;
        tracing::info!("Removed product '{}'", removed.id());
        writeln!(self.output, "✅ Removed: {}", removed.describe())?;
        Ok(())
    }

    fn search_products(&mut self) -> CommandResult {
        let mode = self.prompt("Search by name/type: ")?.trim().to_lowercase();
        let lines: Vec<String> = match mode.as_str() {
            "name" => {
                let name = self.prompt("Enter name of product: ")?;
                self.inventory
                    .search_by_name(name.trim())
                    .map(Product::describe)
                    .collect()
            }
            "type" => {
                let tag = self.prompt("Enter type of product: ")?;
                self.inventory
                    .search_by_type(&tag)?
                    .map(Product::describe)
                    .collect()
            }
            _ => {
                return Err(CommandError::Input(
                    "Invalid search mode! Please enter 'name' or 'type'.".to_string(),
                ))
            }
        };

        tracing::debug!("Search by {} matched {} product(s)", mode, lines.len());
        if lines.is_empty() {
            writeln!(self.output, "No matching products.")?;
        }
        for line in lines {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }

    fn view_all(&mut self) -> CommandResult {
        let before = self.inventory.len();
        let lines: Vec<String> = self.inventory.list_all().map(Product::describe).collect();
        let purged = before - lines.len();
        if purged > 0 {
            tracing::info!("Purged {} expired product(s)", purged);
        }

        if lines.is_empty() {
            writeln!(self.output, "Inventory is empty.")?;
        }
        for line in lines {
            writeln!(self.output, "{}", line)?;
            writeln!(self.output, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        }
        Ok(())
    }

    fn inventory_value(&mut self) -> CommandResult {
        let value = self.inventory.total_value();
        writeln!(self.output, "Total inventory value: {:.2}", value)?;
        Ok(())
    }

    fn save_inventory(&mut self) -> CommandResult {
        let path = self.prompt_path()?;

        self.inventory.save_with(&self.storage, &path)?;
        tracing::info!("Saved {} product(s) to {}", self.inventory.len(), path);
        writeln!(self.output, "✅ Inventory saved to {}.", path)?;
        Ok(())
    }

    fn load_inventory(&mut self) -> CommandResult {
        let path = self.prompt_path()?;

        let count = self.inventory.load_with(&self.storage, &path)?;
        tracing::info!("Loaded {} product(s) from {}", count, path);
        writeln!(self.output, "✅ Inventory loaded: {} product(s).", count)?;
        Ok(())
    }
}
