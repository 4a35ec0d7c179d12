use anyhow::Result;
use chrono::NaiveDate;
use small_inventory::{FixedClock, Inventory, InventoryConfig, Shell};
use std::io::Cursor;
use tempfile::TempDir;

fn config_for(dir: &TempDir) -> Result<InventoryConfig> {
    let toml_content = format!(
        r#"
[storage]
path = "session.json"
base_dir = "{}"
"#,
        dir.path().display()
    );
    Ok(InventoryConfig::from_toml_str(&toml_content)?)
}

fn run_session(config: &InventoryConfig, script: &str) -> Result<(String, Inventory<FixedClock>)> {
    let clock = FixedClock(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    let mut output = Vec::new();
    let mut shell = Shell::new(
        Cursor::new(script.to_string()),
        &mut output,
        Inventory::with_clock(clock),
        config,
    );
    shell.run()?;
    let inventory = shell.into_inventory();
    Ok((String::from_utf8(output)?, inventory))
}

#[test]
fn test_session_save_and_reload() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = config_for(&temp_dir)?;

    let script = "\
1\nElectronics\nE1\nLaptop\n100\n5\nAcme\n1\n\
1\nClothing\nC1\nT-Shirt\n12.5\n20\nM\ncotton\n\
1\nGrocery\nG1\nRice\n3.25\n40\n2026-01-31\n\
3\nC1\n5\n\
8\n\n\
0\n";
    let (output, inventory) = run_session(&config, script)?;

    assert!(output.contains("Restocked. Current stock: 25"));
    assert!(output.contains("Inventory saved to session.json."));
    assert_eq!(inventory.len(), 3);
    assert!(temp_dir.path().join("session.json").exists());

    let (output, restored) = run_session(&config, "9\n\n6\n7\n0\n")?;
    assert!(output.contains("Inventory loaded: 3 product(s)."));
    assert!(output.contains("[Electronics] ID: E1 | Name: Laptop | Price: 100.00 | Quantity: 5"));
    assert!(output.contains("Size: M | Material: cotton"));
    // 100*5 + 12.5*25 + 3.25*40
    assert!(output.contains("Total inventory value: 942.50"));
    assert_eq!(restored.get("C1").unwrap().quantity(), 25);
    Ok(())
}

#[test]
fn test_session_search_and_remove() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = config_for(&temp_dir)?;

    let script = "\
1\nelectronics\nE1\nGaming Laptop\n900\n2\nAcme\n2\n\
1\nelectronics\nE2\nPhone\n500\n1\nAcme\n1\n\
5\nname\nLAPTOP\n\
5\ntype\ntoy\n\
5\ncolor\n\
4\nE2\n\
4\nE2\n\
0\n";
    let (output, inventory) = run_session(&config, script)?;

    assert!(output.contains("ID: E1 | Name: Gaming Laptop"));
    assert!(output.contains("Unknown product type 'toy'"));
    assert!(output.contains("Invalid search mode!"));
    assert!(output.contains("✅ Removed: [Electronics] ID: E2"));
    assert!(output.contains("No product with ID 'E2'."));
    assert_eq!(inventory.len(), 1);
    Ok(())
}

#[test]
fn test_session_rejects_duplicate_and_oversell() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = config_for(&temp_dir)?;

    let script = "\
1\nclothing\nC1\nJacket\n60\n1\nL\nleather\n\
1\nclothing\nC1\nCoat\n80\n1\nXL\nwool\n\
2\nC1\n2\n\
2\nC1\n0\n\
0\n";
    let (output, inventory) = run_session(&config, script)?;

    assert!(output.contains("The product ID 'C1' already exists."));
    assert!(output.contains("Not enough stock: requested 2, only 1 available."));
    assert!(output.contains("Quantity must be positive (got 0)."));
    assert_eq!(inventory.get("C1").unwrap().name(), "Jacket");
    assert_eq!(inventory.get("C1").unwrap().quantity(), 1);
    Ok(())
}

#[test]
fn test_session_load_failure_is_reported() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = config_for(&temp_dir)?;
    std::fs::write(temp_dir.path().join("bad.json"), b"{\"products\": 3}")?;

    let (output, inventory) = run_session(&config, "9\nbad.json\n9\nmissing.json\n0\n")?;

    assert!(output.contains("The inventory file could not be read"));
    assert!(output.contains("File operation failed"));
    assert!(inventory.is_empty());
    Ok(())
}
