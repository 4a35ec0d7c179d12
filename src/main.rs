use anyhow::Context;
use clap::Parser;
use small_inventory::utils::logger;
use small_inventory::{CliConfig, Inventory, Shell};
use std::io;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 先解析設定，日誌等級可能來自設定檔
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(cli.verbose, config.log_level());

    tracing::info!("Starting small-inventory");
    tracing::debug!("Resolved config: {:?}", config);

    let storage = config.storage();
    let path = config.storage_path();
    let mut inventory = Inventory::new();

    if config.autoload() && storage.resolve(path).exists() {
        match inventory.load_with(&storage, path) {
            Ok(count) => tracing::info!("📁 Loaded {} product(s) from {}", count, path),
            Err(e) => {
                // 載入失敗時以空庫存啟動
                tracing::warn!(
                    "Could not load {}: {} (Category: {:?})",
                    path,
                    e,
                    e.category()
                );
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            }
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock(), inventory, &config);
    shell.run().context("interactive session failed")?;

    tracing::info!("Session finished with {} product(s) in memory", shell.inventory().len());
    Ok(())
}
