// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;
use std::path::Path;

use eco_budget::{spending_breakdown, RecordStore, StoreError};

/// Backing store used when no path is given, in the working directory
const DEFAULT_DATA_FILE: &str = "expenses.csv";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "summary" {
        // Batch mode: print the breakdown and exit
        let data_file = args.get(2).map(String::as_str).unwrap_or(DEFAULT_DATA_FILE);
        run_summary(Path::new(data_file))?;
    } else {
        // UI mode (default)
        let data_file = args.get(1).map(String::as_str).unwrap_or(DEFAULT_DATA_FILE);
        run_ui_mode(Path::new(data_file))?;
    }

    Ok(())
}

fn run_summary(data_file: &Path) -> Result<()> {
    println!("🌱 Eco-Friendly Budget Tracker - Spending Summary");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let store = RecordStore::new(data_file);

    let records = match store.load_all() {
        Ok(records) => records,
        Err(StoreError::NotFound(_)) => {
            println!("\nNo expenses found! Please add some first.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!("\n📂 Loaded {} expenses from {}", records.len(), data_file.display());

    let breakdown = spending_breakdown(&records);
    if breakdown.is_empty() {
        println!("\nNo spending recorded yet.");
        return Ok(());
    }

    println!("\n📊 Spending Breakdown by Category:");
    for share in &breakdown {
        println!(
            "   {:<24} {:>12.2}  {:>5.1}%",
            share.category, share.total, share.percent
        );
    }

    let grand_total: f64 = breakdown.iter().map(|s| s.total).sum();
    println!("\n   {:<24} {:>12.2}", "TOTAL", grand_total);

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(data_file: &Path) -> Result<()> {
    println!("🌱 Loading Eco-Friendly Budget Tracker...\n");

    let store = RecordStore::new(data_file);

    println!("💾 Expense file: {}", data_file.display());
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(store);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_data_file: &Path) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print a breakdown with: eco-budget summary [FILE]");
    std::process::exit(1);
}
