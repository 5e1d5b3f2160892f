//! List strategy presets command.

use anyhow::Result;
use heikin_strategy::{StrategyRegistry, DEFAULT_PRESET};

pub async fn run() -> Result<()> {
    let registry = StrategyRegistry::new();

    println!("Strategy Presets");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for info in registry.list() {
        let marker = if info.name == DEFAULT_PRESET { " (default)" } else { "" };
        println!("  {}{}", info.name, marker);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", info.description);
        println!("  {}", info.default_config);
        println!();
    }

    println!("Select one with `preset` in the [strategy] section.");

    Ok(())
}
