use anyhow::{Context, Result};
use opbind_core::arch::{RegisterFile, RegisterMap};

/// Dump the built-in register table for an architecture.
pub fn registers_command(arch: &str, json: bool) -> Result<()> {
    let map = RegisterMap::for_arch(arch).context("Failed to load register table")?;

    if json {
        println!("{}", serde_json::to_string_pretty(map.entries())?);
        return Ok(());
    }

    println!("Registers ({}) [{}]:", map.entries().len(), map.name());
    for entry in map.entries() {
        println!("  - {} -> #{} ({} bytes)", entry.name, entry.canonical.0, entry.width);
    }
    Ok(())
}
