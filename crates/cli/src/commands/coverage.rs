use std::path::Path;

use anyhow::Result;
use opbind_core::model::Address;
use serde::Serialize;

use crate::commands::util::load_snapshot;

/// What `opbind coverage` reports for one address.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageInfo {
    pub address: Address,
    pub location: String,
    pub covered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_start: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
}

/// Look up the covering block, function location and instruction at `address`.
pub fn coverage_info(snapshot_path: &Path, address: Address) -> Result<CoverageInfo> {
    let snapshot = load_snapshot(snapshot_path)?;
    let block = snapshot.covered().block_containing(address);
    Ok(CoverageInfo {
        address,
        location: snapshot.function_table().describe_location(address),
        covered: block.is_some(),
        block_start: block.map(|(start, _)| start),
        block_size: block.map(|(_, size)| size),
        instruction: snapshot.instruction(address).map(|insn| insn.text()),
    })
}

/// Report whether an address is covered and where it lives.
pub fn coverage_command(snapshot_path: &Path, address: Address, json: bool) -> Result<()> {
    let info = coverage_info(snapshot_path, address)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    match &info.instruction {
        Some(text) => println!("{:#x}:   {}", info.address, text),
        None => println!("{:#x}", info.address),
    }
    println!("Function: {}", info.location);
    match (info.block_start, info.block_size) {
        (Some(start), Some(size)) => println!("Covered: yes (block {start:#x}, {size} bytes)"),
        _ => println!("Covered: no"),
    }
    Ok(())
}
