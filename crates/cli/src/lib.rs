use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use opbind_core::config::ResolverConfig;
use opbind_core::model::Address;
use opbind_core::services::HighlightMode;
use sha2::{Digest, Sha256};
use tracing_subscriber::EnvFilter;

pub mod commands;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Ignore a second init (e.g. from tests driving several commands).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parse an address given as `0x`-prefixed hex or decimal.
pub fn parse_address(text: &str) -> Result<Address> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse::<u64>(),
    };
    parsed.map_err(|_| anyhow!("Invalid address '{}'. Use hex (0x401000) or decimal", text))
}

/// Parse an operand reference of the form `ADDR:INDEX` (e.g. `0x401000:1`).
pub fn parse_operand_ref(text: &str) -> Result<(Address, usize)> {
    let (addr, index) = text
        .rsplit_once(':')
        .ok_or_else(|| anyhow!("Invalid operand reference '{}'. Expected ADDR:INDEX", text))?;
    let address = parse_address(addr)?;
    let index = index
        .trim()
        .parse::<usize>()
        .with_context(|| format!("Invalid operand index in '{}'", text))?;
    Ok((address, index))
}

/// Parse a kebab-case highlight mode name.
pub fn parse_highlight_mode(text: &str) -> Result<HighlightMode> {
    match text {
        "same-ident" => Ok(HighlightMode::SameIdent),
        "same-text" => Ok(HighlightMode::SameText),
        other => Err(anyhow!("Invalid highlight mode '{}'. Allowed: same-ident, same-text", other)),
    }
}

/// Load the resolver config, or fall back to defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<ResolverConfig> {
    match path {
        Some(path) => ResolverConfig::load(path)
            .with_context(|| format!("Failed to load resolver config {}", path.display())),
        None => Ok(ResolverConfig::default()),
    }
}

/// Compute the SHA-256 hash of a file and return it as a hex string.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open snapshot for hashing: {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("Failed to read snapshot for hashing: {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let digest = hasher.finalize();
    Ok(format!("{:x}", digest))
}
