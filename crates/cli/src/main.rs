use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use opbind::commands::{
    coverage_command, highlight_command, registers_command, resolve_command, ResolveOptions,
};
use opbind::{init_tracing, parse_address, parse_highlight_mode, parse_operand_ref};

/// Operand binding and branch-target resolution for disassembly listings.
///
/// This CLI is a thin wrapper around `opbind-core` (exposed in code as `opbind_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "opbind",
    version,
    about = "Bind disassembly operands to recovered variables and branch targets",
    long_about = None
)]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve every operand of a listing snapshot.
    ///
    /// Register/memory operands are bound to recovered variables; branch
    /// operands are resolved against their CFG successor candidates.
    Resolve {
        /// Snapshot file (.json, .yaml or .yml).
        #[arg(long)]
        snapshot: PathBuf,

        /// Optional resolver config file (.json, .yaml or .yml).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of candidate targets shown for ambiguous branches.
        #[arg(long)]
        preview_limit: Option<usize>,

        /// Do not bind operands to variables.
        #[arg(long, default_value_t = false)]
        no_variables: bool,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List operands highlighted together with a selected operand.
    Highlight {
        /// Snapshot file (.json, .yaml or .yml).
        #[arg(long)]
        snapshot: PathBuf,

        /// Optional resolver config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Selected operand as ADDR:INDEX (e.g. 0x401000:1).
        #[arg(long)]
        select: String,

        /// Highlight mode: same-ident or same-text. Defaults to the config value.
        #[arg(long)]
        mode: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show the built-in register table for an architecture.
    Registers {
        /// Architecture name (x86_64, aarch64).
        #[arg(long)]
        arch: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Report the covered block and function-relative location of an address.
    Coverage {
        /// Snapshot file (.json, .yaml or .yml).
        #[arg(long)]
        snapshot: PathBuf,

        /// Address in hex (0x401000) or decimal.
        #[arg(long)]
        addr: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Resolve { snapshot, config, preview_limit, no_variables, json } => {
            let options = ResolveOptions { config, preview_limit, no_variables };
            resolve_command(&snapshot, &options, json)?
        }
        Command::Highlight { snapshot, config, select, mode, json } => {
            let selected = parse_operand_ref(&select)?;
            let mode = mode.as_deref().map(parse_highlight_mode).transpose()?;
            highlight_command(&snapshot, config.as_deref(), selected, mode, json)?
        }
        Command::Registers { arch, json } => registers_command(&arch, json)?,
        Command::Coverage { snapshot, addr, json } => {
            coverage_command(&snapshot, parse_address(&addr)?, json)?
        }
    }

    Ok(())
}
