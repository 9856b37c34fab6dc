//! opbind-core
//!
//! Binds disassembly operands to recovered program variables and resolves
//! branch operands to concrete targets.
//!
//! Three upstream results meet here: the instruction decode, the variable
//! recovery (variables plus access records) and the CFG successor sets. The
//! resolvers in `services` reconcile them into plain values a listing can
//! render; nothing in this crate draws anything.

pub mod arch;
pub mod config;
pub mod coverage;
pub mod diagnostics;
pub mod index;
pub mod model;
pub mod services;
pub mod snapshot;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
