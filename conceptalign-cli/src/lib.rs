//! Support library for the conceptalign CLI binary.
//!
//! Exposes the command pipeline and logging set-up so doctests and tests can
//! exercise them without spawning a subprocess.

pub mod cli;
pub mod logging;
