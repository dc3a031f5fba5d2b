//! sqlsh - Interactive shell for driver-backed databases
//!
//! This crate re-exports all layers of sqlsh for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: sqlsh_runtime    — REPL, meta-commands, rendering, CLI
//! Layer 1: sqlsh_driver     — Connection trait, driver registry, Memory driver
//! Layer 0: sqlsh_foundation — Values, coercion, lexer, binding, errors
//! ```

pub use sqlsh_driver as driver;
pub use sqlsh_foundation as foundation;
pub use sqlsh_runtime as runtime;
