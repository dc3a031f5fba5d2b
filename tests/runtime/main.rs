//! Integration tests for Layer 2: Runtime
//!
//! Drives the REPL with scripted input against the Memory driver.

mod accumulator;
mod commands;
mod support;
