//! Driver and connection abstractions for sqlsh.
//!
//! This crate provides:
//! - [`Connection`] - The operations the shell needs from a database session
//! - [`ResultSet`] and [`ColumnInfo`] - What those operations return
//! - [`DriverRegistry`] - Lookup of drivers by name and connection by URL
//! - [`memory`] - A loopback driver backed by an in-process catalog

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod connection;
pub mod memory;
pub mod registry;
pub mod url;

pub use connection::{ColumnInfo, Connection, ResultSet, Row};
pub use memory::{MemoryConnection, MemoryDriver, MemoryHandle};
pub use registry::{Driver, DriverRegistry};
pub use url::DriverUrl;
