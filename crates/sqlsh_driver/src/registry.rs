//! Driver lookup by name.

use sqlsh_foundation::{Error, Result};
use tracing::debug;

use crate::connection::Connection;
use crate::memory::MemoryDriver;
use crate::url::DriverUrl;

/// A database driver: knows its data sources and how to open connections.
pub trait Driver {
    /// The driver name used in URLs.
    fn name(&self) -> &str;

    /// Data sources this driver can enumerate, as full driver URLs.
    ///
    /// # Errors
    ///
    /// Returns a driver error if enumeration fails.
    fn data_sources(&self) -> Result<Vec<String>>;

    /// Opens a connection to a data source.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the connection cannot be established.
    fn connect(
        &self,
        data_source: &str,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<Box<dyn Connection>>;
}

/// The set of drivers available to the shell.
#[derive(Default)]
pub struct DriverRegistry {
    drivers: Vec<Box<dyn Driver>>,
}

impl DriverRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in drivers.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MemoryDriver));
        registry
    }

    /// Adds a driver. A later driver with the same name shadows an earlier one.
    pub fn register(&mut self, driver: Box<dyn Driver>) {
        self.drivers.push(driver);
    }

    /// Names of all registered drivers, in registration order.
    #[must_use]
    pub fn available_drivers(&self) -> Vec<&str> {
        self.drivers.iter().map(|d| d.name()).collect()
    }

    /// Looks up a driver by name, case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Driver> {
        self.drivers
            .iter()
            .rev()
            .find(|d| d.name().eq_ignore_ascii_case(name))
            .map(|d| &**d)
    }

    /// Data sources of the named driver.
    ///
    /// # Errors
    ///
    /// Returns an unknown driver error, or the driver's enumeration error.
    pub fn data_sources(&self, driver: &str) -> Result<Vec<String>> {
        self.get(driver)
            .ok_or_else(|| Error::unknown_driver(driver))?
            .data_sources()
    }

    /// Parses `url` and connects through the matching driver.
    ///
    /// # Errors
    ///
    /// Returns an invalid URL or unknown driver error, or the driver's
    /// connection error.
    pub fn connect(
        &self,
        url: &str,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<Box<dyn Connection>> {
        let parsed = DriverUrl::parse(url)?;
        let driver = self
            .get(&parsed.driver)
            .ok_or_else(|| Error::unknown_driver(&parsed.driver))?;
        debug!(driver = driver.name(), data_source = %parsed.data_source, "connecting");
        driver.connect(&parsed.data_source, user, password)
    }
}
