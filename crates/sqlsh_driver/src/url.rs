//! Driver URL parsing.
//!
//! A driver URL names a driver and a driver-specific data source:
//! `[dbi:]Driver:datasource`. The `dbi:` prefix is optional and matched
//! case-insensitively. The data source may itself contain colons.

use std::fmt;

use sqlsh_foundation::{Error, Result};

const PREFIX: &str = "dbi:";

/// A parsed driver URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverUrl {
    /// Driver name as written.
    pub driver: String,
    /// Data source, passed to the driver untouched.
    pub data_source: String,
}

impl DriverUrl {
    /// Parses a driver URL.
    ///
    /// # Errors
    ///
    /// Returns an invalid URL error if no driver name is present.
    pub fn parse(url: &str) -> Result<Self> {
        let trimmed = url.trim();
        let body = trimmed
            .get(..PREFIX.len())
            .filter(|head| head.eq_ignore_ascii_case(PREFIX))
            .map_or(trimmed, |_| &trimmed[PREFIX.len()..]);

        let (driver, data_source) = body.split_once(':').unwrap_or((body, ""));
        if driver.is_empty() {
            return Err(Error::invalid_url(url));
        }

        Ok(Self {
            driver: driver.to_string(),
            data_source: data_source.to_string(),
        })
    }
}

impl fmt::Display for DriverUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}:{}", self.driver, self.data_source)
    }
}
