//! Integration tests for the driver registry

use sqlsh_driver::{Connection, Driver, DriverRegistry, DriverUrl, MemoryConnection};
use sqlsh_foundation::{Error, ErrorKind, Result};

/// A driver that can only refuse connections.
struct Refusing;

impl Driver for Refusing {
    fn name(&self) -> &str {
        "Refusing"
    }

    fn data_sources(&self) -> Result<Vec<String>> {
        Err(Error::driver("cannot enumerate"))
    }

    fn connect(
        &self,
        data_source: &str,
        user: Option<&str>,
        _password: Option<&str>,
    ) -> Result<Box<dyn Connection>> {
        Err(Error::driver(format!(
            "access denied for {} on {data_source}",
            user.unwrap_or("nobody")
        )))
    }
}

#[test]
fn lists_drivers_in_registration_order() {
    let mut registry = DriverRegistry::with_defaults();
    registry.register(Box::new(Refusing));
    assert_eq!(registry.available_drivers(), vec!["Memory", "Refusing"]);
}

#[test]
fn data_sources_per_driver() {
    let mut registry = DriverRegistry::with_defaults();
    registry.register(Box::new(Refusing));
    assert_eq!(
        registry.data_sources("MEMORY").unwrap(),
        vec!["dbi:Memory:", "dbi:Memory:demo"]
    );
    assert!(registry.data_sources("Refusing").is_err());
}

#[test]
fn connect_reports_driver_errors() {
    let mut registry = DriverRegistry::new();
    registry.register(Box::new(Refusing));
    let err = registry
        .connect("dbi:Refusing:prod", Some("scott"), Some("tiger"))
        .err()
        .unwrap();
    assert!(err.is_driver());
    assert_eq!(err.to_string(), "access denied for scott on prod");
}

#[test]
fn connect_rejects_bad_urls() {
    let registry = DriverRegistry::with_defaults();
    let err = registry.connect(":demo", None, None).err().unwrap();
    assert!(matches!(err.kind, ErrorKind::InvalidUrl(_)));
    let err = registry.connect("dbi:Nope:x", None, None).err().unwrap();
    assert!(matches!(err.kind, ErrorKind::UnknownDriver(_)));
}

#[test]
fn memory_data_sources_connect() {
    let registry = DriverRegistry::with_defaults();
    let mut empty = registry.connect("Memory:", None, None).unwrap();
    assert!(empty.tables().unwrap().is_empty());
    let mut demo = registry.connect("dbi:memory:demo", None, None).unwrap();
    assert_eq!(demo.tables().unwrap(), vec!["people"]);
    assert!(registry.connect("dbi:Memory:other", None, None).is_err());
}

#[test]
fn url_round_trips_through_display() {
    let url = DriverUrl::parse("Pg:dbname=test").unwrap();
    assert_eq!(url.to_string(), "dbi:Pg:dbname=test");
    assert_eq!(DriverUrl::parse(&url.to_string()).unwrap(), url);
}

#[test]
fn memory_connection_is_a_connection() {
    let conn: Box<dyn Connection> = Box::new(MemoryConnection::new());
    assert_eq!(conn.autocommit(), Some(true));
}
