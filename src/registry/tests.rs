use super::{Registry, UnitEntry};
use crate::error::{Result, StagehandError, io_error};
use crate::installer::{Group, Installable};

fn group_entry() -> Result<Box<dyn Installable>> {
    Ok(Box::new(Group::new("grouped")))
}

fn broken_entry() -> Result<Box<dyn Installable>> {
    Err(io_error("constructor exploded"))
}

fn sample_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register("demo", UnitEntry::new("first", group_entry));
    registry.register("demo", UnitEntry::manual("probe", group_entry));
    registry.register("demo", UnitEntry::new("second", group_entry));
    registry
}

#[test]
fn test_entries_keep_registration_order() {
    let registry = sample_registry();

    let names: Vec<_> = registry
        .entries("demo")
        .unwrap()
        .iter()
        .map(UnitEntry::name)
        .collect();

    assert_eq!(names, vec!["first", "probe", "second"]);
}

#[test]
fn test_unknown_unit_fails_discovery() {
    let registry = sample_registry();

    let err = registry.entries("ghost").unwrap_err();

    assert!(matches!(err, StagehandError::DiscoveryFailed { .. }));
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn test_discover_skips_manual_entries() {
    let registry = sample_registry();

    let found = registry.discover("demo").unwrap();

    assert_eq!(found.len(), 2);
}

#[test]
fn test_discover_surfaces_constructor_failure() {
    let mut registry = Registry::new();
    registry.register("demo", UnitEntry::new("fragile", broken_entry));

    let err = registry.discover("demo").unwrap_err();

    assert!(matches!(err, StagehandError::InstantiationFailed { .. }));
    assert!(err.to_string().contains("fragile"));
    assert!(err.to_string().contains("constructor exploded"));
}

#[test]
fn test_construct_entry_reaches_manual_entries() {
    let registry = sample_registry();

    let built = registry.construct_entry("demo", "probe").unwrap();

    assert_eq!(built.name(), "grouped");
}

#[test]
fn test_construct_entry_rejects_unknown_name() {
    let registry = sample_registry();

    let err = registry.construct_entry("demo", "missing").unwrap_err();

    assert!(matches!(err, StagehandError::DiscoveryFailed { .. }));
    assert!(err.to_string().contains("missing"));
}

#[test]
fn test_unit_listing_is_sorted() {
    let mut registry = Registry::new();
    registry.register("zeta", UnitEntry::new("z", group_entry));
    registry.register("alpha", UnitEntry::new("a", group_entry));

    let units: Vec<_> = registry.units().collect();

    assert_eq!(units, vec!["alpha", "zeta"]);
    assert!(registry.is_registered("alpha"));
    assert!(!registry.is_registered("beta"));
}
