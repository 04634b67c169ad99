//! Unit registration table
//!
//! Units declare their installable entries up front instead of being
//! scanned for them at run time: each unit name maps to an ordered list of
//! [`UnitEntry`] records, and discovery walks that list. Entry order is
//! registration order, which fixes the install order of the resulting
//! tree. Entries marked manual are skipped by discovery but can still be
//! constructed by name.

use std::collections::BTreeMap;

use crate::error::{Result, discovery_failed, instantiation_failed};
use crate::installer::Installable;

type Constructor = fn() -> Result<Box<dyn Installable>>;

/// One installable entry a unit declares
#[derive(Debug, Clone)]
pub struct UnitEntry {
    name: String,
    auto_run: bool,
    construct: Constructor,
}

impl UnitEntry {
    /// An entry picked up by discovery
    pub fn new(name: impl Into<String>, construct: Constructor) -> Self {
        Self {
            name: name.into(),
            auto_run: true,
            construct,
        }
    }

    /// An entry discovery skips; it only runs when named explicitly
    pub fn manual(name: impl Into<String>, construct: Constructor) -> Self {
        Self {
            auto_run: false,
            ..Self::new(name, construct)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn auto_run(&self) -> bool {
        self.auto_run
    }

    /// Builds the installable this entry stands for
    pub fn construct(&self) -> Result<Box<dyn Installable>> {
        (self.construct)().map_err(|err| instantiation_failed(&self.name, err.to_string()))
    }
}

/// Maps unit names to their declared entries
#[derive(Debug, Default)]
pub struct Registry {
    units: BTreeMap<String, Vec<UnitEntry>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to a unit, creating the unit on first use
    pub fn register(&mut self, unit: impl Into<String>, entry: UnitEntry) {
        self.units.entry(unit.into()).or_default().push(entry);
    }

    /// Whether any entries were registered under this unit name
    pub fn is_registered(&self, unit: &str) -> bool {
        self.units.contains_key(unit)
    }

    /// Registered unit names, sorted
    pub fn units(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    /// The declared entries of a unit, in registration order
    pub fn entries(&self, unit: &str) -> Result<&[UnitEntry]> {
        self.units
            .get(unit)
            .map(Vec::as_slice)
            .ok_or_else(|| discovery_failed(unit, "unit is not registered"))
    }

    /// Constructs every auto-run entry of a unit, in registration order
    pub fn discover(&self, unit: &str) -> Result<Vec<Box<dyn Installable>>> {
        let mut found = Vec::new();
        for entry in self.entries(unit)? {
            if entry.auto_run {
                found.push(entry.construct()?);
            }
        }
        Ok(found)
    }

    /// Constructs one entry of a unit by its entry name, auto-run or not
    pub fn construct_entry(&self, unit: &str, name: &str) -> Result<Box<dyn Installable>> {
        let entry = self
            .entries(unit)?
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| discovery_failed(unit, format!("no entry named '{name}'")))?;
        entry.construct()
    }
}

#[cfg(test)]
mod tests;
