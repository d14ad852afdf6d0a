//! Static registry of deployed rewards pools

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::shared::errors::RegistryError;
use crate::shared::types::PoolDescriptor;

/// One registry row: a descriptor plus its cohort membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    #[serde(flatten)]
    pub descriptor: PoolDescriptor,
    #[serde(default)]
    pub active: bool,
    /// Launch week of a weekly campaign pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    /// Retired pools kept for historical lookups
    #[serde(default)]
    pub historical: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    pools: Vec<RegistryEntry>,
}

/// Named grouping of registry pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cohort {
    Known,
    WeekOne,
    WeekTwo,
    Active,
    Inactive,
    Past,
}

impl Cohort {
    pub const ALL: [Cohort; 6] = [
        Cohort::Known,
        Cohort::WeekOne,
        Cohort::WeekTwo,
        Cohort::Active,
        Cohort::Inactive,
        Cohort::Past,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cohort::Known => "known",
            Cohort::WeekOne => "week-one",
            Cohort::WeekTwo => "week-two",
            Cohort::Active => "active",
            Cohort::Inactive => "inactive",
            Cohort::Past => "past",
        }
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cohort {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "known" | "all" | "pools" => Ok(Cohort::Known),
            "week-one" | "week_one" | "week1" => Ok(Cohort::WeekOne),
            "week-two" | "week_two" | "week2" => Ok(Cohort::WeekTwo),
            "active" => Ok(Cohort::Active),
            "inactive" => Ok(Cohort::Inactive),
            "past" | "all-past" | "historical" => Ok(Cohort::Past),
            _ => Err(RegistryError::UnknownCohort(s.to_string())),
        }
    }
}

/// Read-only pool registry
#[derive(Debug, Clone, Default)]
pub struct PoolRegistry {
    entries: Vec<RegistryEntry>,
    active: HashSet<Address>,
}

impl PoolRegistry {
    /// Build a registry; every pool address must be unique
    pub fn from_entries(entries: Vec<RegistryEntry>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.descriptor.address) {
                return Err(RegistryError::DuplicatePool(entry.descriptor.address));
            }
        }

        let active = entries
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.descriptor.address)
            .collect();

        Ok(Self { entries, active })
    }

    pub fn from_toml_str(s: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(s)?;
        Self::from_entries(file.pools)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let s = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&s)
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Descriptor for the pool at `address`, current or historical
    pub fn find(&self, address: &Address) -> Option<&PoolDescriptor> {
        self.entries
            .iter()
            .find(|entry| entry.descriptor.address == *address)
            .map(|entry| &entry.descriptor)
    }

    pub fn is_address_active(&self, address: &Address) -> bool {
        self.active.contains(address)
    }

    /// Descriptors of `cohort`, in declaration order
    pub fn cohort(&self, cohort: Cohort) -> Vec<PoolDescriptor> {
        self.entries
            .iter()
            .filter(|entry| match cohort {
                Cohort::Known => !entry.historical,
                Cohort::WeekOne => !entry.historical && entry.week == Some(1),
                Cohort::WeekTwo => !entry.historical && entry.week == Some(2),
                Cohort::Active => !entry.historical && entry.active,
                Cohort::Inactive => !entry.historical && !entry.active,
                Cohort::Past => entry.historical,
            })
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    pub fn pools(&self) -> Vec<PoolDescriptor> {
        self.cohort(Cohort::Known)
    }

    pub fn week_one_pools(&self) -> Vec<PoolDescriptor> {
        self.cohort(Cohort::WeekOne)
    }

    pub fn week_two_pools(&self) -> Vec<PoolDescriptor> {
        self.cohort(Cohort::WeekTwo)
    }

    pub fn active_pools(&self) -> Vec<PoolDescriptor> {
        self.cohort(Cohort::Active)
    }

    pub fn inactive_pools(&self) -> Vec<PoolDescriptor> {
        self.cohort(Cohort::Inactive)
    }

    pub fn all_past_pools(&self) -> Vec<PoolDescriptor> {
        self.cohort(Cohort::Past)
    }
}
