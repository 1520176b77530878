//! Narrow query interfaces onto the reference data and record storage that
//! validation depends on. All calls are synchronous.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{application::ApplicationId, state::ApplicationState};

pub type RegionId = u32;

pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// A collaborator could not answer. Missing records are reported as
/// `Ok(None)` instead, so this is always a fault.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{service} unavailable: {reason}")]
    Unavailable {
        service: &'static str,
        reason: String,
    },
}

/// An administrative region or a district within one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    #[serde(default)]
    pub parent: Option<RegionId>,
}

/// A polling station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub number: String,
    pub region: RegionId,
}

/// A blacklisted phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    pub phone: String,
    #[serde(default)]
    pub reason: Option<String>,
}

pub trait RegionLookup {
    fn region(&self, id: RegionId) -> LookupResult<Option<Region>>;

    /// Parent of the given region, `None` for top-level or unknown regions.
    fn parent_of(&self, id: RegionId) -> LookupResult<Option<RegionId>> {
        Ok(self.region(id)?.and_then(|region| region.parent))
    }
}

pub trait StationLookup {
    fn station(&self, number: &str) -> LookupResult<Option<Station>>;

    /// Whether the station lies in `region`, directly or through a district of it.
    fn belongs_to_region(&self, station: &Station, region: RegionId) -> LookupResult<bool>;
}

pub trait VerificationLookup {
    /// Whether a confirmed verification exists for this normalised phone.
    fn is_confirmed(&self, phone: &str) -> LookupResult<bool>;
}

pub trait BlacklistLookup {
    fn entry_for_phone(&self, phone: &str) -> LookupResult<Option<BlacklistEntry>>;
}

/// Fields the duplicate scan can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanField {
    Phone,
    Email,
}

impl ScanField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Email => "email",
        }
    }
}

impl Display for ScanField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait DuplicateScan {
    /// Count records other than `exclude` whose `field` equals `value`,
    /// restricted to `state` when given.
    fn count_others(
        &self,
        field: ScanField,
        value: &str,
        exclude: Option<ApplicationId>,
        state: Option<ApplicationState>,
    ) -> LookupResult<u64>;
}

/// Every collaborator the validator needs, borrowed for one pass.
#[derive(Clone, Copy)]
pub struct Lookups<'a> {
    pub regions: &'a dyn RegionLookup,
    pub stations: &'a dyn StationLookup,
    pub verifications: &'a dyn VerificationLookup,
    pub duplicates: &'a dyn DuplicateScan,
}

impl<'a> Lookups<'a> {
    /// Use a single object that answers every kind of lookup.
    pub fn all<T>(source: &'a T) -> Self
    where
        T: RegionLookup + StationLookup + VerificationLookup + DuplicateScan,
    {
        Self {
            regions: source,
            stations: source,
            verifications: source,
            duplicates: source,
        }
    }
}
