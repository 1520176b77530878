use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Raw bit value of a role flag.
pub type StatusBits = u32;

/// The empty mask.
pub const NO_STATUS: StatusBits = 0;

// Roles an applicant can volunteer for.
pub const STATUS_OBSERVER: StatusBits = 1;
pub const STATUS_MOBILE: StatusBits = 2;
pub const STATUS_COORD_REGION: StatusBits = 4;
pub const STATUS_COORD_MOBILE: StatusBits = 8;
pub const STATUS_CALLER: StatusBits = 16;
/// Shared by the two legacy caller-coordinator roles, which were merged
/// into one flag. See [`LEGACY_ALIASES`].
pub const STATUS_COORD_CALLER: StatusBits = 16384;

// Commission memberships and other past roles.
pub const STATUS_PRG_RESERVE: StatusBits = 32;
pub const STATUS_PRG: StatusBits = 64;
pub const STATUS_TIC_PSG: StatusBits = 128;
pub const STATUS_TIC_PRG: StatusBits = 256;
pub const STATUS_PSG: StatusBits = 512;
pub const STATUS_CANDIDATE: StatusBits = 1024;
pub const STATUS_DELEGATE: StatusBits = 2048;
pub const STATUS_JOURNALIST: StatusBits = 4096;
pub const STATUS_COORD: StatusBits = 8192;
pub const STATUS_LAWYER: StatusBits = 32768;

/// One role in a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEntry {
    pub bit: StatusBits,
    pub name: &'static str,
}

const fn entry(bit: StatusBits, name: &'static str) -> StatusEntry {
    StatusEntry { bit, name }
}

const FUTURE: [StatusEntry; 6] = [
    entry(STATUS_OBSERVER, "observer"),
    entry(STATUS_MOBILE, "mobile"),
    entry(STATUS_CALLER, "caller"),
    entry(STATUS_COORD_REGION, "coord_region"),
    entry(STATUS_COORD_MOBILE, "coord_mobile"),
    entry(STATUS_COORD_CALLER, "coord_caller"),
];

const FUTURE_WITH_ARCHIVED: [StatusEntry; 7] = [
    entry(STATUS_OBSERVER, "observer"),
    entry(STATUS_MOBILE, "mobile"),
    entry(STATUS_CALLER, "caller"),
    entry(STATUS_COORD_REGION, "coord_region"),
    entry(STATUS_COORD_MOBILE, "coord_mobile"),
    entry(STATUS_COORD_CALLER, "coord_caller"),
    entry(STATUS_PRG_RESERVE, "prg_reserve"),
];

const PAST: [StatusEntry; 11] = [
    entry(STATUS_OBSERVER, "observer"),
    entry(STATUS_MOBILE, "mobile"),
    entry(STATUS_PRG, "prg"),
    entry(STATUS_PSG, "psg"),
    entry(STATUS_TIC_PRG, "tic_prg"),
    entry(STATUS_TIC_PSG, "tic_psg"),
    entry(STATUS_LAWYER, "lawyer"),
    entry(STATUS_CANDIDATE, "candidate"),
    entry(STATUS_DELEGATE, "delegate"),
    entry(STATUS_JOURNALIST, "journalist"),
    entry(STATUS_COORD, "coord"),
];

/// Historical names that resolve to an existing bit without being catalog
/// entries themselves. Both old caller-coordinator roles are stored as
/// [`STATUS_COORD_CALLER`].
pub const LEGACY_ALIASES: [StatusEntry; 1] = [entry(STATUS_COORD_CALLER, "coord_mobile_caller")];

/// The role catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Catalog {
    /// Roles an applicant can volunteer for.
    Future,
    /// Future roles plus the archived reserve-pool role.
    FutureWithArchived,
    /// Roles an applicant has held before.
    Past,
    /// Union of future and past roles, plus `no_status`.
    All,
}

impl Catalog {
    /// Ordered catalog entries. No two entries share a bit.
    pub fn entries(self) -> &'static [StatusEntry] {
        match self {
            Self::Future => &FUTURE,
            Self::FutureWithArchived => &FUTURE_WITH_ARCHIVED,
            Self::Past => &PAST,
            Self::All => all_statuses(),
        }
    }

    /// Union of every bit in the catalog.
    pub fn mask(self) -> StatusBits {
        self.entries().iter().fold(NO_STATUS, |acc, e| acc | e.bit)
    }

    /// Find the bit for a role name. Legacy aliases are accepted by every
    /// catalog that contains the bit they alias.
    pub fn bit_of(self, name: &str) -> Option<StatusBits> {
        self.entries()
            .iter()
            .chain(LEGACY_ALIASES.iter())
            .find(|e| e.name == name)
            .map(|e| e.bit)
            .filter(|bit| self.mask() & bit == *bit)
    }

    /// Find the display name for a bit.
    pub fn name_of(self, bit: StatusBits) -> Option<&'static str> {
        self.entries().iter().find(|e| e.bit == bit).map(|e| e.name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Future => "future",
            Self::FutureWithArchived => "future_with_archived",
            Self::Past => "past",
            Self::All => "all",
        }
    }
}

impl Display for Catalog {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Catalog {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "future" => Ok(Self::Future),
            "future_with_archived" => Ok(Self::FutureWithArchived),
            "past" => Ok(Self::Past),
            "all" => Ok(Self::All),
            other => Err(Error::UnknownCatalog(other.to_string())),
        }
    }
}

/// Future roles followed by the past roles not already listed, then `no_status`.
fn all_statuses() -> &'static [StatusEntry] {
    static ALL: OnceLock<Vec<StatusEntry>> = OnceLock::new();
    ALL.get_or_init(|| {
        let mut all: Vec<StatusEntry> = FUTURE.to_vec();
        for past in PAST {
            if !all.iter().any(|e| e.bit == past.bit) {
                all.push(past);
            }
        }
        all.push(entry(NO_STATUS, "no_status"));
        all
    })
}

/// Names of the per-role getters on the desired statuses.
pub fn future_status_methods() -> Vec<String> {
    Catalog::Future
        .entries()
        .iter()
        .map(|e| format!("can_be_{}", e.name))
        .collect()
}

/// Names of the per-role getters on the previous statuses.
pub fn previous_status_methods() -> Vec<String> {
    Catalog::Past
        .entries()
        .iter()
        .map(|e| format!("was_{}", e.name))
        .collect()
}
