use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::catalog::{Catalog, StatusBits, NO_STATUS};

/// A form checkbox value: either a real boolean or the string a web form
/// submits, where only `"1"` means ticked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkbox(pub bool);

impl From<bool> for Checkbox {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl From<&str> for Checkbox {
    fn from(value: &str) -> Self {
        Self(value == "1")
    }
}

/// A set of role flags, stored as a plain integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusMask(StatusBits);

impl StatusMask {
    pub const EMPTY: Self = Self(NO_STATUS);

    pub fn new(bits: StatusBits) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> StatusBits {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == NO_STATUS
    }

    /// True iff every bit of `flag` is set.
    pub fn has(self, flag: StatusBits) -> bool {
        self.0 & flag == flag
    }

    /// Return a copy with `flag` set or cleared.
    #[must_use]
    pub fn with(self, flag: StatusBits, enabled: impl Into<Checkbox>) -> Self {
        if enabled.into().0 {
            Self(self.0 | flag)
        } else {
            Self(self.0 & !flag)
        }
    }

    /// Set or clear `flag` in place.
    pub fn set(&mut self, flag: StatusBits, enabled: impl Into<Checkbox>) {
        *self = self.with(flag, enabled);
    }

    /// Bits set in this mask that the catalog does not know about.
    pub fn foreign_bits(self, catalog: Catalog) -> StatusBits {
        self.0 & !catalog.mask()
    }

    /// Names of the catalog roles present in this mask, in catalog order.
    pub fn to_names(self, catalog: Catalog) -> Vec<&'static str> {
        catalog
            .entries()
            .iter()
            .filter(|e| e.bit != NO_STATUS && self.has(e.bit))
            .map(|e| e.name)
            .collect()
    }

    /// Build a mask from role names.
    pub fn from_names<I, S>(catalog: Catalog, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(Self::EMPTY, |mask, name| {
            let name = name.as_ref();
            catalog
                .bit_of(name)
                .map(|bit| mask.with(bit, true))
                .ok_or_else(|| Error::UnknownStatus {
                    catalog: catalog.to_string(),
                    name: name.to_string(),
                })
        })
    }
}

impl From<StatusBits> for StatusMask {
    fn from(bits: StatusBits) -> Self {
        Self(bits)
    }
}

impl Display for StatusMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}
