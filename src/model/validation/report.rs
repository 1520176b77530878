use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Application fields that violations are reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FirstName,
    LastName,
    Patronymic,
    Email,
    Phone,
    Region,
    AdmRegion,
    Uic,
    DesiredStatuses,
    PreviousStatuses,
    ExperienceCount,
    SexMale,
    YearBorn,
    LegalStatus,
    HasCar,
    HasVideo,
    Ip,
    DataProcessingAllowed,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Patronymic => "patronymic",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Region => "region",
            Self::AdmRegion => "adm_region",
            Self::Uic => "uic",
            Self::DesiredStatuses => "desired_statuses",
            Self::PreviousStatuses => "previous_statuses",
            Self::ExperienceCount => "experience_count",
            Self::SexMale => "sex_male",
            Self::YearBorn => "year_born",
            Self::LegalStatus => "legal_status",
            Self::HasCar => "has_car",
            Self::HasVideo => "has_video",
            Self::Ip => "ip",
            Self::DataProcessingAllowed => "data_processing_allowed",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user-correctable problem with an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: Field,
    pub message: String,
}

impl Violation {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Violations reported against one field.
    pub fn on(&self, field: Field) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.field == field)
    }

    pub fn has_error_on(&self, field: Field) -> bool {
        self.on(field).next().is_some()
    }

    /// Messages reported against one field.
    pub fn messages_for(&self, field: Field) -> Vec<&str> {
        self.on(field).map(|v| v.message.as_str()).collect()
    }
}

impl IntoIterator for ValidationReport {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}
