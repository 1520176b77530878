//! Independent validation rules. Each rule inspects the application and
//! returns the violations it finds; none depends on another's outcome.

use std::sync::OnceLock;

use regex::Regex;

use crate::{
    config::Config,
    error::Result,
    model::{
        application::{ApplicationCore, ApplicationId, SubmissionContext},
        lookup::{Lookups, ScanField},
        phone::is_normalized,
        status::Catalog,
    },
};

use super::report::{Field, Violation};

pub const BLANK: &str = "can't be blank";
pub const NOT_SPECIFIED: &str = "must be specified";
pub const NOT_ACCEPTED: &str = "must be accepted";
pub const INVALID: &str = "is invalid";
pub const NOT_IN_LIST: &str = "is not included in the list";
pub const BAD_YEAR: &str = "has an invalid format";
pub const TAKEN: &str = "has already been taken";
pub const CHOOSE_AT_LEAST_ONE: &str = "choose at least one option";
pub const UNKNOWN_ROLES: &str = "contains unknown roles";
pub const EXPERIENCE_WITHOUT_ROLES: &str = "if you have experience, tick the roles you held";
pub const ROLES_WITHOUT_EXPERIENCE: &str =
    "if you have experience, the number of times must be at least 1";
pub const REGION_OUTSIDE_ADM_REGION: &str =
    "district must belong to the selected administrative region";
pub const PHONE_NOT_CONFIRMED: &str = "is not confirmed";

pub fn station_not_found(number: &str) -> String {
    format!("station №{number} not found")
}

pub fn station_region_mismatch(number: &str) -> String {
    format!("district of station №{number} does not match the applicant's district")
}

pub fn station_adm_region_mismatch(number: &str) -> String {
    format!("administrative region of station №{number} does not match the applicant's")
}

/// Everything a rule may look at during one pass.
pub(super) struct Subject<'a> {
    pub app: &'a ApplicationCore,
    /// `None` for a submission that has not been stored yet.
    pub id: Option<ApplicationId>,
    pub context: &'a SubmissionContext,
    pub config: &'a Config,
    pub lookups: Lookups<'a>,
}

impl Subject<'_> {
    fn creating(&self) -> bool {
        self.id.is_none()
    }
}

pub(super) type Rule = fn(&Subject<'_>) -> Result<Vec<Violation>>;

/// Every rule, by name.
pub(super) const RULES: [(&str, Rule); 10] = [
    ("presence", presence),
    ("consent", consent),
    ("statuses", statuses),
    ("format", formats),
    ("range", range),
    ("experience", experience),
    ("phone_uniqueness", phone_uniqueness),
    ("regions", regions),
    ("stations", stations),
    ("phone_verified", phone_verified),
];

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    // Valid because the pattern is constant.
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

fn uic_regex() -> &'static Regex {
    static UIC: OnceLock<Regex> = OnceLock::new();
    // Valid because the pattern is constant.
    UIC.get_or_init(|| Regex::new(r"^([0-9]+)(,\s*[0-9]+)*$").unwrap())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn email_of(app: &ApplicationCore) -> Option<&str> {
    app.email.as_deref().filter(|e| !is_blank(e))
}

fn uic_of(app: &ApplicationCore) -> Option<&str> {
    app.uic.as_deref().filter(|u| !is_blank(u))
}

fn presence(subject: &Subject<'_>) -> Result<Vec<Violation>> {
    let app = subject.app;
    let mut violations = vec![];

    for (field, value) in [
        (Field::FirstName, &app.first_name),
        (Field::LastName, &app.last_name),
        (Field::Patronymic, &app.patronymic),
        (Field::Ip, &app.ip),
    ] {
        if is_blank(value) {
            violations.push(Violation::new(field, BLANK));
        }
    }
    if is_blank(app.phone()) {
        violations.push(Violation::new(Field::Phone, BLANK));
    }
    if app.adm_region.is_none() {
        violations.push(Violation::new(Field::AdmRegion, BLANK));
    }
    if app.experience_count.is_none() {
        violations.push(Violation::new(Field::ExperienceCount, BLANK));
    }
    if app.year_born.is_none() {
        violations.push(Violation::new(Field::YearBorn, BLANK));
    }
    if app.has_car.is_none() {
        violations.push(Violation::new(Field::HasCar, NOT_SPECIFIED));
    }
    if app.has_video.is_none() {
        violations.push(Violation::new(Field::HasVideo, NOT_SPECIFIED));
    }
    if email_of(app).is_none() && !subject.context.imported {
        violations.push(Violation::new(Field::Email, BLANK));
    }

    Ok(violations)
}

fn consent(subject: &Subject<'_>) -> Result<Vec<Violation>> {
    Ok(match subject.app.data_processing_allowed {
        Some(true) => vec![],
        _ => vec![Violation::new(Field::DataProcessingAllowed, NOT_ACCEPTED)],
    })
}

fn statuses(subject: &Subject<'_>) -> Result<Vec<Violation>> {
    let app = subject.app;
    let mut violations = vec![];

    if app.desired_statuses.is_empty() {
        violations.push(Violation::new(Field::DesiredStatuses, CHOOSE_AT_LEAST_ONE));
    }
    // The archived reserve role keeps its accessor for old records but is
    // no longer on offer.
    if app.desired_statuses.foreign_bits(Catalog::Future) != 0 {
        violations.push(Violation::new(Field::DesiredStatuses, UNKNOWN_ROLES));
    }
    if app.previous_statuses.foreign_bits(Catalog::Past) != 0 {
        violations.push(Violation::new(Field::PreviousStatuses, UNKNOWN_ROLES));
    }

    Ok(violations)
}

fn formats(subject: &Subject<'_>) -> Result<Vec<Violation>> {
    let app = subject.app;
    let mut violations = vec![];

    if let Some(email) = email_of(app) {
        if !email_regex().is_match(email.trim()) {
            violations.push(Violation::new(Field::Email, INVALID));
        }
    }
    if !is_blank(app.phone()) && !is_normalized(app.phone(), subject.config.phone_digits()) {
        violations.push(Violation::new(Field::Phone, INVALID));
    }
    if let Some(uic) = uic_of(app) {
        if !uic_regex().is_match(uic) {
            violations.push(Violation::new(Field::Uic, INVALID));
        }
    }

    Ok(violations)
}

fn range(subject: &Subject<'_>) -> Result<Vec<Violation>> {
    let app = subject.app;
    let config = subject.config;
    let mut violations = vec![];

    if app.legal_status.is_none() {
        violations.push(Violation::new(Field::LegalStatus, NOT_IN_LIST));
    }
    if let Some(year) = app.year_born {
        if year <= config.min_year_born() || year >= config.max_year_born() {
            violations.push(Violation::new(Field::YearBorn, BAD_YEAR));
        }
    }
    if app.sex_male.is_none() {
        violations.push(Violation::new(Field::SexMale, NOT_SPECIFIED));
    }

    Ok(violations)
}

fn experience(subject: &Subject<'_>) -> Result<Vec<Violation>> {
    let app = subject.app;
    let Some(count) = app.experience_count else {
        return Ok(vec![]);
    };
    let violation = if app.previous_statuses.is_empty() {
        (count != 0).then_some(EXPERIENCE_WITHOUT_ROLES)
    } else {
        (count <= 0).then_some(ROLES_WITHOUT_EXPERIENCE)
    };
    Ok(violation
        .map(|message| Violation::new(Field::ExperienceCount, message))
        .into_iter()
        .collect())
}

/// Phone numbers are unique among applications in the same state, so a
/// rejected applicant can apply again with the same number.
fn phone_uniqueness(subject: &Subject<'_>) -> Result<Vec<Violation>> {
    let app = subject.app;
    if is_blank(app.phone()) {
        return Ok(vec![]);
    }
    let others = subject.lookups.duplicates.count_others(
        ScanField::Phone,
        app.phone(),
        subject.id,
        Some(app.state()),
    )?;
    Ok(if others > 0 {
        vec![Violation::new(Field::Phone, TAKEN)]
    } else {
        vec![]
    })
}

fn regions(subject: &Subject<'_>) -> Result<Vec<Violation>> {
    let app = subject.app;
    let Some(region) = app.region else {
        return Ok(vec![]);
    };
    let parent = subject.lookups.regions.parent_of(region)?;
    Ok(if parent != app.adm_region {
        vec![Violation::new(Field::Region, REGION_OUTSIDE_ADM_REGION)]
    } else {
        vec![]
    })
}

/// Each listed station must exist and lie inside both the applicant's
/// district and administrative region. At most one violation per station.
fn stations(subject: &Subject<'_>) -> Result<Vec<Violation>> {
    let app = subject.app;
    let lookups = subject.lookups;
    let mut violations = vec![];

    for number in app.uic_numbers() {
        let Some(station) = lookups.stations.station(number)? else {
            violations.push(Violation::new(Field::Uic, station_not_found(number)));
            continue;
        };
        if let Some(region) = app.region {
            if !lookups.stations.belongs_to_region(&station, region)? {
                violations.push(Violation::new(Field::Uic, station_region_mismatch(number)));
                continue;
            }
        }
        if let Some(adm_region) = app.adm_region {
            if !lookups.stations.belongs_to_region(&station, adm_region)? {
                violations.push(Violation::new(
                    Field::Uic,
                    station_adm_region_mismatch(number),
                ));
            }
        }
    }

    Ok(violations)
}

/// New submissions need a verified phone.
fn phone_verified(subject: &Subject<'_>) -> Result<Vec<Violation>> {
    Ok(if subject.creating() && !subject.app.phone_verified() {
        vec![Violation::new(Field::Phone, PHONE_NOT_CONFIRMED)]
    } else {
        vec![]
    })
}
