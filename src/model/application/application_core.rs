use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::{
    error::{Error, Result},
    model::{
        lookup::{BlacklistEntry, BlacklistLookup, LookupResult, RegionId},
        phone::NormalizePhone,
        social::{SocialLinks, SocialNetwork},
        state::{ApplicationState, Event},
        status::{Checkbox, StatusBits, StatusMask},
    },
};

use super::accessors::find_accessor;

/// Whether the applicant has legal training.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum LegalStatus {
    No = 0,
    Yes = 1,
    Lawyer = 3,
}

/// Facts about a submission that are not stored on the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionContext {
    /// Brought in from an external list; e-mail becomes optional.
    pub imported: bool,
    /// Treat the phone as verified without asking the verification service.
    pub skip_phone_verification: bool,
    /// Do not send the confirmation e-mail after creation.
    pub skip_email_confirmation: bool,
}

impl SubmissionContext {
    pub fn imported() -> Self {
        Self {
            imported: true,
            ..Self::default()
        }
    }

    /// Whether the transport layer should e-mail a confirmation link once the
    /// record is created.
    pub fn wants_email_confirmation(&self) -> bool {
        !self.skip_email_confirmation
    }
}

/// Core application data, as stored in the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationCore {
    pub first_name: String,
    pub last_name: String,
    pub patronymic: String,
    pub email: Option<String>,
    /// Normalised on write; see [`ApplicationCore::set_phone`].
    phone: String,
    /// District.
    pub region: Option<RegionId>,
    /// Administrative region the district belongs to.
    pub adm_region: Option<RegionId>,
    /// Comma-separated polling station numbers.
    pub uic: Option<String>,
    pub desired_statuses: StatusMask,
    pub previous_statuses: StatusMask,
    pub experience_count: Option<i32>,
    pub sex_male: Option<bool>,
    pub year_born: Option<i32>,
    pub legal_status: Option<LegalStatus>,
    pub has_car: Option<bool>,
    pub has_video: Option<bool>,
    pub ip: String,
    pub data_processing_allowed: Option<bool>,
    pub social_accounts: SocialLinks,
    confirmed_at: Option<DateTime<Utc>>,
    phone_verified: bool,
    state: ApplicationState,
}

impl ApplicationCore {
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Store a phone number in canonical form.
    pub fn set_phone(&mut self, raw: &str, normalizer: &impl NormalizePhone) {
        self.phone = normalizer.normalize(raw);
    }

    /// Re-normalise the stored phone, e.g. after deserialising a raw submission.
    pub fn normalize_phone(&mut self, normalizer: &impl NormalizePhone) {
        self.phone = normalizer.normalize(&self.phone);
    }

    pub fn state(&self) -> ApplicationState {
        self.state
    }

    /// Apply a lifecycle event. Illegal events leave the state untouched.
    pub fn fire(&mut self, event: Event) -> Result<()> {
        self.state.fire(event)
    }

    pub fn spam(&mut self) -> Result<()> {
        self.fire(Event::Spam)
    }

    pub fn reject(&mut self) -> Result<()> {
        self.fire(Event::Reject)
    }

    pub fn set_imported(&mut self) -> Result<()> {
        self.fire(Event::SetImported)
    }

    pub fn approve(&mut self) -> Result<()> {
        self.fire(Event::Approve)
    }

    pub fn is_reviewed(&self) -> bool {
        self.state == ApplicationState::Approved
    }

    pub fn can_be(&self, status: StatusBits) -> bool {
        self.desired_statuses.has(status)
    }

    pub fn was(&self, status: StatusBits) -> bool {
        self.previous_statuses.has(status)
    }

    /// Read a role flag by accessor name, e.g. `can_be_mobile`.
    pub fn flag(&self, accessor: &str) -> Result<bool> {
        find_accessor(accessor)
            .map(|a| a.get(self))
            .ok_or_else(|| Error::UnknownAccessor(accessor.to_string()))
    }

    /// Write a role flag by accessor name.
    pub fn set_flag(&mut self, accessor: &str, value: impl Into<Checkbox>) -> Result<()> {
        let accessor =
            find_accessor(accessor).ok_or_else(|| Error::UnknownAccessor(accessor.to_string()))?;
        accessor.set(self, value.into());
        Ok(())
    }

    pub fn social(&self, network: SocialNetwork) -> Option<&str> {
        self.social_accounts.get(network)
    }

    pub fn set_social(&mut self, network: SocialNetwork, link: Option<String>) {
        self.social_accounts.set(network, link)
    }

    /// Read a social link by accessor name, e.g. `social_vk`.
    pub fn social_by_accessor(&self, accessor: &str) -> Result<Option<&str>> {
        let network = SocialNetwork::from_accessor(accessor)
            .ok_or_else(|| Error::UnknownAccessor(accessor.to_string()))?;
        Ok(self.social(network))
    }

    pub fn set_social_by_accessor(&mut self, accessor: &str, link: Option<String>) -> Result<()> {
        let network = SocialNetwork::from_accessor(accessor)
            .ok_or_else(|| Error::UnknownAccessor(accessor.to_string()))?;
        self.set_social(network, link);
        Ok(())
    }

    /// Mark the application as confirmed at the given time.
    pub fn confirm(&mut self, at: DateTime<Utc>) {
        self.confirmed_at = Some(at);
    }

    /// Confirmation via the e-mailed link.
    pub fn confirm_email(&mut self, at: DateTime<Utc>) {
        self.confirm(at)
    }

    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }

    pub fn confirm_phone(&mut self) {
        self.phone_verified = true;
    }

    pub fn phone_verified(&self) -> bool {
        self.phone_verified
    }

    pub(crate) fn set_phone_verified(&mut self, verified: bool) {
        self.phone_verified = verified;
    }

    /// Last name, first name, patronymic.
    pub fn full_name(&self) -> String {
        [&self.last_name, &self.first_name, &self.patronymic]
            .into_iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Polling station numbers listed in `uic`, trimmed, empties skipped.
    pub fn uic_numbers(&self) -> Vec<&str> {
        self.uic
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .collect()
    }

    /// Whether `number` is one of the listed stations.
    pub fn uic_contains(&self, number: &str) -> bool {
        self.uic_numbers().contains(&number.trim())
    }

    /// Whether `number` is the only listed station.
    pub fn uic_equals(&self, number: &str) -> bool {
        self.uic_numbers() == [number.trim()]
    }

    pub fn blacklist_entry(
        &self,
        blacklist: &dyn BlacklistLookup,
    ) -> LookupResult<Option<BlacklistEntry>> {
        blacklist.entry_for_phone(&self.phone)
    }
}
