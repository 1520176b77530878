//! In-memory reference data answering every lookup interface. Loaded from
//! JSON by the checker binary and used as the collaborator in tests.

use serde::{Deserialize, Serialize};

use crate::model::{
    application::{Application, ApplicationId},
    lookup::{
        BlacklistEntry, BlacklistLookup, DuplicateScan, LookupResult, Region, RegionId,
        RegionLookup, ScanField, Station, StationLookup, VerificationLookup,
    },
    state::ApplicationState,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceData {
    pub regions: Vec<Region>,
    pub stations: Vec<Station>,
    /// Phones with a confirmed verification.
    pub verified_phones: Vec<String>,
    pub blacklist: Vec<BlacklistEntry>,
    /// Applications already on record, for duplicate scans.
    pub applications: Vec<Application>,
}

impl ReferenceData {
    pub fn with_region(mut self, id: RegionId, name: &str, parent: Option<RegionId>) -> Self {
        self.regions.push(Region {
            id,
            name: name.to_string(),
            parent,
        });
        self
    }

    pub fn with_station(mut self, number: &str, region: RegionId) -> Self {
        self.stations.push(Station {
            number: number.to_string(),
            region,
        });
        self
    }

    pub fn with_verified_phone(mut self, phone: &str) -> Self {
        self.verified_phones.push(phone.to_string());
        self
    }

    pub fn with_blacklisted(mut self, phone: &str, reason: Option<&str>) -> Self {
        self.blacklist.push(BlacklistEntry {
            phone: phone.to_string(),
            reason: reason.map(str::to_string),
        });
        self
    }

    pub fn with_application(mut self, application: Application) -> Self {
        self.applications.push(application);
        self
    }
}

impl RegionLookup for ReferenceData {
    fn region(&self, id: RegionId) -> LookupResult<Option<Region>> {
        Ok(self.regions.iter().find(|r| r.id == id).cloned())
    }
}

impl StationLookup for ReferenceData {
    fn station(&self, number: &str) -> LookupResult<Option<Station>> {
        Ok(self.stations.iter().find(|s| s.number == number).cloned())
    }

    fn belongs_to_region(&self, station: &Station, region: RegionId) -> LookupResult<bool> {
        let mut current = Some(station.region);
        // Bounded by the region count so a parent cycle cannot spin forever.
        for _ in 0..=self.regions.len() {
            match current {
                Some(id) if id == region => return Ok(true),
                Some(id) => current = self.parent_of(id)?,
                None => break,
            }
        }
        Ok(false)
    }
}

impl VerificationLookup for ReferenceData {
    fn is_confirmed(&self, phone: &str) -> LookupResult<bool> {
        Ok(self.verified_phones.iter().any(|p| p == phone))
    }
}

impl BlacklistLookup for ReferenceData {
    fn entry_for_phone(&self, phone: &str) -> LookupResult<Option<BlacklistEntry>> {
        Ok(self.blacklist.iter().find(|e| e.phone == phone).cloned())
    }
}

impl DuplicateScan for ReferenceData {
    fn count_others(
        &self,
        field: ScanField,
        value: &str,
        exclude: Option<ApplicationId>,
        state: Option<ApplicationState>,
    ) -> LookupResult<u64> {
        let count = self
            .applications
            .iter()
            .filter(|app| Some(app.id) != exclude)
            .filter(|app| state.map_or(true, |s| app.state() == s))
            .filter(|app| match field {
                ScanField::Phone => app.phone() == value,
                ScanField::Email => app.email.as_deref() == Some(value),
            })
            .count();
        Ok(count as u64)
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl ReferenceData {
        /// Two administrative regions with one district each, stations in
        /// both, and a verification for [`ApplicationCore::example`]'s phone.
        ///
        /// [`ApplicationCore::example`]: crate::model::application::ApplicationCore::example
        pub fn example() -> Self {
            Self::default()
                .with_region(1, "Central", None)
                .with_region(11, "Arbat", Some(1))
                .with_region(2, "Northern", None)
                .with_region(21, "Airport", Some(2))
                .with_station("100", 11)
                .with_station("101", 11)
                .with_station("200", 21)
                .with_station("300", 2)
                .with_verified_phone("9123456789")
                .with_verified_phone("9160001122")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::application::ApplicationCore;

    #[test]
    fn region_parents() {
        let data = ReferenceData::example();
        assert_eq!(data.parent_of(11).unwrap(), Some(1));
        assert_eq!(data.parent_of(1).unwrap(), None);
        assert_eq!(data.parent_of(99).unwrap(), None);
        assert_eq!(data.region(21).unwrap().unwrap().name, "Airport");
    }

    #[test]
    fn station_ownership() {
        let data = ReferenceData::example();
        let station = data.station("100").unwrap().unwrap();
        assert!(data.belongs_to_region(&station, 11).unwrap());
        assert!(data.belongs_to_region(&station, 1).unwrap());
        assert!(!data.belongs_to_region(&station, 2).unwrap());

        let direct = data.station("300").unwrap().unwrap();
        assert!(data.belongs_to_region(&direct, 2).unwrap());
        assert!(!data.belongs_to_region(&direct, 21).unwrap());
        assert!(data.station("999").unwrap().is_none());
    }

    #[test]
    fn parent_cycle_terminates() {
        let data = ReferenceData::default()
            .with_region(1, "A", Some(2))
            .with_region(2, "B", Some(1))
            .with_station("5", 1);
        let station = data.station("5").unwrap().unwrap();
        assert!(!data.belongs_to_region(&station, 3).unwrap());
    }

    #[test]
    fn duplicate_counts() {
        let mut rejected = Application::new(2, ApplicationCore::example());
        rejected.reject().unwrap();
        let data = ReferenceData::example()
            .with_application(Application::new(1, ApplicationCore::example()))
            .with_application(rejected);

        let phone = "9123456789";
        assert_eq!(data.count_others(ScanField::Phone, phone, None, None).unwrap(), 2);
        assert_eq!(data.count_others(ScanField::Phone, phone, Some(1), None).unwrap(), 1);
        assert_eq!(
            data.count_others(ScanField::Phone, phone, None, Some(ApplicationState::Pending))
                .unwrap(),
            1
        );
        assert_eq!(
            data.count_others(ScanField::Email, "ivan.petrov@example.com", Some(2), None)
                .unwrap(),
            1
        );
        assert_eq!(data.count_others(ScanField::Email, "x@y.z", None, None).unwrap(), 0);
    }

    #[test]
    fn blacklist() {
        let data = ReferenceData::example().with_blacklisted("9123456789", Some("spam bot"));
        let app = ApplicationCore::example();
        let entry = app.blacklist_entry(&data).unwrap().unwrap();
        assert_eq!(entry.reason.as_deref(), Some("spam bot"));
        assert!(ApplicationCore::example2().blacklist_entry(&data).unwrap().is_none());
    }

    #[test]
    fn loads_from_json() {
        let json = r#"{
            "regions": [{"id": 1, "name": "Central"}, {"id": 11, "name": "Arbat", "parent": 1}],
            "stations": [{"number": "100", "region": 11}],
            "verified_phones": ["9123456789"]
        }"#;
        let data: ReferenceData = serde_json::from_str(json).unwrap();
        assert_eq!(data.parent_of(11).unwrap(), Some(1));
        assert!(data.is_confirmed("9123456789").unwrap());
        assert!(data.applications.is_empty());
    }
}
