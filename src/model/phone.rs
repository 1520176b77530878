use phonenumber::{country, metadata::DATABASE, Metadata};

use crate::config::Config;

/// Canonicalises free-form phone input into the stored digit format.
pub trait NormalizePhone {
    fn normalize(&self, raw: &str) -> String;
}

/// Normaliser backed by libphonenumber metadata: the stored form of a
/// number in the home region is its national significant number, so
/// `+7 (912) 345-67-89`, `8 912 345 67 89` and `9123456789` all become
/// `9123456789`. Numbers from other countries keep their calling code, e.g.
/// `+1 212 555 1234` becomes `12125551234`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneNormalizer {
    region: Option<country::Id>,
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self {
            region: Some(country::Id::RU),
        }
    }
}

impl PhoneNormalizer {
    pub fn new(region: Option<country::Id>) -> Self {
        Self { region }
    }

    pub fn from_config(config: &Config) -> Self {
        let region = config.phone_region().parse::<country::Id>().ok();
        if region.is_none() {
            warn!(
                "Unknown phone region `{}`, numbers must carry a country code",
                config.phone_region()
            );
        }
        Self { region }
    }

    /// Calling code of the home region, if it is known.
    fn home_code(&self) -> Option<u16> {
        let region = self.region?;
        let id: &str = region.as_ref();
        DATABASE.by_id(id).map(Metadata::country_code)
    }
}

impl NormalizePhone for PhoneNormalizer {
    fn normalize(&self, raw: &str) -> String {
        match phonenumber::parse(self.region, raw) {
            Ok(number) => {
                let national = number.national();
                let zeros = "0".repeat(national.zeros() as usize);
                let code = number.code().value();
                if self.home_code() == Some(code) {
                    format!("{zeros}{}", national.value())
                } else {
                    format!("{code}{zeros}{}", national.value())
                }
            }
            // Unparseable input keeps its digits so format checks can report it.
            Err(_) => raw.chars().filter(char::is_ascii_digit).collect(),
        }
    }
}

/// True iff `phone` is exactly `digits` ASCII digits.
pub fn is_normalized(phone: &str, digits: usize) -> bool {
    phone.len() == digits && phone.bytes().all(|b| b.is_ascii_digit())
}
