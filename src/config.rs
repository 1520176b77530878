use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Validation configuration, read from a TOML file. Every key is optional
/// and falls back to the reference deployment's value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    min_year_born: i32,
    max_year_born: i32,
    phone_digits: usize,
    phone_verification: bool,
    phone_region: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_year_born: 1900,
            max_year_born: 2000,
            phone_digits: 10,
            phone_verification: true,
            phone_region: "RU".to_string(),
        }
    }
}

impl Config {
    /// Load the config from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml(&text)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse the config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        if config.min_year_born >= config.max_year_born {
            return Err(Error::Config(format!(
                "min_year_born ({}) must be below max_year_born ({})",
                config.min_year_born, config.max_year_born
            )));
        }
        Ok(config)
    }

    /// Year of birth must be strictly greater than this.
    pub fn min_year_born(&self) -> i32 {
        self.min_year_born
    }

    /// Year of birth must be strictly less than this.
    pub fn max_year_born(&self) -> i32 {
        self.max_year_born
    }

    /// Number of digits in a normalised phone number.
    pub fn phone_digits(&self) -> usize {
        self.phone_digits
    }

    /// Whether new submissions need a confirmed phone verification.
    /// When off, every phone counts as verified.
    pub fn phone_verification(&self) -> bool {
        self.phone_verification
    }

    /// Country code assumed for phone numbers without an international prefix.
    pub fn phone_region(&self) -> &str {
        &self.phone_region
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_override() {
        let config = Config::from_toml("phone_verification = false\nmax_year_born = 2010").unwrap();
        assert!(!config.phone_verification());
        assert_eq!(config.max_year_born(), 2010);
        assert_eq!(config.min_year_born(), 1900);
        assert_eq!(config.phone_digits(), 10);
        assert_eq!(config.phone_region(), "RU");
    }

    #[test]
    fn inverted_year_bounds() {
        let err = Config::from_toml("min_year_born = 2000\nmax_year_born = 1990").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn malformed() {
        assert!(Config::from_toml("phone_digits = \"ten\"").is_err());
        assert!(Config::from_file("no/such/config.toml").is_err());
    }
}
