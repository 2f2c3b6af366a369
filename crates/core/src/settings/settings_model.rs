use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SYSTEM_CURRENCY, MIN_ALLOCATION_ROWS, RATE_PRECISION};
use crate::errors::{Error, Result};
use crate::utils::time_utils::{business_date_today, DEFAULT_BUSINESS_TZ};

/// Engine configuration supplied by the host application.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Currency statistics are summed in and foreign invoices are converted to
    pub system_currency: String,
    /// IANA timezone name used to derive "today"
    pub timezone: String,
    /// Decimal places kept for exchange rates
    pub rate_precision: u32,
    /// Allocation rows a position with a non-zero net amount always keeps
    pub min_allocation_rows: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            system_currency: DEFAULT_SYSTEM_CURRENCY.to_string(),
            timezone: DEFAULT_BUSINESS_TZ.name().to_string(),
            rate_precision: RATE_PRECISION,
            min_allocation_rows: MIN_ALLOCATION_ROWS,
        }
    }
}

impl Settings {
    /// Parses settings from JSON; missing keys fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.system_currency.trim().is_empty() {
            return Err(Error::InvalidConfigValue(
                "systemCurrency must not be empty".to_string(),
            ));
        }
        self.tz()?;
        if self.min_allocation_rows == 0 {
            return Err(Error::InvalidConfigValue(
                "minAllocationRows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|_| {
            Error::InvalidConfigValue(format!("unknown timezone '{}'", self.timezone))
        })
    }

    /// Today's business date in the configured timezone.
    pub fn today(&self) -> Result<NaiveDate> {
        Ok(business_date_today(self.tz()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.system_currency, "EUR");
        assert_eq!(settings.rate_precision, 6);
        assert_eq!(settings.min_allocation_rows, 1);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_missing_keys() {
        let settings = Settings::from_json(r#"{"systemCurrency":"CHF"}"#).unwrap();
        assert_eq!(settings.system_currency, "CHF");
        assert_eq!(settings.timezone, "Europe/Berlin");
    }

    #[test]
    fn test_invalid_timezone_is_rejected() {
        let err = Settings::from_json(r#"{"timezone":"Mars/Olympus"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue(_)));
    }

    #[test]
    fn test_zero_allocation_floor_is_rejected() {
        let settings = Settings {
            min_allocation_rows: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
