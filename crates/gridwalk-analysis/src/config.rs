//! Analysis configuration.

use gridwalk_core::NetworkState;
use std::error::Error;
use std::fmt;

// ── ConfigError ─────────────────────────────────────────────────

/// Errors detected by [`SwerConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The low-voltage band starts at 0 V, which would admit equipment
    /// with no voltage recorded.
    ZeroLowerBound,
    /// The low-voltage band's lower bound exceeds its upper bound.
    InvertedBand {
        /// Configured lower bound.
        min: u32,
        /// Configured upper bound.
        max: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLowerBound => write!(f, "lv_min_volts must be at least 1"),
            Self::InvertedBand { min, max } => {
                write!(f, "lv_min_volts {min} exceeds lv_max_volts {max}")
            }
        }
    }
}

impl Error for ConfigError {}

// ── SwerConfig ──────────────────────────────────────────────────

/// Settings for [`FindSwerEquipment`](crate::FindSwerEquipment).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwerConfig {
    /// Lowest base voltage counted as LV, inclusive. Default: 1.
    pub lv_min_volts: u32,
    /// Highest base voltage counted as LV, inclusive. Default: 1000.
    pub lv_max_volts: u32,
    /// Switch state the traces respect. Default: normal.
    pub state: NetworkState,
}

impl Default for SwerConfig {
    fn default() -> Self {
        Self {
            lv_min_volts: 1,
            lv_max_volts: 1000,
            state: NetworkState::Normal,
        }
    }
}

impl SwerConfig {
    /// Check the voltage band.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lv_min_volts == 0 {
            return Err(ConfigError::ZeroLowerBound);
        }
        if self.lv_min_volts > self.lv_max_volts {
            return Err(ConfigError::InvertedBand {
                min: self.lv_min_volts,
                max: self.lv_max_volts,
            });
        }
        Ok(())
    }

    /// Whether `base_voltage` lies in the LV band. Unknown voltages do not.
    pub fn is_lv(&self, base_voltage: Option<u32>) -> bool {
        base_voltage.is_some_and(|v| (self.lv_min_volts..=self.lv_max_volts).contains(&v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_band_is_valid() {
        let config = SwerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert!(config.is_lv(Some(1)));
        assert!(config.is_lv(Some(415)));
        assert!(config.is_lv(Some(1000)));
        assert!(!config.is_lv(Some(1001)));
        assert!(!config.is_lv(None));
    }

    #[test]
    fn rejects_bad_bands() {
        let zero = SwerConfig {
            lv_min_volts: 0,
            ..SwerConfig::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::ZeroLowerBound));

        let inverted = SwerConfig {
            lv_min_volts: 500,
            lv_max_volts: 400,
            ..SwerConfig::default()
        };
        let err = inverted.validate().unwrap_err();
        assert_eq!(err, ConfigError::InvertedBand { min: 500, max: 400 });
        assert_eq!(err.to_string(), "lv_min_volts 500 exceeds lv_max_volts 400");
    }
}
