//! Swap fee tiers
//!
//! Pairs trading an ordinary token charge 0.3%; pairs trading a restricted
//! (security) token charge 1%. Both are expressed as `numerator/denominator`
//! of the input that actually reaches the curve.

use ixs_config::constants::fees;
use ixs_config::FeeConfig;
use ixs_types::U256;
use thiserror::Error;

/// Standard tier: 997/1000 of the input is priced
pub const STANDARD_FEE_NUMERATOR: u32 = fees::STANDARD_NUMERATOR;
/// Restricted tier: 990/1000 of the input is priced
pub const RESTRICTED_FEE_NUMERATOR: u32 = fees::RESTRICTED_NUMERATOR;
/// Shared denominator
pub const FEE_DENOMINATOR: u32 = fees::DENOMINATOR;

/// Rejected fee parameters
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeeError {
    #[error("fee {numerator}/{denominator} must satisfy 0 < numerator <= denominator")]
    OutOfRange { numerator: u32, denominator: u32 },
}

/// One fee tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fee {
    pub numerator: u32,
    pub denominator: u32,
}

impl Fee {
    /// Validated constructor: `0 < numerator <= denominator`
    pub fn new(numerator: u32, denominator: u32) -> Result<Self, FeeError> {
        if numerator == 0 || denominator == 0 || numerator > denominator {
            return Err(FeeError::OutOfRange {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator_u256(&self) -> U256 {
        U256::from(self.numerator)
    }

    pub fn denominator_u256(&self) -> U256 {
        U256::from(self.denominator)
    }

    /// Share of the input kept by the pool, in `denominator` units
    pub fn retained(&self) -> U256 {
        U256::from(self.denominator - self.numerator)
    }
}

/// Fee tiers by pair kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeSchedule {
    pub standard: Fee,
    pub restricted: Fee,
}

impl FeeSchedule {
    pub fn new(standard: Fee, restricted: Fee) -> Self {
        Self {
            standard,
            restricted,
        }
    }

    /// Validated schedule from deployment configuration
    pub fn from_config(config: &FeeConfig) -> Result<Self, FeeError> {
        Ok(Self {
            standard: Fee::new(config.standard_numerator, config.denominator)?,
            restricted: Fee::new(config.restricted_numerator, config.denominator)?,
        })
    }

    /// Fee applied to a pair of the given kind
    pub fn for_pair(&self, restricted: bool) -> Fee {
        if restricted {
            self.restricted
        } else {
            self.standard
        }
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            standard: Fee {
                numerator: STANDARD_FEE_NUMERATOR,
                denominator: FEE_DENOMINATOR,
            },
            restricted: Fee {
                numerator: RESTRICTED_FEE_NUMERATOR,
                denominator: FEE_DENOMINATOR,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers() {
        let fees = FeeSchedule::default();
        assert_eq!(fees.for_pair(false).numerator, 997);
        assert_eq!(fees.for_pair(true).numerator, 990);
        assert_eq!(fees.for_pair(true).retained(), U256::from(10));
    }

    #[test]
    fn test_fee_validation() {
        assert!(Fee::new(997, 1000).is_ok());
        assert!(Fee::new(1000, 1000).is_ok());
        assert!(Fee::new(0, 1000).is_err());
        assert!(Fee::new(1001, 1000).is_err());
        assert!(Fee::new(1, 0).is_err());
    }

    #[test]
    fn test_schedule_from_config() {
        let fees = FeeSchedule::from_config(&FeeConfig::default()).unwrap();
        assert_eq!(fees, FeeSchedule::default());

        let config = FeeConfig {
            restricted_numerator: 0,
            ..FeeConfig::default()
        };
        assert_eq!(
            FeeSchedule::from_config(&config).unwrap_err(),
            FeeError::OutOfRange {
                numerator: 0,
                denominator: 1000
            }
        );
    }
}
