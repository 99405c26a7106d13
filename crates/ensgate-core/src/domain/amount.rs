use std::fmt::{Display, Formatter};

use crate::error::ValidationError;

const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;
const ETH_DECIMALS: usize = 18;

pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Integer wei amount as returned by the price query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Wei(u128);

impl Wei {
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Parses a non-negative decimal string.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(ValidationError::InvalidWei {
                value: input.to_owned(),
            });
        }

        trimmed
            .parse::<u128>()
            .map(Self)
            .map_err(|_| ValidationError::WeiOverflow)
    }

    pub fn checked_add(self, other: Self) -> Result<Self, ValidationError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(ValidationError::WeiOverflow)
    }

    /// ETH rendering with up to 18 decimals and trailing zeros trimmed.
    pub fn format_ether(self) -> String {
        let whole = self.0 / WEI_PER_ETH;
        let fraction = self.0 % WEI_PER_ETH;
        if fraction == 0 {
            return whole.to_string();
        }

        let digits = format!("{fraction:0width$}", width = ETH_DECIMALS);
        format!("{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl Display for Wei {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_ether())
    }
}

/// Registration length in whole years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationDuration {
    years: u64,
}

impl RegistrationDuration {
    pub fn from_years(years: u64) -> Result<Self, ValidationError> {
        if years == 0 || years.checked_mul(SECONDS_PER_YEAR).is_none() {
            return Err(ValidationError::InvalidDuration { years });
        }
        Ok(Self { years })
    }

    pub const fn years(self) -> u64 {
        self.years
    }

    pub const fn as_seconds(self) -> u64 {
        self.years * SECONDS_PER_YEAR
    }
}

impl Default for RegistrationDuration {
    fn default() -> Self {
        Self { years: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_and_fractional_ether() {
        assert_eq!(Wei::new(0).format_ether(), "0");
        assert_eq!(Wei::new(2 * WEI_PER_ETH).format_ether(), "2");
        assert_eq!(Wei::new(1_500_000_000_000_000).format_ether(), "0.0015");
        assert_eq!(Wei::new(1).format_ether(), "0.000000000000000001");
    }

    #[test]
    fn parses_decimal_strings_only() {
        assert_eq!(
            Wei::parse(" 3125000000000000 ").expect("parse"),
            Wei::new(3_125_000_000_000_000)
        );
        assert!(matches!(Wei::parse("-1"), Err(ValidationError::InvalidWei { .. })));
        assert!(matches!(Wei::parse("0x10"), Err(ValidationError::InvalidWei { .. })));
        assert_eq!(
            Wei::parse("999999999999999999999999999999999999999999"),
            Err(ValidationError::WeiOverflow)
        );
    }

    #[test]
    fn duration_is_whole_positive_years() {
        assert_eq!(RegistrationDuration::default().as_seconds(), 31_536_000);
        assert_eq!(
            RegistrationDuration::from_years(2).expect("valid").as_seconds(),
            63_072_000
        );
        assert_eq!(
            RegistrationDuration::from_years(0),
            Err(ValidationError::InvalidDuration { years: 0 })
        );
    }
}
