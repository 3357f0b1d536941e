use crate::{
    error::WagerError,
    wallet::Balance,
};
use std::fmt;

pub const DEFAULT_WAGER_INPUT: &str = "0.01";

/// A strictly positive, finite bet in ETH.
#[derive(PartialEq, PartialOrd, Debug, Copy, Clone)]
pub struct Wager(f64);

impl Wager {
    pub fn new(amount: f64) -> Result<Self, WagerError> {
        if amount.is_finite() && amount > 0.0 {
            Ok(Self(amount))
        } else {
            Err(WagerError::InvalidAmount)
        }
    }

    /// Parse user input and check it against the wallet's reported balance.
    /// A missing balance counts as zero.
    pub fn parse(input: &str, balance: Option<&Balance>) -> Result<Self, WagerError> {
        let amount = input
            .trim()
            .parse::<f64>()
            .map_err(|_| WagerError::InvalidAmount)?;
        let wager = Self::new(amount)?;
        let available = balance.map(Balance::amount).unwrap_or(0.0);
        if wager.0 > available {
            return Err(WagerError::InsufficientBalance {
                requested: wager.0,
                available,
            });
        }
        Ok(wager)
    }

    pub fn amount(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Wager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ETH", self.0)
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    fn balance(formatted: &str) -> Balance {
        Balance::new(formatted)
    }

    #[test]
    fn parse__accepts_positive_amount_within_balance() {
        let wager = Wager::parse(" 0.01 ", Some(&balance("0.5"))).unwrap();
        assert_eq!(wager.amount(), 0.01);
    }

    #[test]
    fn new__rejects_non_positive_and_non_finite_amounts() {
        for amount in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(Wager::new(amount), Err(WagerError::InvalidAmount));
        }
        assert_eq!(Wager::new(0.5).map(|w| w.amount()), Ok(0.5));
    }

    #[test]
    fn parse__rejects_non_numeric_and_non_positive_input() {
        let funds = balance("10");
        for input in ["", "abc", "0", "-1", "NaN", "inf"] {
            assert_eq!(
                Wager::parse(input, Some(&funds)),
                Err(WagerError::InvalidAmount),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn parse__rejects_amount_above_balance() {
        let err = Wager::parse("1.5", Some(&balance("1.0"))).unwrap_err();
        assert_eq!(
            err,
            WagerError::InsufficientBalance {
                requested: 1.5,
                available: 1.0
            }
        );
    }

    #[test]
    fn parse__missing_balance_counts_as_zero() {
        let err = Wager::parse("0.01", None).unwrap_err();
        assert!(matches!(err, WagerError::InsufficientBalance { .. }));
    }

    #[test]
    fn parse__amount_equal_to_balance_is_allowed() {
        assert!(Wager::parse("0.25", Some(&balance("0.25"))).is_ok());
    }
}
