//! Monetary amounts.
//!
//! All amounts in this system are integer minor units (cents for USD).
//! Conversion from any other representation happens at the HTTP boundary;
//! nothing downstream multiplies or divides by 100.

use serde::{Deserialize, Serialize};

use super::error::ServiceError;

/// An amount of money in the smallest denomination of its currency.
///
/// Construction validates the amount is strictly positive, so a held value
/// is always chargeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorUnits(i64);

impl MinorUnits {
    /// Validate and wrap a raw amount.
    pub fn new(value: i64) -> Result<Self, ServiceError> {
        if value <= 0 {
            return Err(ServiceError::validation(
                "amount",
                format!("must be greater than zero, got {}", value),
            ));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Currencies the portal accepts for new intents.
pub const SUPPORTED_CURRENCIES: [&str; 4] = ["aud", "usd", "eur", "gbp"];

/// Default currency when the caller omits one.
pub const DEFAULT_CURRENCY: &str = "usd";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_amount_accepted() {
        let amount = MinorUnits::new(5000).unwrap();
        assert_eq!(amount.value(), 5000);
    }

    #[test]
    fn zero_amount_rejected() {
        let err = MinorUnits::new(0).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { field: "amount", .. }));
    }

    #[test]
    fn negative_amount_rejected() {
        assert!(MinorUnits::new(-250).is_err());
    }

    #[test]
    fn serializes_as_bare_integer() {
        let amount = MinorUnits::new(1999).unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "1999");
    }

    #[test]
    fn deserializes_from_bare_integer() {
        let amount: MinorUnits = serde_json::from_str("42").unwrap();
        assert_eq!(amount.value(), 42);
    }
}
