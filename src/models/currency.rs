//! The closed set of currencies a transaction can be denominated in.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// A currency supported by the application.
///
/// The set is closed: amounts in any other currency are rejected at the
/// boundary, which keeps rate lookups total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// United States dollar.
    Usd,
    /// Angolan kwanza.
    Aoa,
    /// Euro.
    Eur,
}

impl Currency {
    /// Every supported currency, in display order.
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Aoa, Currency::Eur];

    /// The ISO 4217 code for the currency.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Aoa => "AOA",
            Currency::Eur => "EUR",
        }
    }

    /// Stable position of the currency within [Currency::ALL].
    pub(crate) fn index(&self) -> usize {
        match self {
            Currency::Usd => 0,
            Currency::Aoa => 1,
            Currency::Eur => 2,
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The error returned when parsing a string that is not a supported currency
/// code.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("the currency must be one of 'USD', 'AOA' or 'EUR'")]
pub struct UnknownCurrency;

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Currency::Usd),
            "AOA" => Ok(Currency::Aoa),
            "EUR" => Ok(Currency::Eur),
            _ => Err(UnknownCurrency),
        }
    }
}
