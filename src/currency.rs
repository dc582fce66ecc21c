//! The currencies a transaction can be recorded in.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::Error;

/// An ISO 4217 currency code.
///
/// The currency is a display tag. Amounts in different currencies are never
/// converted and are summed as-is by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// United States dollar.
    Usd,
    /// Euro.
    Eur,
    /// Pound sterling.
    Gbp,
    /// Japanese yen.
    Jpy,
    /// Canadian dollar.
    Cad,
    /// Australian dollar.
    Aud,
    /// Indian rupee.
    #[default]
    Inr,
    /// Swiss franc.
    Chf,
    /// Renminbi.
    Cny,
    /// Brazilian real.
    Brl,
}

impl Currency {
    /// Every supported currency, in the order they are offered to the user.
    pub const ALL: [Currency; 10] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Cad,
        Currency::Aud,
        Currency::Inr,
        Currency::Chf,
        Currency::Cny,
        Currency::Brl,
    ];

    /// The three-letter currency code, e.g. "INR".
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Inr => "INR",
            Currency::Chf => "CHF",
            Currency::Cny => "CNY",
            Currency::Brl => "BRL",
        }
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|currency| currency.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidCurrency(s.to_owned()))
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl ToSql for Currency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for Currency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_str()?;

        code.parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, currency::Currency};

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("usd".parse(), Ok(Currency::Usd));
        assert_eq!("BRL".parse(), Ok(Currency::Brl));
        assert_eq!(" eur ".parse(), Ok(Currency::Eur));
    }

    #[test]
    fn rejects_unknown_code() {
        assert_eq!(
            "XYZ".parse::<Currency>(),
            Err(Error::InvalidCurrency("XYZ".to_owned()))
        );
    }

    #[test]
    fn default_is_rupee() {
        assert_eq!(Currency::default(), Currency::Inr);
    }

    #[test]
    fn serializes_as_code() {
        let json = serde_json::to_string(&Currency::Jpy).unwrap();

        assert_eq!(json, "\"JPY\"");
        assert_eq!(
            serde_json::from_str::<Currency>("\"CHF\"").unwrap(),
            Currency::Chf
        );
    }
}
