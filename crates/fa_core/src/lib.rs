//! fa_core: Core types, domains, rounding and ordering helpers.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`fa_algo`, `fa_io`, `fa_pipeline`, `fa_report`, `fa_cli`).
//!
//! - Tokens: `BlockLetter`, `Period` (YYYY-MM)
//! - Inputs: `Unit`, `ExpenseSnapshot`, `BlockDescriptor`, `Announcement`
//! - Computed: `FeeBreakdown`, `BlockSummary`, `ExpenseDetailRow`, `CacheBundle`
//! - Money rounding (2 dp, midpoint away from zero, fixed scale)
//! - Configuration variables: `UtilityRule`, `ExemplarPolicy`, `EngineConfig`

#![forbid(unsafe_code)]

pub mod computed;
pub mod determinism;
pub mod entities;
pub mod money;
pub mod variables;

pub use rust_decimal::Decimal;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidBlock(String),
        InvalidPeriod(String),
        InvalidZone(u8),
        NonPositiveArea { unit: String },
        NegativeAmount(&'static str),
        DomainOutOfRange(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidBlock(s) => write!(f, "invalid block letter: {s:?}"),
                CoreError::InvalidPeriod(s) => write!(f, "invalid period (expected YYYY-MM): {s:?}"),
                CoreError::InvalidZone(z) => write!(f, "heating zone {z} is not configured"),
                CoreError::NonPositiveArea { unit } => write!(f, "unit {unit}: floor area must be > 0"),
                CoreError::NegativeAmount(k) => write!(f, "expense category {k} is negative"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod tokens {
    //! Block letters and billing periods.

    use crate::errors::CoreError;
    use chrono::{Datelike, NaiveDate, Utc};
    use core::fmt;
    use core::str::FromStr;
    use serde::{Deserialize, Serialize};

    /// Block identifier: 1..=4 ASCII alphanumerics, stored upper-case.
    #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    pub struct BlockLetter(String);

    impl BlockLetter {
        pub fn as_str(&self) -> &str { &self.0 }
    }

    impl fmt::Display for BlockLetter {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
    }

    impl FromStr for BlockLetter {
        type Err = CoreError;
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let t = s.trim();
            let ok = (1..=4).contains(&t.len()) && t.bytes().all(|b| b.is_ascii_alphanumeric());
            if ok { Ok(Self(t.to_ascii_uppercase())) } else { Err(CoreError::InvalidBlock(s.to_string())) }
        }
    }

    impl TryFrom<String> for BlockLetter {
        type Error = CoreError;
        fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
    }

    impl From<BlockLetter> for String {
        fn from(b: BlockLetter) -> Self { b.0 }
    }

    /// Calendar month a period's expenses are aggregated over. Wire form `YYYY-MM`.
    #[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    pub struct Period {
        year: u16,
        month: u8,
    }

    impl Period {
        pub fn new(year: u16, month: u8) -> Result<Self, CoreError> {
            if (1..=12).contains(&month) && (1000..=9999).contains(&year) {
                Ok(Self { year, month })
            } else {
                Err(CoreError::InvalidPeriod(format!("{year}-{month}")))
            }
        }

        pub fn year(&self) -> u16 { self.year }
        pub fn month(&self) -> u8 { self.month }

        /// Period containing `date`.
        pub fn from_date(date: NaiveDate) -> Self {
            Self { year: date.year() as u16, month: date.month() as u8 }
        }

        /// Period of the current UTC date.
        pub fn current() -> Self {
            Self::from_date(Utc::now().date_naive())
        }
    }

    impl fmt::Display for Period {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:04}-{:02}", self.year, self.month)
        }
    }

    impl FromStr for Period {
        type Err = CoreError;
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let bad = || CoreError::InvalidPeriod(s.to_string());
            let b = s.as_bytes();
            if b.len() != 7 || b[4] != b'-' {
                return Err(bad());
            }
            if !b.iter().enumerate().all(|(i, c)| i == 4 || c.is_ascii_digit()) {
                return Err(bad());
            }
            let year: u16 = s[..4].parse().map_err(|_| bad())?;
            let month: u8 = s[5..].parse().map_err(|_| bad())?;
            Period::new(year, month).map_err(|_| bad())
        }
    }

    impl TryFrom<String> for Period {
        type Error = CoreError;
        fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
    }

    impl From<Period> for String {
        fn from(p: Period) -> Self { p.to_string() }
    }
}

pub use errors::CoreError;
pub use tokens::{BlockLetter, Period};
