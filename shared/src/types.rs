//! Common types used across the platform

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar granularity used to bucket time-stamped records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
            Granularity::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Granularity::Daily),
            "weekly" => Ok(Granularity::Weekly),
            "monthly" => Ok(Granularity::Monthly),
            "yearly" => Ok(Granularity::Yearly),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Time range of the sales report. Selects both the lookback window and
/// the trend key scheme.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendRange {
    #[default]
    Daily,
    Monthly,
    Yearly,
}

impl TrendRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendRange::Daily => "daily",
            TrendRange::Monthly => "monthly",
            TrendRange::Yearly => "yearly",
        }
    }

    /// Human label used in report headings ("Daily", "Monthly", "Yearly")
    pub fn title(&self) -> &'static str {
        match self {
            TrendRange::Daily => "Daily",
            TrendRange::Monthly => "Monthly",
            TrendRange::Yearly => "Yearly",
        }
    }

    /// Granularity of the cumulative signup series paired with this range
    pub fn granularity(&self) -> Granularity {
        match self {
            TrendRange::Daily => Granularity::Daily,
            TrendRange::Monthly => Granularity::Monthly,
            TrendRange::Yearly => Granularity::Yearly,
        }
    }
}

impl fmt::Display for TrendRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendRange {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(TrendRange::Daily),
            "monthly" => Ok(TrendRange::Monthly),
            "yearly" => Ok(TrendRange::Yearly),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Optional narrowing of the yearly report to a single calendar month
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MonthFilter {
    #[default]
    All,
    /// Calendar month, 1 = January
    Month(u32),
}

impl MonthFilter {
    /// Parse the query form: `all` or a month number 1..=12
    pub fn parse(value: &str) -> Result<Self, UnknownVariant> {
        if value.eq_ignore_ascii_case("all") {
            return Ok(MonthFilter::All);
        }
        match value.parse::<u32>() {
            Ok(m) if (1..=12).contains(&m) => Ok(MonthFilter::Month(m)),
            _ => Err(UnknownVariant(value.to_string())),
        }
    }

    /// Whether a calendar month (1-based) passes the filter
    pub fn includes(&self, month: u32) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(m) => *m == month,
        }
    }

    pub fn month_name(&self) -> Option<&'static str> {
        match self {
            MonthFilter::All => None,
            MonthFilter::Month(m) => crate::format::month_name(*m),
        }
    }
}

/// Error for enum values that do not match any known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value: {0}")]
pub struct UnknownVariant(pub String);
