//! Validation utilities for report requests

use crate::types::{Granularity, MonthFilter, TrendRange};

/// The export password must be present; its correctness is checked server-side
pub fn validate_export_password(password: &str) -> Result<(), &'static str> {
    if password.trim().is_empty() {
        return Err("Password is required to export the report");
    }
    if password.len() > 128 {
        return Err("Password is too long");
    }
    Ok(())
}

/// Parse an optional `range` query value, defaulting to daily
pub fn parse_trend_range(value: Option<&str>) -> Result<TrendRange, &'static str> {
    match value {
        None | Some("") => Ok(TrendRange::default()),
        Some(v) => v
            .parse()
            .map_err(|_| "Range must be one of daily, monthly, yearly"),
    }
}

/// Parse an optional `period` query value, defaulting to monthly
pub fn parse_granularity(value: Option<&str>) -> Result<Granularity, &'static str> {
    match value {
        None | Some("") => Ok(Granularity::default()),
        Some(v) => v
            .parse()
            .map_err(|_| "Period must be one of daily, weekly, monthly, yearly"),
    }
}

/// Parse an optional `month` query value (`all` or 1..=12)
pub fn parse_month_filter(value: Option<&str>) -> Result<MonthFilter, &'static str> {
    match value {
        None | Some("") => Ok(MonthFilter::All),
        Some(v) => MonthFilter::parse(v).map_err(|_| "Month must be 'all' or a number from 1 to 12"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_export_password() {
        assert!(validate_export_password("secret").is_ok());
        assert!(validate_export_password("").is_err());
        assert!(validate_export_password("   ").is_err());
        assert!(validate_export_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_parse_query_values() {
        assert_eq!(parse_trend_range(None).unwrap(), TrendRange::Daily);
        assert_eq!(parse_trend_range(Some("yearly")).unwrap(), TrendRange::Yearly);
        assert!(parse_trend_range(Some("weekly")).is_err());

        assert_eq!(parse_granularity(None).unwrap(), Granularity::Monthly);
        assert_eq!(parse_granularity(Some("weekly")).unwrap(), Granularity::Weekly);
        assert!(parse_granularity(Some("hourly")).is_err());

        assert_eq!(parse_month_filter(Some("all")).unwrap(), MonthFilter::All);
        assert_eq!(parse_month_filter(Some("12")).unwrap(), MonthFilter::Month(12));
        assert!(parse_month_filter(Some("0")).is_err());
    }
}
