//! Integration tests for broadway-common crate.

use broadway_common::{
    format_currency, format_si, truncate_string, BroadwayError, MonthKey, RankingMetric,
    ValueFormat,
};

#[test]
fn test_month_key_display() {
    let key = MonthKey::new(2016, 7).unwrap();
    assert_eq!(format!("{}", key), "2016-07");
}

#[test]
fn test_metric_display_uses_selector_label() {
    assert_eq!(RankingMetric::Total.to_string(), "Total Revenue");
    assert_eq!(RankingMetric::Count.to_string(), "Running Weeks");
}

#[test]
fn test_currency_and_si_formatting() {
    assert_eq!(format_currency(2_134_567.0), "$2,134,567");
    assert_eq!(format_si(560_000.0), "560k");
    assert_eq!(ValueFormat::CurrencySi.format_tick(0.0), "$0");
}

#[test]
fn test_truncate_string() {
    let input = "This is a very long string that should be truncated";
    let truncated = truncate_string(input, 20);
    assert_eq!(truncated, "This is a very lo...");

    let short = "Short";
    let not_truncated = truncate_string(short, 20);
    assert_eq!(not_truncated, "Short");
}

#[test]
fn test_unknown_metric_is_invalid_parameter() {
    let err = "gross potential".parse::<RankingMetric>().unwrap_err();
    match err {
        BroadwayError::InvalidParameter { parameter, message } => {
            assert_eq!(parameter, "metric");
            assert!(message.contains("Average Gross per Week"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
