//! Shared formatting helpers for tables, prompts and chart labels.

use serde::{Deserialize, Serialize};

/// How a numeric value is rendered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// Whole dollars with thousands separators, e.g. `$1,234,567`.
    Currency,
    /// Dollar amount with an SI suffix, e.g. `$1.5M`.
    CurrencySi,
    /// Plain number with an SI suffix, e.g. `1.2k`.
    Si,
}

impl ValueFormat {
    /// Full-precision rendering used in tables and hover text.
    pub fn format_exact(self, value: f64) -> String {
        match self {
            Self::Currency | Self::CurrencySi => format_currency(value),
            Self::Si => format_thousands(value),
        }
    }

    /// Compact rendering used on axis ticks.
    pub fn format_tick(self, value: f64) -> String {
        match self {
            Self::Currency => format_currency(value),
            Self::CurrencySi => with_dollar(value, &format_si(value.abs())),
            Self::Si => format_si(value),
        }
    }
}

fn with_dollar(value: f64, body: &str) -> String {
    if value < 0.0 {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

/// Formats a whole number with `,` thousands separators.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0.0 {
        out.insert(0, '-');
    }
    out
}

/// Formats a dollar amount rounded to whole dollars.
pub fn format_currency(value: f64) -> String {
    with_dollar(value.round(), &format_thousands(value.abs()))
}

/// Formats a number with an SI suffix (`k`, `M`, `G`).
pub fn format_si(value: f64) -> String {
    let abs = value.abs();
    let (scale, suffix) = if abs >= 1e9 {
        (1e9, "G")
    } else if abs >= 1e6 {
        (1e6, "M")
    } else if abs >= 1e3 {
        (1e3, "k")
    } else {
        (1.0, "")
    };
    let scaled = value / scale;
    if scaled.abs() >= 10.0 || (suffix.is_empty() && scaled.fract() == 0.0) {
        format!("{scaled:.0}{suffix}")
    } else {
        format!("{scaled:.1}{suffix}")
    }
}

/// Truncates a string to a maximum number of characters with ellipsis.
pub fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_length.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
