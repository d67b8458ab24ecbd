//! Formatting and text-styling helpers shared by the view model and renderer.
//!
//! All renderer helpers write into a `String` instead of stdout so the output
//! can be tested and printed in one go.

use crate::ui::theme::Theme;
use chrono::{DateTime, Utc};

/// Formats an amount of rupiah with dot thousands separators, e.g. `Rp 150.000`.
#[must_use]
pub fn format_rupiah(amount: f64) -> String {
    let digits = format!("{:.0}", amount.max(0.0).round());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("Rp {grouped}")
}

/// Short review date, e.g. `1 Apr 2025`.
#[must_use]
pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%-d %b %Y").to_string()
}

/// Five-slot star bar with one filled star per whole rating point.
#[must_use]
pub fn star_bar(rating: f64) -> String {
    let filled = rating.clamp(0.0, 5.0).floor() as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Appends `text`, emphasising the character ranges in `ranges`.
///
/// Ranges are `(start, end)` character indices, end exclusive, as produced by
/// the fuzzy matcher.
pub fn push_highlighted(out: &mut String, text: &str, ranges: &[(usize, usize)], theme: &Theme) {
    if ranges.is_empty() {
        out.push_str(text);
        return;
    }

    let mut highlighted = false;
    for (idx, ch) in text.chars().enumerate() {
        let inside = ranges.iter().any(|&(start, end)| idx >= start && idx < end);
        if inside && !highlighted {
            out.push_str(&Theme::fg(&theme.colors.match_highlight_fg));
            out.push_str(Theme::bold());
            highlighted = true;
        } else if !inside && highlighted {
            out.push_str(Theme::reset());
            highlighted = false;
        }
        out.push(ch);
    }
    if highlighted {
        out.push_str(Theme::reset());
    }
}
