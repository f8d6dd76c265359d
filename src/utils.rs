use chrono::{Datelike, NaiveDate};

pub fn format_runtime(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

pub fn format_rating(rating: f64) -> String {
    format!("{:.1}", rating)
}

/// Year of a TMDB `YYYY-MM-DD` date; empty or malformed dates yield `None`.
pub fn release_year(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}
