use std::{cmp::Ordering, sync::LazyLock};

use chrono::{NaiveDate, ParseResult};
use regex::Regex;

use super::data::Post;

const WORDS_PER_MINUTE: usize = 200;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Newest first; posts sharing a date are ordered by slug, descending.
pub(crate) fn sort_post(a: &Post, b: &Post) -> Ordering {
    b.date.cmp(&a.date).then_with(|| b.slug.cmp(&a.slug))
}

/// Minutes to read `text`, rounded up, never less than one.
pub(crate) fn reading_time(text: &str) -> usize {
    WORD.find_iter(text)
        .count()
        .div_ceil(WORDS_PER_MINUTE)
        .max(1)
}

pub(crate) fn parse_date(date: &str) -> ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
}

/// `March 01, 2024`
pub(crate) fn format_long_date(date: &NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// `Mar 01`
pub(crate) fn format_short_date(date: &NaiveDate) -> String {
    date.format("%b %d").to_string()
}

// feed items are stamped at 06:00 UTC on the post's date
pub(crate) fn format_rfc822(date: &NaiveDate) -> String {
    format!("{} 06:00:00 +0000", date.format("%a, %d %b %Y"))
}
