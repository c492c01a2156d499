//! Free-text / date-range filtering and sorting for entity lists.
//!
//! Matching is diacritic- and case-insensitive, so "cafe" finds "Café".
//! All functions are pure; `filter_and_sort` never mutates its input.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize text for matching: strip diacritics, lowercase, trim.
///
/// Idempotent: `normalize_text(normalize_text(s)) == normalize_text(s)`.
pub fn normalize_text(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Diacritic-insensitive substring match. An empty or whitespace needle
/// matches everything.
pub fn text_includes(haystack: &str, needle: &str) -> bool {
    let n = normalize_text(needle);
    if n.is_empty() {
        return true;
    }
    normalize_text(haystack).contains(&n)
}

/// Parse a stored date value (RFC 3339, naive datetime or bare date) into
/// epoch milliseconds.
pub(crate) fn parse_timestamp_ms(value: &str) -> Option<i64> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(v, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().timestamp_millis());
    }
    // Datetime-local input values carry no seconds.
    if let Ok(dt) = NaiveDateTime::parse_from_str(v, "%Y-%m-%dT%H:%M") {
        return Some(dt.and_utc().timestamp_millis());
    }
    if let Ok(d) = NaiveDate::parse_from_str(v, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }
    None
}

fn parse_bound(value: Option<&str>) -> Option<NaiveDate> {
    let v = value?.trim();
    if v.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(v, "%Y-%m-%d").ok()
}

/// Whether a stored date falls within an inclusive calendar-day range.
///
/// No bounds: everything passes. With at least one bound, a missing or
/// unparsable value fails the filter. The range spans
/// `[from 00:00:00.000, to 23:59:59.999]`; either bound may be open.
pub fn date_in_range(value: Option<&str>, from: Option<&str>, to: Option<&str>) -> bool {
    let from = parse_bound(from);
    let to = parse_bound(to);
    if from.is_none() && to.is_none() {
        return true;
    }

    let Some(ms) = value.and_then(parse_timestamp_ms) else {
        return false;
    };

    if let Some(start) = from.and_then(|d| d.and_hms_opt(0, 0, 0)) {
        if ms < start.and_utc().timestamp_millis() {
            return false;
        }
    }
    if let Some(end) = to.and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999)) {
        if ms > end.and_utc().timestamp_millis() {
            return false;
        }
    }
    true
}

/// List sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Title A -> Z, case/diacritic-insensitive
    AlphaAsc,
    /// Title Z -> A
    AlphaDesc,
    /// Oldest first
    DateAsc,
    /// Newest first (the default)
    #[default]
    DateDesc,
}

impl SortKey {
    /// Parse the wire value; anything unknown falls back to `DateDesc`.
    pub fn parse(raw: &str) -> SortKey {
        match raw {
            "alpha_asc" => SortKey::AlphaAsc,
            "alpha_desc" => SortKey::AlphaDesc,
            "date_asc" => SortKey::DateAsc,
            _ => SortKey::DateDesc,
        }
    }
}

/// A list toolbar's current filter state
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Free-text query
    pub text: String,
    /// Inclusive lower calendar-day bound (`YYYY-MM-DD`)
    pub date_from: Option<String>,
    /// Inclusive upper calendar-day bound (`YYYY-MM-DD`)
    pub date_to: Option<String>,
    /// Sort order
    pub sort: SortKey,
}

/// Filter `items` by the query's text and date range, then sort.
///
/// Returns a fresh vector every call. Sorting is stable; unparsable or
/// missing dates sort as epoch 0.
pub fn filter_and_sort<T, FText, FDate, FTitle>(
    items: &[T],
    query: &ListQuery,
    get_text: FText,
    get_date: FDate,
    get_title: FTitle,
) -> Vec<T>
where
    T: Clone,
    FText: Fn(&T) -> String,
    FDate: Fn(&T) -> Option<String>,
    FTitle: Fn(&T) -> String,
{
    let mut filtered: Vec<T> = items
        .iter()
        .filter(|item| {
            text_includes(&get_text(item), &query.text)
                && date_in_range(
                    get_date(item).as_deref(),
                    query.date_from.as_deref(),
                    query.date_to.as_deref(),
                )
        })
        .cloned()
        .collect();

    let title_of = |item: &T| normalize_text(&get_title(item));
    let date_ms_of = |item: &T| {
        get_date(item)
            .as_deref()
            .and_then(parse_timestamp_ms)
            .unwrap_or(0)
    };

    match query.sort {
        SortKey::AlphaAsc => filtered.sort_by(|a, b| title_of(a).cmp(&title_of(b))),
        SortKey::AlphaDesc => filtered.sort_by(|a, b| title_of(b).cmp(&title_of(a))),
        SortKey::DateAsc => filtered.sort_by_key(date_ms_of),
        SortKey::DateDesc => filtered.sort_by(|a, b| date_ms_of(b).cmp(&date_ms_of(a))),
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        title: &'static str,
        date: &'static str,
    }

    fn run(items: &[Item], query: &ListQuery) -> Vec<&'static str> {
        filter_and_sort(
            items,
            query,
            |i| i.title.to_string(),
            |i| Some(i.date.to_string()),
            |i| i.title.to_string(),
        )
        .into_iter()
        .map(|i| i.title)
        .collect()
    }

    #[test]
    fn normalization_is_idempotent() {
        for s in ["Café  Noël", "ÉLÉPHANT", "déjà vu", "plain", "  spaced  "] {
            let once = normalize_text(s);
            assert_eq!(normalize_text(&once), once);
        }
    }

    #[test]
    fn diacritic_insensitive_query() {
        let items = [
            Item { title: "Café", date: "2024-01-05" },
            Item { title: "Cinema", date: "2024-02-01" },
        ];
        let query = ListQuery {
            text: "cafe".to_string(),
            ..Default::default()
        };
        assert_eq!(run(&items, &query), vec!["Café"]);
    }

    #[test]
    fn date_range_filters_regardless_of_query() {
        let items = [
            Item { title: "Café", date: "2024-01-05" },
            Item { title: "Cinema", date: "2024-02-01" },
        ];
        let query = ListQuery {
            date_from: Some("2024-01-01".to_string()),
            date_to: Some("2024-01-31".to_string()),
            ..Default::default()
        };
        assert_eq!(run(&items, &query), vec!["Café"]);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(date_in_range(Some("2024-01-01"), Some("2024-01-01"), Some("2024-01-01")));
        assert!(date_in_range(
            Some("2024-01-01T23:59:59"),
            Some("2024-01-01"),
            Some("2024-01-01")
        ));
        assert!(!date_in_range(Some("2024-01-02"), None, Some("2024-01-01")));
        assert!(!date_in_range(Some("not a date"), Some("2024-01-01"), None));
        assert!(!date_in_range(None, Some("2024-01-01"), None));
        assert!(date_in_range(None, None, None));
        assert!(date_in_range(Some("garbage"), None, None));
    }

    #[test]
    fn alpha_sort_is_case_insensitive() {
        let items = [
            Item { title: "Banana", date: "" },
            Item { title: "apple", date: "" },
            Item { title: "Cherry", date: "" },
        ];
        let query = ListQuery {
            sort: SortKey::AlphaAsc,
            ..Default::default()
        };
        assert_eq!(run(&items, &query), vec!["apple", "Banana", "Cherry"]);
    }

    #[test]
    fn default_sort_is_newest_first() {
        let items = [
            Item { title: "old", date: "2023-05-01" },
            Item { title: "new", date: "2024-05-01" },
            Item { title: "broken", date: "???" },
        ];
        let query = ListQuery::default();
        // Unparsable dates sort as epoch 0, i.e. last in date_desc.
        assert_eq!(run(&items, &query), vec!["new", "old", "broken"]);
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(text_includes("anything", ""));
        assert!(text_includes("anything", "   "));
        assert!(!text_includes("anything", "missing"));
    }

    #[test]
    fn sort_key_parse_falls_back_to_date_desc() {
        assert_eq!(SortKey::parse("alpha_asc"), SortKey::AlphaAsc);
        assert_eq!(SortKey::parse("nonsense"), SortKey::DateDesc);
    }

    #[test]
    fn filter_does_not_mutate_input() {
        let items = vec![
            Item { title: "b", date: "2024-01-02" },
            Item { title: "a", date: "2024-01-01" },
        ];
        let before = items.clone();
        let _ = run(&items, &ListQuery::default());
        assert_eq!(items, before);
    }
}
