use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::models::exercise::Exercise;
use crate::utils::validation::{parse_date, parse_limit};

/// Inclusive bounds on an entry's date, compared by full timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange<D = DateTime<Utc>> {
    pub from: D,
    pub to: D,
}

impl DateRange {
    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        self.from <= *date && *date <= self.to
    }
}

impl<'a> DateRange<&'a str> {
    fn parse(self) -> Result<DateRange, AppError> {
        Ok(DateRange {
            from: parse_date(self.from)?,
            to: parse_date(self.to)?,
        })
    }
}

/// How a log fetch narrows the user's log.
///
/// Classification only looks at which parameters are present. The raw
/// `&str` form is produced first, and only the values the chosen variant
/// carries are then parsed, so a dangling `from` or `to` is never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFilter<D = DateTime<Utc>, L = usize> {
    Unfiltered,
    Range(DateRange<D>),
    Limit(L),
    RangeAndLimit(DateRange<D>, L),
}

impl<D, L> LogFilter<D, L> {
    /// Picks the variant for a set of optional parameters. Rules are checked
    /// in order: range only, limit only, range plus limit, then unfiltered.
    pub fn classify(from: Option<D>, to: Option<D>, limit: Option<L>) -> Self {
        match (from, to, limit) {
            (Some(from), Some(to), None) => LogFilter::Range(DateRange { from, to }),
            (None, None, Some(limit)) => LogFilter::Limit(limit),
            (Some(from), Some(to), Some(limit)) => LogFilter::RangeAndLimit(DateRange { from, to }, limit),
            _ => LogFilter::Unfiltered,
        }
    }

    pub fn strategy(&self) -> &'static str {
        match self {
            LogFilter::Unfiltered => "none",
            LogFilter::Range(_) => "range",
            LogFilter::Limit(_) => "limit",
            LogFilter::RangeAndLimit(..) => "range_and_limit",
        }
    }
}

impl<'a> LogFilter<&'a str, &'a str> {
    pub fn parse(self) -> Result<LogFilter, AppError> {
        Ok(match self {
            LogFilter::Unfiltered => LogFilter::Unfiltered,
            LogFilter::Range(range) => LogFilter::Range(range.parse()?),
            LogFilter::Limit(limit) => LogFilter::Limit(parse_limit(limit)?),
            LogFilter::RangeAndLimit(range, limit) => LogFilter::RangeAndLimit(range.parse()?, parse_limit(limit)?),
        })
    }
}

impl LogFilter {
    pub fn range(&self) -> Option<&DateRange> {
        match self {
            LogFilter::Range(range) | LogFilter::RangeAndLimit(range, _) => Some(range),
            LogFilter::Unfiltered | LogFilter::Limit(_) => None,
        }
    }

    pub fn limit(&self) -> Option<usize> {
        match self {
            LogFilter::Limit(limit) | LogFilter::RangeAndLimit(_, limit) => Some(*limit),
            LogFilter::Unfiltered | LogFilter::Range(_) => None,
        }
    }

    /// Only the unfiltered response reports `totalExerciseCount`.
    pub fn reports_total(&self) -> bool {
        matches!(self, LogFilter::Unfiltered)
    }

    /// Range first, then limit, keeping insertion order.
    pub fn apply(&self, log: &[Exercise]) -> Vec<Exercise> {
        let in_range = log
            .iter()
            .filter(|exercise| self.range().map_or(true, |range| range.contains(&exercise.date)));

        match self.limit() {
            Some(limit) => in_range.take(limit).cloned().collect(),
            None => in_range.cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn entry(description: &str, d: u32) -> Exercise {
        Exercise {
            description: description.to_string(),
            duration: 30.0,
            date: day(d),
        }
    }

    fn sample_log() -> Vec<Exercise> {
        // Inserted out of date order on purpose.
        vec![
            entry("a", 5),
            entry("b", 12),
            entry("c", 3),
            entry("d", 20),
            entry("e", 14),
        ]
    }

    fn descriptions(log: &[Exercise]) -> Vec<&str> {
        log.iter().map(|e| e.description.as_str()).collect()
    }

    #[rstest]
    #[case(None, None, None, "none")]
    #[case(Some("f"), None, None, "none")]
    #[case(None, Some("t"), None, "none")]
    #[case(Some("f"), Some("t"), None, "range")]
    #[case(None, None, Some("2"), "limit")]
    #[case(Some("f"), None, Some("2"), "none")]
    #[case(None, Some("t"), Some("2"), "none")]
    #[case(Some("f"), Some("t"), Some("2"), "range_and_limit")]
    fn classifies_every_presence_combination(
        #[case] from: Option<&str>,
        #[case] to: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(LogFilter::classify(from, to, limit).strategy(), expected);
    }

    #[test]
    fn classified_variants_carry_their_values() {
        assert_eq!(
            LogFilter::classify(Some("f"), Some("t"), Some("3")),
            LogFilter::RangeAndLimit(DateRange { from: "f", to: "t" }, "3")
        );
        assert_eq!(LogFilter::classify(None::<&str>, None, Some("3")), LogFilter::Limit("3"));
    }

    #[test]
    fn dangling_bound_is_never_parsed() {
        let filter = LogFilter::<&str, &str>::classify(Some("not a date"), None, None).parse();
        assert!(matches!(filter, Ok(LogFilter::Unfiltered)));
    }

    #[test]
    fn malformed_range_is_rejected() {
        let filter = LogFilter::<&str, &str>::classify(Some("2024-01-01"), Some("soon"), None).parse();
        assert!(matches!(filter, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn malformed_limit_is_rejected() {
        let filter = LogFilter::<&str, &str>::classify(None, None, Some("ten")).parse();
        assert!(matches!(filter, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn unfiltered_returns_whole_log_with_total() {
        let log = sample_log();
        let filter: LogFilter = LogFilter::Unfiltered;
        assert_eq!(filter.apply(&log), log);
        assert!(filter.reports_total());
    }

    #[test]
    fn range_keeps_only_entries_inside_bounds() {
        let filter: LogFilter = LogFilter::Range(DateRange { from: day(10), to: day(15) });
        let filtered = filter.apply(&sample_log());
        assert_eq!(descriptions(&filtered), vec!["b", "e"]);
        assert!(filtered.iter().all(|e| day(10) <= e.date && e.date <= day(15)));
        assert!(!filter.reports_total());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let filter: LogFilter = LogFilter::Range(DateRange { from: day(12), to: day(14) });
        assert_eq!(descriptions(&filter.apply(&sample_log())), vec!["b", "e"]);
    }

    #[test]
    fn limit_returns_prefix_in_insertion_order() {
        let log = sample_log();
        let limit = |n: usize| -> LogFilter { LogFilter::Limit(n) };
        assert_eq!(descriptions(&limit(2).apply(&log)), vec!["a", "b"]);
        assert_eq!(limit(10).apply(&log).len(), log.len());
        assert!(limit(0).apply(&log).is_empty());
    }

    #[test]
    fn limit_applies_after_range() {
        let range = DateRange { from: day(4), to: day(31) };
        let filter: LogFilter = LogFilter::RangeAndLimit(range, 2);
        assert_eq!(descriptions(&filter.apply(&sample_log())), vec!["a", "b"]);

        let narrow: LogFilter = LogFilter::RangeAndLimit(DateRange { from: day(13), to: day(31) }, 5);
        assert_eq!(descriptions(&narrow.apply(&sample_log())), vec!["d", "e"]);
    }
}
