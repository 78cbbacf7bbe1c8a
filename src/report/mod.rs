//! Analytics over loaded datasets, plus the report catalog and terminal formatting.
//!
//! Everything here is a pure function of the records handed in, so the CLI,
//! the TUI and tests all see the same numbers.

use chrono::NaiveDate;

use crate::domain::{Company, MarketTrend, Metric, Quarter, QuarterlyRecord};

pub mod catalog;
pub mod format;

pub use catalog::{REPORTS, Report, ReportKind};
pub use format::*;

/// How many companies the "top performers" panel shows by default.
pub const DEFAULT_TOP_PERFORMERS: usize = 5;

/// A company ranked by annual revenue.
#[derive(Debug, Clone, PartialEq)]
pub struct Performer {
    pub name: String,
    pub annual_revenue: f64,
    pub valuation: Option<f64>,
}

/// One metric's values across a run of quarters.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub metric: Metric,
    pub values: Vec<f64>,
}

/// Share of one metric in a single quarter (pie chart slice).
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub metric: Metric,
    pub value: f64,
    /// Fraction of the slice total, in `[0, 1]`.
    pub share: f64,
}

/// Total funding per company, in input order.
pub fn funding_by_company(companies: &[Company]) -> Vec<(String, f64)> {
    companies
        .iter()
        .map(|c| (c.name.clone(), c.funding_total))
        .collect()
}

/// Number of companies per category, in first-seen order.
pub fn category_distribution(companies: &[Company]) -> Vec<(String, usize)> {
    let mut out: Vec<(String, usize)> = Vec::new();
    for c in companies {
        match out.iter_mut().find(|(name, _)| *name == c.category) {
            Some((_, count)) => *count += 1,
            None => out.push((c.category.clone(), 1)),
        }
    }
    out
}

pub fn trend_growth(trends: &[MarketTrend]) -> Vec<(String, f64)> {
    trends.iter().map(|t| (t.name.clone(), t.growth_rate)).collect()
}

/// Companies with a known annual revenue, highest first, at most `n`.
pub fn top_performers(companies: &[Company], n: usize) -> Vec<Performer> {
    let mut ranked: Vec<Performer> = companies
        .iter()
        .filter_map(|c| {
            c.annual_revenue.map(|annual_revenue| Performer {
                name: c.name.clone(),
                annual_revenue,
                valuation: c.valuation,
            })
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.annual_revenue
            .partial_cmp(&a.annual_revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(n);
    ranked
}

/// Values of each selected metric across `records`, in record order.
pub fn select_metric_series(records: &[QuarterlyRecord], metrics: &[Metric]) -> Vec<MetricSeries> {
    metrics
        .iter()
        .map(|&metric| MetricSeries {
            metric,
            values: records.iter().map(|r| r.metric(metric)).collect(),
        })
        .collect()
}

/// Shares of the selected metrics in the most recent record.
///
/// Empty when there are no records or no metrics; all shares are zero when the
/// selected values sum to zero.
pub fn pie_shares(records: &[QuarterlyRecord], metrics: &[Metric]) -> Vec<Share> {
    let Some(latest) = records.last() else {
        return Vec::new();
    };
    let total: f64 = metrics.iter().map(|&m| latest.metric(m).max(0.0)).sum();
    metrics
        .iter()
        .map(|&metric| {
            let value = latest.metric(metric);
            let share = if total > 0.0 { value.max(0.0) / total } else { 0.0 };
            Share { metric, value, share }
        })
        .collect()
}

/// Inclusive calendar date range. Construction orders the endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if b < a {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    /// Build from optional endpoints; an open end is unbounded on that side.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (None, None) => None,
            (Some(a), Some(b)) => Some(Self::new(a, b)),
            (Some(a), None) => Some(Self::new(a, NaiveDate::MAX)),
            (None, Some(b)) => Some(Self::new(NaiveDate::MIN, b)),
        }
    }

    /// Whether any day of `quarter` falls inside the range.
    pub fn overlaps(&self, quarter: Quarter) -> bool {
        match (quarter.first_day(), quarter.last_day()) {
            (Some(first), Some(last)) => first <= self.end && last >= self.start,
            _ => false,
        }
    }
}

/// Keep records whose quarter overlaps `range`.
///
/// With no range everything is kept, including records whose label does not
/// parse; with a range those records are dropped.
pub fn filter_quarters(records: &[QuarterlyRecord], range: Option<&DateRange>) -> Vec<QuarterlyRecord> {
    let Some(range) = range else {
        return records.to_vec();
    };
    records
        .iter()
        .filter(|r| r.period().is_some_and(|q| range.overlaps(q)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fallback;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(label: &str, funding: f64, exits: f64) -> QuarterlyRecord {
        QuarterlyRecord {
            quarter: label.to_string(),
            funding,
            exits,
            growth: 0.0,
            seed: 0.0,
            companies: 0.0,
            investors: 0.0,
        }
    }

    #[test]
    fn funding_by_company_keeps_input_order() {
        let rows = funding_by_company(&fallback::companies());
        assert_eq!(rows[0], ("Clio".to_string(), 250.0));
        assert_eq!(rows[1], ("LegalZoom".to_string(), 535.0));
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn category_distribution_counts_in_first_seen_order() {
        let dist = category_distribution(&fallback::companies());
        assert_eq!(
            dist,
            vec![
                ("Practice Management".to_string(), 1),
                ("Legal Services".to_string(), 1),
                ("E-Discovery".to_string(), 2),
                ("Contract Management".to_string(), 1),
            ]
        );
    }

    #[test]
    fn top_performers_skip_unknown_revenue_and_sort_descending() {
        let mut companies = fallback::companies();
        companies[0].annual_revenue = None;
        let top = top_performers(&companies, 3);
        let names: Vec<&str> = top.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["LegalZoom", "Relativity", "Everlaw"]);
        assert_eq!(top[0].valuation, Some(7500.0));
        assert_eq!(top_performers(&companies, 10).len(), 4);
    }

    #[test]
    fn pie_shares_use_latest_record() {
        let records = vec![record("Q1 2020", 1.0, 1.0), record("Q2 2020", 30.0, 10.0)];
        let shares = pie_shares(&records, &[Metric::Funding, Metric::Exits]);
        assert_eq!(shares.len(), 2);
        assert!((shares[0].share - 0.75).abs() < 1e-12);
        assert!((shares[1].share - 0.25).abs() < 1e-12);

        assert!(pie_shares(&[], &[Metric::Funding]).is_empty());
        let zeros = pie_shares(&[record("Q1 2020", 0.0, 0.0)], &[Metric::Funding]);
        assert_eq!(zeros[0].share, 0.0);
    }

    #[test]
    fn metric_series_follow_record_order() {
        let records = vec![record("Q1 2020", 1.0, 5.0), record("Q2 2020", 2.0, 6.0)];
        let series = select_metric_series(&records, &[Metric::Exits]);
        assert_eq!(series[0].metric, Metric::Exits);
        assert_eq!(series[0].values, vec![5.0, 6.0]);
    }

    #[test]
    fn reversed_range_endpoints_are_swapped() {
        let r = DateRange::new(date(2022, 12, 31), date(2021, 1, 1));
        assert_eq!(r.start, date(2021, 1, 1));
        assert_eq!(r.end, date(2022, 12, 31));
    }

    #[test]
    fn filter_keeps_overlapping_quarters() {
        let records = vec![
            record("Q4 2020", 1.0, 0.0),
            record("Q1 2021", 2.0, 0.0),
            record("Q2 2021", 3.0, 0.0),
            record("garbage", 4.0, 0.0),
        ];
        // Mid-quarter endpoints still include the partially covered quarters.
        let range = DateRange::new(date(2021, 2, 15), date(2021, 4, 2));
        let kept = filter_quarters(&records, Some(&range));
        let labels: Vec<&str> = kept.iter().map(|r| r.quarter.as_str()).collect();
        assert_eq!(labels, vec!["Q1 2021", "Q2 2021"]);

        assert_eq!(filter_quarters(&records, None).len(), 4);

        let open = DateRange::from_bounds(Some(date(2021, 1, 1)), None).unwrap();
        assert_eq!(filter_quarters(&records, Some(&open)).len(), 2);
        assert!(DateRange::from_bounds(None, None).is_none());
    }
}
