//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - handed to charts and tables in-memory
//! - exported to JSON/CSV
//! - reloaded later from a dashboard snapshot

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One of the three remote datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Companies,
    MarketTrends,
    Quarterly,
}

impl Resource {
    /// File name of the resource under the configured base URL.
    pub fn file_name(self) -> &'static str {
        match self {
            Resource::Companies => "legaltech_companies.json",
            Resource::MarketTrends => "market_trends.json",
            Resource::Quarterly => "quarterly_metrics.json",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Resource::Companies => "companies",
            Resource::MarketTrends => "market trends",
            Resource::Quarterly => "quarterly metrics",
        }
    }
}

/// Funding round stage.
///
/// The set is closed: anything the remote source sends outside of it is
/// normalized to `Seed` during reshaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundType {
    #[serde(rename = "Seed")]
    Seed,
    #[serde(rename = "Series A")]
    SeriesA,
    #[serde(rename = "Series B")]
    SeriesB,
    #[serde(rename = "Series C")]
    SeriesC,
    #[serde(rename = "Series D")]
    SeriesD,
    #[serde(rename = "Private Equity")]
    PrivateEquity,
    #[serde(rename = "IPO")]
    Ipo,
}

impl RoundType {
    /// Map a source tag (`series_a`, `IPO`, ...) onto the closed set.
    ///
    /// Lookup is on the lower-cased tag; unknown, empty or missing tags map to `Seed`.
    pub fn from_source(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return RoundType::Seed;
        };
        match raw.to_lowercase().as_str() {
            "seed" => RoundType::Seed,
            "series_a" => RoundType::SeriesA,
            "series_b" => RoundType::SeriesB,
            "series_c" => RoundType::SeriesC,
            "series_d" => RoundType::SeriesD,
            "private_equity" => RoundType::PrivateEquity,
            "ipo" => RoundType::Ipo,
            _ => RoundType::Seed,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RoundType::Seed => "Seed",
            RoundType::SeriesA => "Series A",
            RoundType::SeriesB => "Series B",
            RoundType::SeriesC => "Series C",
            RoundType::SeriesD => "Series D",
            RoundType::PrivateEquity => "Private Equity",
            RoundType::Ipo => "IPO",
        }
    }
}

/// A single funding round. Amounts are in millions of USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRound {
    pub id: String,
    #[serde(rename = "type")]
    pub round_type: RoundType,
    pub amount: f64,
    /// ISO date (`YYYY-MM-DD`).
    pub date: String,
    pub lead_investor: String,
    pub post_money_valuation: Option<f64>,
}

/// A legal tech company in the local (post-reshape) schema.
///
/// Monetary fields are in millions of USD; `burn_rate` is monthly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub category: String,
    pub funding_total: f64,
    pub funding_rounds: Vec<FundingRound>,
    pub founded_year: i32,
    pub employees: u32,
    pub burn_rate: f64,
    pub annual_revenue: Option<f64>,
    pub valuation: Option<f64>,
    pub investors: Vec<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

/// A market trend, decoded as-is from the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTrend {
    pub id: String,
    #[serde(rename = "trend")]
    pub name: String,
    pub description: String,
    /// Year-over-year growth in percent.
    pub growth_rate: f64,
    pub category: String,
}

/// A calendar quarter.
///
/// Field order matters: the derived `Ord` sorts by year, then quarter number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    pub year: i32,
    pub number: u8,
}

impl Quarter {
    pub fn new(year: i32, number: u8) -> Option<Self> {
        if (1..=4).contains(&number) {
            Some(Self { year, number })
        } else {
            None
        }
    }

    /// The quarter a date falls in.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            number: ((date.month0() / 3) + 1) as u8,
        }
    }

    /// Parse a `Q<n> <year>` label (whitespace-tolerant, `q` may be lower-case).
    pub fn parse_label(label: &str) -> Option<Self> {
        let mut parts = label.split_whitespace();
        let q = parts.next()?;
        let year = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        let number = q.strip_prefix('Q').or_else(|| q.strip_prefix('q'))?;
        let number: u8 = number.parse().ok()?;
        let year: i32 = year.parse().ok()?;
        Self::new(year, number)
    }

    pub fn label(self) -> String {
        format!("Q{} {}", self.number, self.year)
    }

    pub fn next(self) -> Self {
        if self.number == 4 {
            Self {
                year: self.year + 1,
                number: 1,
            }
        } else {
            Self {
                year: self.year,
                number: self.number + 1,
            }
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, u32::from(self.number - 1) * 3 + 1, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        self.next().first_day()?.pred_opt()
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} {}", self.number, self.year)
    }
}

/// Quarterly market aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyRecord {
    /// Period label, `Q<n> <year>`.
    pub quarter: String,
    pub funding: f64,
    pub exits: f64,
    pub growth: f64,
    pub seed: f64,
    pub companies: f64,
    pub investors: f64,
}

impl QuarterlyRecord {
    pub fn period(&self) -> Option<Quarter> {
        Quarter::parse_label(&self.quarter)
    }

    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Funding => self.funding,
            Metric::Exits => self.exits,
            Metric::Growth => self.growth,
            Metric::Seed => self.seed,
            Metric::Companies => self.companies,
            Metric::Investors => self.investors,
        }
    }
}

/// Quarterly metric selectable for charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Funding,
    Exits,
    Growth,
    Seed,
    Companies,
    Investors,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Funding,
        Metric::Exits,
        Metric::Growth,
        Metric::Seed,
        Metric::Companies,
        Metric::Investors,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Metric::Funding => "Funding",
            Metric::Exits => "Exits",
            Metric::Growth => "Growth Rate",
            Metric::Seed => "Seed Investments",
            Metric::Companies => "Company Count",
            Metric::Investors => "Investor Count",
        }
    }
}

/// Chart style for quarterly metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Area,
    Bar,
    /// Shares of the selected metrics in the most recent quarter.
    Pie,
}

/// Where a loaded dataset came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    /// Fetched from the remote source by this call.
    Live,
    /// Served from the loader's short-lived cache of a live fetch.
    Cached,
    /// Bundled or synthesized data; the reason says why.
    Fallback(String),
}

impl DataOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, DataOrigin::Fallback(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            DataOrigin::Live => "live",
            DataOrigin::Cached => "cached",
            DataOrigin::Fallback(_) => "fallback",
        }
    }
}

/// Freshness of a dataset as reported by the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastUpdated {
    At(DateTime<Utc>),
    Unknown,
}

impl fmt::Display for LastUpdated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastUpdated::At(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M UTC")),
            LastUpdated::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A dataset together with its fetch metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub origin: DataOrigin,
    pub last_updated: LastUpdated,
}

impl<T> Loaded<T> {
    pub fn fallback(records: Vec<T>, reason: impl Into<String>) -> Self {
        Self {
            records,
            origin: DataOrigin::Fallback(reason.into()),
            last_updated: LastUpdated::Unknown,
        }
    }
}

/// Everything the dashboard shows, loaded in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub companies: Loaded<Company>,
    pub trends: Loaded<MarketTrend>,
    pub quarterly: Loaded<QuarterlyRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_type_lookup_is_case_insensitive_on_source_tags() {
        assert_eq!(RoundType::from_source(Some("series_b")), RoundType::SeriesB);
        assert_eq!(RoundType::from_source(Some("SERIES_B")), RoundType::SeriesB);
        assert_eq!(RoundType::from_source(Some("IPO")), RoundType::Ipo);
        assert_eq!(RoundType::from_source(Some("Private_Equity")), RoundType::PrivateEquity);
    }

    #[test]
    fn unknown_round_types_become_seed() {
        for raw in ["", "Series A", "series-a", "angel", "growth", " seed"] {
            assert_eq!(RoundType::from_source(Some(raw)), RoundType::Seed, "raw={raw:?}");
        }
        assert_eq!(RoundType::from_source(None), RoundType::Seed);
    }

    #[test]
    fn quarter_labels_parse_and_format() {
        let q = Quarter::parse_label("Q3 2021").unwrap();
        assert_eq!(q, Quarter { year: 2021, number: 3 });
        assert_eq!(q.label(), "Q3 2021");
        assert_eq!(Quarter::parse_label("  q1   2018 "), Quarter::new(2018, 1));
        assert!(Quarter::parse_label("Q5 2021").is_none());
        assert!(Quarter::parse_label("2021 Q1").is_none());
        assert!(Quarter::parse_label("Q1 2021 extra").is_none());
    }

    #[test]
    fn quarter_ordering_and_bounds() {
        let q4 = Quarter::new(2019, 4).unwrap();
        assert_eq!(q4.next(), Quarter::new(2020, 1).unwrap());
        assert!(Quarter::new(2019, 4).unwrap() < Quarter::new(2020, 1).unwrap());
        assert_eq!(q4.first_day(), NaiveDate::from_ymd_opt(2019, 10, 1));
        assert_eq!(q4.last_day(), NaiveDate::from_ymd_opt(2019, 12, 31));

        let d = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        assert_eq!(Quarter::containing(d), Quarter::new(2024, 2).unwrap());
    }

    #[test]
    fn round_type_serializes_as_display_name() {
        let json = serde_json::to_string(&RoundType::PrivateEquity).unwrap();
        assert_eq!(json, "\"Private Equity\"");
    }

    #[test]
    fn last_updated_displays_unknown() {
        assert_eq!(LastUpdated::Unknown.to_string(), "Unknown");
    }
}
