//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the local record schema (`Company`, `FundingRound`, `MarketTrend`, `QuarterlyRecord`)
//! - fetch metadata (`Loaded`, `DataOrigin`, `LastUpdated`)
//! - chart selectors (`Metric`, `ChartKind`) and the `Quarter` calendar helper

pub mod types;

pub use types::*;
