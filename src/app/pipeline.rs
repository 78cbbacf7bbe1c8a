//! Shared dashboard loading used by both CLI and TUI front-ends.
//!
//! The three datasets are independent, so they are fetched in parallel on the
//! rayon pool. The CLI and the TUI then only deal with presentation.

use chrono::Utc;

use crate::config::LoaderConfig;
use crate::data::{CancelToken, DatasetLoader};
use crate::domain::{Company, Dashboard, Loaded, MarketTrend, QuarterlyRecord};
use crate::error::AppError;

/// Build a loader from the environment, with CLI overrides applied.
pub fn loader_from_env(offline: bool) -> Result<DatasetLoader, AppError> {
    let mut config = LoaderConfig::from_env()?;
    config.offline |= offline;
    DatasetLoader::new(config)
}

/// Load all three datasets. Never fails; failed fetches carry fallback data.
pub fn load_dashboard(loader: &DatasetLoader) -> Dashboard {
    let (companies, (trends, quarterly)) = rayon::join(
        || loader.fetch_companies(),
        || rayon::join(|| loader.fetch_market_trends(), || loader.fetch_quarterly()),
    );
    assemble(companies, trends, quarterly)
}

/// Like [`load_dashboard`], but `None` if `cancel` was set before every
/// dataset came back.
pub fn load_dashboard_with(loader: &DatasetLoader, cancel: &CancelToken) -> Option<Dashboard> {
    let (companies, (trends, quarterly)) = rayon::join(
        || loader.fetch_with::<Company>(cancel),
        || {
            rayon::join(
                || loader.fetch_with::<MarketTrend>(cancel),
                || loader.fetch_with::<QuarterlyRecord>(cancel),
            )
        },
    );
    if cancel.is_cancelled() {
        return None;
    }
    Some(assemble(companies?, trends?, quarterly?))
}

fn assemble(companies: Loaded<Company>, trends: Loaded<MarketTrend>, quarterly: Loaded<QuarterlyRecord>) -> Dashboard {
    Dashboard {
        tool: "pulse".to_string(),
        generated_at: Utc::now(),
        companies,
        trends,
        quarterly,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::{RawResponse, Transport};
    use crate::domain::DataOrigin;
    use crate::error::FetchError;

    /// Serves companies live and answers 500 for everything else.
    struct CompaniesOnly;

    impl Transport for CompaniesOnly {
        fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
            if url.ends_with("legaltech_companies.json") {
                Ok(RawResponse {
                    status: 200,
                    last_modified: None,
                    body: r#"[{"name": "Acme Legal"}]"#.to_string(),
                })
            } else {
                Ok(RawResponse {
                    status: 500,
                    last_modified: None,
                    body: String::new(),
                })
            }
        }
    }

    fn loader() -> DatasetLoader {
        let config = LoaderConfig {
            quarterly_seed: Some(3),
            ..LoaderConfig::default()
        };
        DatasetLoader::with_transport(config, Arc::new(CompaniesOnly))
    }

    #[test]
    fn each_dataset_degrades_on_its_own() {
        let dashboard = load_dashboard(&loader());
        assert_eq!(dashboard.companies.origin, DataOrigin::Live);
        assert_eq!(dashboard.companies.records[0].name, "Acme Legal");
        assert_eq!(
            dashboard.trends.origin,
            DataOrigin::Fallback("server returned status 500".to_string())
        );
        assert_eq!(dashboard.trends.records.len(), 5);
        assert!(dashboard.quarterly.origin.is_fallback());
        assert!(!dashboard.quarterly.records.is_empty());
    }

    #[test]
    fn cancelled_load_is_discarded() {
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(load_dashboard_with(&loader(), &cancel).is_none());

        let live = load_dashboard_with(&loader(), &CancelToken::new()).unwrap();
        assert_eq!(live.tool, "pulse");
    }
}
