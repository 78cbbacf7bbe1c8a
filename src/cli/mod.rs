//! Command-line parsing for the legal tech market dashboard.
//!
//! Argument parsing stays here; dispatch lives in `app`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{ChartKind, Metric};
use crate::report::{DEFAULT_TOP_PERFORMERS, ReportKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pulse", version, about = "Legal tech market intelligence dashboard")]
pub struct Cli {
    /// Skip the network and use the bundled datasets.
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Dashboard,
    /// List companies.
    Companies(CompaniesArgs),
    /// List market trends.
    Trends(ExportArgs),
    /// Chart and list quarterly market metrics.
    Quarterly(QuarterlyArgs),
    /// Funding, segment, trend and top-performer panels.
    Analytics(AnalyticsArgs),
    /// Print or save one of the market reports.
    Report(ReportArgs),
    /// Ask the market assistant; with no query, start a prompt loop.
    Chat(ChatArgs),
    /// Load all datasets and write them to a JSON snapshot.
    Snapshot(SnapshotArgs),
    /// Chart quarterly metrics from a saved snapshot.
    Plot(PlotArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Export the records to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct CompaniesArgs {
    /// Show only the first N companies.
    #[arg(long)]
    pub top: Option<usize>,

    #[command(flatten)]
    pub export: ExportArgs,
}

/// Chart options shared by `quarterly` and `plot`.
#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    /// Metrics to chart.
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [Metric::Funding, Metric::Exits])]
    pub metrics: Vec<Metric>,

    /// Chart kind.
    #[arg(long, value_enum, default_value_t = ChartKind::Line)]
    pub chart: ChartKind,

    /// First day of the date range (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day of the date range (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Chart width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct QuarterlyArgs {
    #[command(flatten)]
    pub chart: ChartArgs,

    #[command(flatten)]
    pub export: ExportArgs,
}

#[derive(Debug, Args, Clone)]
pub struct AnalyticsArgs {
    /// How many top performers to list.
    #[arg(long, default_value_t = DEFAULT_TOP_PERFORMERS)]
    pub top: usize,

    /// Bar width (columns).
    #[arg(long, default_value_t = 40)]
    pub width: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Which report.
    #[arg(value_enum)]
    pub kind: ReportKind,

    /// Save the report as Markdown (`<id>-report.md` unless `--out` is given).
    #[arg(long)]
    pub save: bool,

    /// Where to save the report; implies `--save`.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ChatArgs {
    /// Question to ask.
    pub query: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct SnapshotArgs {
    /// Output path.
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Snapshot JSON written by `pulse snapshot`.
    #[arg(long)]
    pub snapshot: PathBuf,

    #[command(flatten)]
    pub chart: ChartArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn quarterly_flags_parse() {
        let cli = parse(&[
            "pulse", "quarterly", "--metrics", "seed,investors", "--chart", "area", "--from", "2020-01-01", "--to",
            "2021-06-30",
        ]);
        let Command::Quarterly(args) = cli.command else {
            panic!("expected quarterly");
        };
        assert_eq!(args.chart.metrics, vec![Metric::Seed, Metric::Investors]);
        assert_eq!(args.chart.chart, ChartKind::Area);
        assert_eq!(args.chart.from, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert!(args.export.export.is_none());
    }

    #[test]
    fn quarterly_defaults_to_funding_and_exits() {
        let Command::Quarterly(args) = parse(&["pulse", "quarterly"]).command else {
            panic!("expected quarterly");
        };
        assert_eq!(args.chart.metrics, vec![Metric::Funding, Metric::Exits]);
        assert_eq!(args.chart.chart, ChartKind::Line);
    }

    #[test]
    fn offline_is_global() {
        assert!(parse(&["pulse", "trends", "--offline"]).offline);
        assert!(parse(&["pulse", "--offline", "analytics"]).offline);
    }

    #[test]
    fn report_kind_by_id_and_chat_words() {
        let Command::Report(args) = parse(&["pulse", "report", "funding-analysis", "--save"]).command else {
            panic!("expected report");
        };
        assert_eq!(args.kind, ReportKind::FundingAnalysis);
        assert!(args.save);

        let Command::Chat(args) = parse(&["pulse", "chat", "top", "funding"]).command else {
            panic!("expected chat");
        };
        assert_eq!(args.query, vec!["top", "funding"]);

        assert!(Cli::try_parse_from(["pulse", "report", "earnings"]).is_err());
    }
}
