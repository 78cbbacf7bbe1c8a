//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging and the dataset loader
//! - prints tables, charts and reports
//! - writes optional exports

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

use crate::chat::{Conversation, SUGGESTIONS};
use crate::cli::{
    AnalyticsArgs, ChartArgs, ChatArgs, Command, CompaniesArgs, ExportArgs, PlotArgs, QuarterlyArgs, ReportArgs,
    SnapshotArgs,
};
use crate::data::DatasetLoader;
use crate::domain::{QuarterlyRecord, Resource};
use crate::error::AppError;
use crate::logging::LogTarget;
use crate::report::DateRange;

pub mod pipeline;

/// Entry point for the `pulse` binary.
pub fn run() -> Result<(), AppError> {
    // `pulse` and `pulse --offline` behave like `pulse dashboard ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let target = match cli.command {
        Command::Dashboard => LogTarget::Tui,
        _ => LogTarget::Stderr,
    };
    crate::logging::init(target)?;

    match cli.command {
        Command::Dashboard => crate::tui::run(pipeline::loader_from_env(cli.offline)?),
        Command::Companies(args) => handle_companies(&pipeline::loader_from_env(cli.offline)?, args),
        Command::Trends(args) => handle_trends(&pipeline::loader_from_env(cli.offline)?, args),
        Command::Quarterly(args) => handle_quarterly(&pipeline::loader_from_env(cli.offline)?, args),
        Command::Analytics(args) => handle_analytics(&pipeline::loader_from_env(cli.offline)?, args),
        Command::Report(args) => handle_report(args),
        Command::Chat(args) => handle_chat(args),
        Command::Snapshot(args) => handle_snapshot(&pipeline::loader_from_env(cli.offline)?, args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_companies(loader: &DatasetLoader, args: CompaniesArgs) -> Result<(), AppError> {
    let loaded = loader.fetch_companies();
    println!("{}\n", crate::report::format_status(Resource::Companies, &loaded));

    let shown = match args.top {
        Some(n) => &loaded.records[..n.min(loaded.records.len())],
        None => &loaded.records[..],
    };
    print!("{}", crate::report::format_companies(shown));

    export(&args.export, |path| crate::io::write_companies_csv(path, &loaded.records))
}

fn handle_trends(loader: &DatasetLoader, args: ExportArgs) -> Result<(), AppError> {
    let loaded = loader.fetch_market_trends();
    println!("{}\n", crate::report::format_status(Resource::MarketTrends, &loaded));
    print!("{}", crate::report::format_trends(&loaded.records));

    export(&args, |path| crate::io::write_trends_csv(path, &loaded.records))
}

fn handle_quarterly(loader: &DatasetLoader, args: QuarterlyArgs) -> Result<(), AppError> {
    let loaded = loader.fetch_quarterly();
    println!("{}\n", crate::report::format_status(Resource::Quarterly, &loaded));

    let records = select_quarters(&loaded.records, &args.chart);
    println!("{}", render_chart(&records, &args.chart));
    print!("{}", crate::report::format_quarterly(&records));

    export(&args.export, |path| crate::io::write_quarterly_csv(path, &records))
}

fn handle_analytics(loader: &DatasetLoader, args: AnalyticsArgs) -> Result<(), AppError> {
    let (companies, trends) = rayon::join(|| loader.fetch_companies(), || loader.fetch_market_trends());
    println!("{}", crate::report::format_status(Resource::Companies, &companies));
    println!("{}\n", crate::report::format_status(Resource::MarketTrends, &trends));

    println!("Funding by company (USD millions):");
    print!(
        "{}",
        crate::plot::render_bars(&crate::report::funding_by_company(&companies.records), args.width)
    );

    let segments: Vec<(String, f64)> = crate::report::category_distribution(&companies.records)
        .into_iter()
        .map(|(category, count)| (category, count as f64))
        .collect();
    println!("\nMarket segments (companies):");
    print!("{}", crate::plot::render_bars(&segments, args.width));

    println!("\nTrend growth (% YoY):");
    print!(
        "{}",
        crate::plot::render_bars(&crate::report::trend_growth(&trends.records), args.width)
    );

    println!("\nTop performers by annual revenue:");
    print!(
        "{}",
        crate::report::format_performers(&crate::report::top_performers(&companies.records, args.top))
    );
    Ok(())
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let report = args.kind.report();
    println!("{}", report.body);

    if args.save || args.out.is_some() {
        let path = args.out.unwrap_or_else(|| PathBuf::from(args.kind.file_name()));
        crate::io::write_report_markdown(&path, report)?;
        eprintln!("Saved {} to {}", report.title, path.display());
    }
    Ok(())
}

fn handle_chat(args: ChatArgs) -> Result<(), AppError> {
    if !args.query.is_empty() {
        println!("{}", crate::chat::respond(&args.query.join(" ")));
        return Ok(());
    }

    let mut conversation = Conversation::new();
    println!("{}\n", crate::chat::GREETING);
    println!("Try asking:");
    for s in SUGGESTIONS {
        println!("  - {s}");
    }
    println!("\nType `exit` to leave.");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\n> ");
        stdout
            .flush()
            .map_err(|e| AppError::new(4, format!("Failed to write prompt: {e}")))?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|e| AppError::new(4, format!("Failed to read input: {e}")))?;
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }
        if let Some(reply) = conversation.ask(&line) {
            println!("\n{}", reply.content);
        }
    }
    Ok(())
}

fn handle_snapshot(loader: &DatasetLoader, args: SnapshotArgs) -> Result<(), AppError> {
    let dashboard = pipeline::load_dashboard(loader);
    crate::io::write_snapshot_json(&args.out, &dashboard)?;

    println!("{}", crate::report::format_status(Resource::Companies, &dashboard.companies));
    println!("{}", crate::report::format_status(Resource::MarketTrends, &dashboard.trends));
    println!("{}", crate::report::format_status(Resource::Quarterly, &dashboard.quarterly));
    println!("Wrote snapshot to {}", args.out.display());
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let dashboard = crate::io::read_snapshot_json(&args.snapshot)?;
    println!(
        "{} (snapshot taken {})\n",
        crate::report::format_status(Resource::Quarterly, &dashboard.quarterly),
        dashboard.generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    let records = select_quarters(&dashboard.quarterly.records, &args.chart);
    println!("{}", render_chart(&records, &args.chart));
    Ok(())
}

fn select_quarters(records: &[QuarterlyRecord], chart: &ChartArgs) -> Vec<QuarterlyRecord> {
    let range = DateRange::from_bounds(chart.from, chart.to);
    crate::report::filter_quarters(records, range.as_ref())
}

fn render_chart(records: &[QuarterlyRecord], chart: &ChartArgs) -> String {
    crate::plot::render_metric_chart(records, &chart.metrics, chart.chart, chart.width, chart.height)
}

fn export<F>(args: &ExportArgs, write: F) -> Result<(), AppError>
where
    F: FnOnce(&std::path::Path) -> Result<(), AppError>,
{
    if let Some(path) = &args.export {
        write(path)?;
        eprintln!("Exported to {}", path.display());
    }
    Ok(())
}

/// Rewrite argv so `pulse` defaults to `pulse dashboard`.
///
/// Rules:
/// - `pulse`                        -> `pulse dashboard`
/// - `pulse --offline`              -> `pulse dashboard --offline`
/// - `pulse --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("dashboard".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    // A leading flag with no subcommand anywhere after it means "dashboard flags".
    if arg1.starts_with('-') && !argv[1..].iter().any(|a| is_subcommand(a)) {
        argv.insert(1, "dashboard".to_string());
    }
    argv
}

fn is_subcommand(arg: &str) -> bool {
    matches!(
        arg,
        "dashboard" | "companies" | "trends" | "quarterly" | "analytics" | "report" | "chat" | "snapshot" | "plot"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_the_dashboard() {
        assert_eq!(rewrite_args(argv(&["pulse"])), argv(&["pulse", "dashboard"]));
        assert_eq!(
            rewrite_args(argv(&["pulse", "--offline"])),
            argv(&["pulse", "dashboard", "--offline"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_are_untouched() {
        for args in [
            &["pulse", "--help"][..],
            &["pulse", "-V"],
            &["pulse", "trends"],
            &["pulse", "--offline", "companies", "--top", "3"],
        ] {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }

    #[test]
    fn rewritten_args_parse() {
        let cli = crate::cli::Cli::try_parse_from(rewrite_args(argv(&["pulse", "--offline"]))).unwrap();
        assert!(cli.offline);
        assert!(matches!(cli.command, Command::Dashboard));
    }
}
