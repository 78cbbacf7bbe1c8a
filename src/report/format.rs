//! Terminal formatting: dataset status lines and fixed-width tables.
//!
//! Formatting lives here so the CLI handlers only decide *what* to print.

use crate::domain::{Company, Loaded, MarketTrend, QuarterlyRecord, Resource};

use super::Performer;

/// One line saying where a dataset came from and how fresh it is.
pub fn format_status<T>(resource: Resource, loaded: &Loaded<T>) -> String {
    let mut line = format!(
        "{}: {} records, {}",
        resource.display_name(),
        loaded.records.len(),
        loaded.origin.label()
    );
    if let crate::domain::DataOrigin::Fallback(reason) = &loaded.origin {
        line.push_str(&format!(" ({reason})"));
    }
    line.push_str(&format!(" | last updated: {}", loaded.last_updated));
    line
}

/// Millions of USD as `$250M` / `$1.8B`.
pub fn fmt_money(millions: f64) -> String {
    if millions.abs() >= 1000.0 {
        format!("${:.1}B", millions / 1000.0)
    } else {
        format!("${millions:.0}M")
    }
}

fn fmt_opt_money(v: Option<f64>) -> String {
    v.map(fmt_money).unwrap_or_else(|| "-".to_string())
}

pub fn format_companies(companies: &[Company]) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        format!(
            "{:<20} {:<22} {:>10} {:>7} {:>9} {:>10} {:>10} {:>6}",
            "name", "category", "funding", "founded", "employees", "revenue", "valuation", "rounds"
        ),
    );
    push_row(
        &mut out,
        format!(
            "{:-<20} {:-<22} {:-<10} {:-<7} {:-<9} {:-<10} {:-<10} {:-<6}",
            "", "", "", "", "", "", "", ""
        ),
    );
    for c in companies {
        push_row(
            &mut out,
            format!(
                "{:<20} {:<22} {:>10} {:>7} {:>9} {:>10} {:>10} {:>6}",
                truncate(&c.name, 20),
                truncate(&c.category, 22),
                fmt_money(c.funding_total),
                c.founded_year,
                c.employees,
                fmt_opt_money(c.annual_revenue),
                fmt_opt_money(c.valuation),
                c.funding_rounds.len(),
            ),
        );
    }
    out
}

pub fn format_trends(trends: &[MarketTrend]) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        format!("{:<26} {:<16} {:>7}  {}", "trend", "category", "growth", "description"),
    );
    push_row(
        &mut out,
        format!("{:-<26} {:-<16} {:-<7}  {:-<11}", "", "", "", ""),
    );
    for t in trends {
        push_row(
            &mut out,
            format!(
                "{:<26} {:<16} {:>6.1}%  {}",
                truncate(&t.name, 26),
                truncate(&t.category, 16),
                t.growth_rate,
                t.description
            ),
        );
    }
    out
}

pub fn format_quarterly(records: &[QuarterlyRecord]) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        format!(
            "{:<8} {:>10} {:>6} {:>7} {:>8} {:>10} {:>10}",
            "quarter", "funding", "exits", "growth", "seed", "companies", "investors"
        ),
    );
    push_row(
        &mut out,
        format!(
            "{:-<8} {:-<10} {:-<6} {:-<7} {:-<8} {:-<10} {:-<10}",
            "", "", "", "", "", "", ""
        ),
    );
    for r in records {
        push_row(
            &mut out,
            format!(
                "{:<8} {:>10.0} {:>6.0} {:>6.1}% {:>8.0} {:>10.0} {:>10.0}",
                truncate(&r.quarter, 8),
                r.funding,
                r.exits,
                r.growth,
                r.seed,
                r.companies,
                r.investors
            ),
        );
    }
    out
}

pub fn format_performers(performers: &[Performer]) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        format!("{:>3} {:<20} {:>10} {:>10}", "#", "name", "revenue", "valuation"),
    );
    push_row(&mut out, format!("{:-<3} {:-<20} {:-<10} {:-<10}", "", "", "", ""));
    for (i, p) in performers.iter().enumerate() {
        push_row(
            &mut out,
            format!(
                "{:>3} {:<20} {:>10} {:>10}",
                i + 1,
                truncate(&p.name, 20),
                fmt_money(p.annual_revenue),
                fmt_opt_money(p.valuation)
            ),
        );
    }
    out
}

fn push_row(out: &mut String, row: String) {
    out.push_str(row.trim_end());
    out.push('\n');
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
