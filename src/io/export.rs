//! CSV exports of the loaded datasets and Markdown report downloads.
//!
//! Exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::domain::{Company, MarketTrend, QuarterlyRecord};
use crate::error::AppError;
use crate::report::Report;

#[derive(Serialize)]
struct CompanyRow<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    funding_total: f64,
    funding_rounds: usize,
    founded_year: i32,
    employees: u32,
    burn_rate: f64,
    annual_revenue: Option<f64>,
    valuation: Option<f64>,
    investors: String,
    location: Option<&'a str>,
    status: Option<&'a str>,
}

/// One row per company; investors are joined with `;`.
pub fn write_companies_csv(path: &Path, companies: &[Company]) -> Result<(), AppError> {
    let rows = companies.iter().map(|c| CompanyRow {
        id: &c.id,
        name: &c.name,
        category: &c.category,
        funding_total: c.funding_total,
        funding_rounds: c.funding_rounds.len(),
        founded_year: c.founded_year,
        employees: c.employees,
        burn_rate: c.burn_rate,
        annual_revenue: c.annual_revenue,
        valuation: c.valuation,
        investors: c.investors.join(";"),
        location: c.location.as_deref(),
        status: c.status.as_deref(),
    });
    write_rows(path, "companies", rows)
}

#[derive(Serialize)]
struct TrendRow<'a> {
    id: &'a str,
    trend: &'a str,
    category: &'a str,
    growth_rate: f64,
    description: &'a str,
}

pub fn write_trends_csv(path: &Path, trends: &[MarketTrend]) -> Result<(), AppError> {
    let rows = trends.iter().map(|t| TrendRow {
        id: &t.id,
        trend: &t.name,
        category: &t.category,
        growth_rate: t.growth_rate,
        description: &t.description,
    });
    write_rows(path, "trends", rows)
}

pub fn write_quarterly_csv(path: &Path, records: &[QuarterlyRecord]) -> Result<(), AppError> {
    write_rows(path, "quarterly", records.iter())
}

/// Write a report body as Markdown.
pub fn write_report_markdown(path: &Path, report: &Report) -> Result<(), AppError> {
    fs::write(path, report.body)
        .map_err(|e| AppError::new(2, format!("Failed to write report '{}': {e}", path.display())))
}

fn write_rows<I, R>(path: &Path, what: &str, rows: I) -> Result<(), AppError>
where
    I: IntoIterator<Item = R>,
    R: Serialize,
{
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create {what} CSV '{}': {e}", path.display())))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::new(2, format!("Failed to write {what} CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush {what} CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fallback;
    use crate::report::ReportKind;

    fn read_all(path: &Path) -> (csv::StringRecord, Vec<csv::StringRecord>) {
        let mut reader = csv::Reader::from_path(path).unwrap();
        let headers = reader.headers().unwrap().clone();
        let rows = reader.records().map(|r| r.unwrap()).collect();
        (headers, rows)
    }

    #[test]
    fn companies_csv_has_one_row_per_company() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("companies.csv");
        let mut companies = fallback::companies();
        companies[1].annual_revenue = None;
        write_companies_csv(&path, &companies).unwrap();

        let (headers, rows) = read_all(&path);
        assert_eq!(&headers[0], "id");
        assert_eq!(&headers[10], "investors");
        assert_eq!(rows.len(), 5);
        assert_eq!(&rows[0][1], "Clio");
        assert_eq!(&rows[0][4], "1");
        assert_eq!(&rows[0][10], "TCV;JMI Equity;Bessemer Venture Partners");
        // Unknown revenue is an empty cell.
        assert_eq!(&rows[1][8], "");
    }

    #[test]
    fn trends_and_quarterly_csv_shapes() {
        let dir = tempfile::tempdir().unwrap();

        let trends_path = dir.path().join("trends.csv");
        write_trends_csv(&trends_path, &fallback::market_trends()).unwrap();
        let (headers, rows) = read_all(&trends_path);
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["id", "trend", "category", "growth_rate", "description"]);
        assert_eq!(rows.len(), 5);

        let quarterly_path = dir.path().join("quarterly.csv");
        let records = fallback::synthesize_quarterly(chrono::NaiveDate::from_ymd_opt(2018, 9, 1).unwrap(), 5);
        write_quarterly_csv(&quarterly_path, &records).unwrap();
        let (headers, rows) = read_all(&quarterly_path);
        assert_eq!(&headers[0], "quarter");
        assert_eq!(headers.len(), 7);
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[2][0], "Q3 2018");
    }

    #[test]
    fn report_markdown_is_the_body() {
        let dir = tempfile::tempdir().unwrap();
        let report = ReportKind::TechnologyTrends.report();
        let path = dir.path().join(ReportKind::TechnologyTrends.file_name());
        write_report_markdown(&path, report).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), report.body);
    }

    #[test]
    fn unwritable_path_is_a_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = write_trends_csv(&path, &[]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
