//! Raw remote JSON -> local schema.
//!
//! The company feed is loosely typed: any field may be missing, null, empty, or
//! carry a number where we expect a string. Every company element is reshaped
//! from a `serde_json::Value` so a sparse or odd element never rejects the whole
//! payload; only a body that is not a JSON array does.
//!
//! Trends and quarterly aggregates are decoded as-is with serde.

use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::{Company, FundingRound, MarketTrend, QuarterlyRecord, RoundType};
use crate::error::FetchError;

const DEFAULT_NAME: &str = "Unknown";
const DEFAULT_CATEGORY: &str = "Other";
const DEFAULT_FOUNDED_YEAR: i32 = 2000;
const DEFAULT_LEAD_INVESTOR: &str = "Unknown";

/// Decode a company payload and reshape every element.
///
/// `today` fills in funding rounds that carry no date.
pub fn decode_companies(body: &str, today: NaiveDate) -> Result<Vec<Company>, FetchError> {
    let items = decode_array(body, "companies")?;
    Ok(items
        .iter()
        .enumerate()
        .map(|(index, item)| reshape_company(index, item, today))
        .collect())
}

pub fn decode_trends(body: &str) -> Result<Vec<MarketTrend>, FetchError> {
    Ok(serde_json::from_str(body)?)
}

pub fn decode_quarterly(body: &str) -> Result<Vec<QuarterlyRecord>, FetchError> {
    Ok(serde_json::from_str(body)?)
}

/// Reshape one raw company element. Never fails; absent fields get defaults.
pub fn reshape_company(index: usize, item: &Value, today: NaiveDate) -> Company {
    let funding_rounds = item
        .get("funding_rounds")
        .and_then(Value::as_array)
        .map(|rounds| {
            rounds
                .iter()
                .enumerate()
                .map(|(i, round)| reshape_round(i, round, today))
                .collect()
        })
        .unwrap_or_default();

    Company {
        id: text(item, "id").unwrap_or_else(|| format!("company-{index}")),
        name: text(item, "name").unwrap_or_else(|| DEFAULT_NAME.to_string()),
        category: text(item, "category").unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        funding_total: number(item, "funding_total").unwrap_or(0.0),
        funding_rounds,
        founded_year: year(item, "founded_year").unwrap_or(DEFAULT_FOUNDED_YEAR),
        employees: count(item, "employees").unwrap_or(0),
        burn_rate: number(item, "burn_rate").unwrap_or(0.0),
        annual_revenue: number(item, "annual_revenue"),
        valuation: number(item, "valuation"),
        investors: string_list(item, "investors"),
        description: text(item, "description"),
        location: text(item, "location"),
        status: text(item, "status"),
    }
}

/// Reshape one raw funding round. Never fails.
pub fn reshape_round(index: usize, raw: &Value, today: NaiveDate) -> FundingRound {
    FundingRound {
        id: text(raw, "id").unwrap_or_else(|| format!("round-{index}")),
        round_type: RoundType::from_source(raw.get("type").and_then(Value::as_str)),
        amount: number(raw, "amount").unwrap_or(0.0),
        date: text(raw, "date").unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
        lead_investor: text(raw, "lead_investor").unwrap_or_else(|| DEFAULT_LEAD_INVESTOR.to_string()),
        post_money_valuation: number(raw, "post_money_valuation"),
    }
}

fn decode_array(body: &str, what: &str) -> Result<Vec<Value>, FetchError> {
    match serde_json::from_str::<Value>(body)? {
        Value::Array(items) => Ok(items),
        other => Err(FetchError::Parse(format!(
            "expected a JSON array of {what}, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Non-empty string field; numeric ids are accepted and stringified.
fn text(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Finite numeric field; numeric strings are accepted.
fn number(item: &Value, key: &str) -> Option<f64> {
    let v = match item.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn year(item: &Value, key: &str) -> Option<i32> {
    let v = number(item, key)?;
    if v >= 1.0 && v <= f64::from(i32::MAX) && v.fract() == 0.0 {
        Some(v as i32)
    } else {
        None
    }
}

fn count(item: &Value, key: &str) -> Option<u32> {
    let v = number(item, key)?;
    (v >= 0.0).then(|| v.round() as u32)
}

fn string_list(item: &Value, key: &str) -> Vec<String> {
    item.get(key)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
