//! Bundled fallback datasets.
//!
//! Companies and trends are hand-authored. The quarterly series is synthesized:
//! one record per quarter from Q1 2018 through the quarter containing `today`,
//! with random but plausible, non-negative metrics.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use chrono::NaiveDate;

use crate::domain::{Company, FundingRound, MarketTrend, Quarter, QuarterlyRecord, RoundType};

/// First quarter of the synthesized series.
pub const FIRST_QUARTER: Quarter = Quarter { year: 2018, number: 1 };

/// Quarter-over-quarter drift of synthesized funding.
const FUNDING_DRIFT: f64 = 0.03;

pub fn companies() -> Vec<Company> {
    vec![
        company(
            "1",
            "Clio",
            "Practice Management",
            250.0,
            (RoundType::SeriesD, "2023-05-15", "TCV", 1800.0),
            2008,
            650,
            2.8,
            120.0,
            &["TCV", "JMI Equity", "Bessemer Venture Partners"],
        ),
        company(
            "2",
            "LegalZoom",
            "Legal Services",
            535.0,
            (RoundType::Ipo, "2023-03-22", "Public Market", 7500.0),
            2001,
            1100,
            8.5,
            470.0,
            &["Kleiner Perkins", "Institutional Venture Partners", "T. Rowe Price"],
        ),
        company(
            "3",
            "Relativity",
            "E-Discovery",
            100.0,
            (RoundType::PrivateEquity, "2023-07-10", "Silver Lake", 3500.0),
            2001,
            1300,
            7.2,
            380.0,
            &["Silver Lake", "ICONIQ Capital"],
        ),
        company(
            "4",
            "ContractPodAi",
            "Contract Management",
            115.0,
            (RoundType::SeriesC, "2023-04-05", "SoftBank Vision Fund", 650.0),
            2012,
            280,
            3.5,
            45.0,
            &["SoftBank Vision Fund", "Eagle Proprietary Investments", "Insight Partners"],
        ),
        company(
            "5",
            "Everlaw",
            "E-Discovery",
            85.0,
            (RoundType::SeriesD, "2023-02-18", "CapitalG", 820.0),
            2010,
            320,
            4.1,
            70.0,
            &["CapitalG", "Menlo Ventures", "Andreessen Horowitz"],
        ),
    ]
}

pub fn market_trends() -> Vec<MarketTrend> {
    [
        (
            "AI Integration",
            "Machine learning and AI features becoming standard in legal tech products",
            38.0,
            "Technology",
        ),
        (
            "Cloud Migration",
            "Shift from on-premise to cloud-based legal software solutions",
            27.0,
            "Infrastructure",
        ),
        (
            "API-First Design",
            "Platforms prioritizing interoperability and ecosystem integration",
            24.0,
            "Architecture",
        ),
        (
            "Compliance Automation",
            "Automated regulatory compliance monitoring and updating",
            21.0,
            "Functionality",
        ),
        (
            "Legal Process Automation",
            "End-to-end workflow automation for common legal processes",
            18.0,
            "Efficiency",
        ),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, description, growth_rate, category))| MarketTrend {
        id: (i + 1).to_string(),
        name: name.to_string(),
        description: description.to_string(),
        growth_rate,
        category: category.to_string(),
    })
    .collect()
}

/// Synthesize quarterly aggregates from `FIRST_QUARTER` through the quarter
/// containing `today`, ascending. Never empty unless `today` precedes 2018.
pub fn synthesize_quarterly(today: NaiveDate, seed: u64) -> Vec<QuarterlyRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let last = Quarter::containing(today);

    // Multiplicative noise on the funding trend; sigma is a constant so this cannot fail.
    let noise = Normal::<f64>::new(0.0, 0.12).ok();

    let mut out = Vec::new();
    let mut quarter = FIRST_QUARTER;
    let mut step = 0i32;
    while quarter <= last {
        let trend = 600.0 * (1.0 + FUNDING_DRIFT).powi(step);
        let shock = noise.map(|n| n.sample(&mut rng)).unwrap_or(0.0);
        let funding = (trend * shock.exp()).max(0.0);

        out.push(QuarterlyRecord {
            quarter: quarter.label(),
            funding: funding.round(),
            exits: f64::from(rng.gen_range(2u32..=18)),
            growth: (rng.gen_range(4.0..40.0_f64) * 10.0).round() / 10.0,
            seed: (funding * rng.gen_range(0.08..0.2)).round(),
            companies: f64::from(rng.gen_range(90u32..=420)),
            investors: f64::from(rng.gen_range(40u32..=240)),
        });

        quarter = quarter.next();
        step += 1;
    }

    out
}

#[allow(clippy::too_many_arguments)]
fn company(
    id: &str,
    name: &str,
    category: &str,
    funding_total: f64,
    round: (RoundType, &str, &str, f64),
    founded_year: i32,
    employees: u32,
    burn_rate: f64,
    annual_revenue: f64,
    investors: &[&str],
) -> Company {
    let (round_type, date, lead, post_money) = round;
    Company {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        funding_total,
        funding_rounds: vec![FundingRound {
            id: format!("{id}-1"),
            round_type,
            amount: funding_total,
            date: date.to_string(),
            lead_investor: lead.to_string(),
            post_money_valuation: Some(post_money),
        }],
        founded_year,
        employees,
        burn_rate,
        annual_revenue: Some(annual_revenue),
        valuation: Some(post_money),
        investors: investors.iter().map(|s| s.to_string()).collect(),
        description: None,
        location: None,
        status: None,
    }
}
