use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{AnswerSet, AssetBucket, InflationStrategy};
use super::scoring::Allocation;

const DISPLAY_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EsgRating {
    Leader,
    Average,
    Laggard,
}

/// How a security has historically held up against inflation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InflationPerformance {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityRisk {
    Low,
    Medium,
    High,
}

/// Example security shown next to an allocation bucket. Reference data only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Security {
    pub symbol: &'static str,
    pub name: &'static str,
    pub sector: &'static str,
    pub market_cap: &'static str,
    pub risk: SecurityRisk,
    pub esg: EsgRating,
    pub inflation: InflationPerformance,
}

const fn security(
    symbol: &'static str,
    name: &'static str,
    sector: &'static str,
    market_cap: &'static str,
    risk: SecurityRisk,
    esg: EsgRating,
    inflation: InflationPerformance,
) -> Security {
    Security {
        symbol,
        name,
        sector,
        market_cap,
        risk,
        esg,
        inflation,
    }
}

use EsgRating::{Average, Laggard, Leader};
use InflationPerformance::{Moderate, Strong, Weak};
use SecurityRisk::{High, Low, Medium};

const LARGE_CAP: [Security; 6] = [
    security(
        "RELIANCE",
        "Reliance Industries",
        "Energy",
        "Large",
        Medium,
        Laggard,
        Strong,
    ),
    security(
        "TCS",
        "Tata Consultancy Services",
        "IT",
        "Large",
        Low,
        Leader,
        Moderate,
    ),
    security(
        "HDFCBANK",
        "HDFC Bank",
        "Banking",
        "Large",
        Low,
        Average,
        Moderate,
    ),
    security(
        "INFY",
        "Infosys",
        "IT",
        "Large",
        Low,
        Leader,
        Moderate,
    ),
    security(
        "ICICIBANK",
        "ICICI Bank",
        "Banking",
        "Large",
        Medium,
        Average,
        Moderate,
    ),
    security(
        "HINDUNILVR",
        "Hindustan Unilever",
        "FMCG",
        "Large",
        Low,
        Leader,
        Strong,
    ),
];

const MID_CAP: [Security; 5] = [
    security(
        "TITAN",
        "Titan Company",
        "Consumer",
        "Mid",
        Medium,
        Average,
        Strong,
    ),
    security(
        "MARUTI",
        "Maruti Suzuki",
        "Auto",
        "Mid",
        Medium,
        Average,
        Weak,
    ),
    security(
        "ASIANPAINT",
        "Asian Paints",
        "Paints",
        "Mid",
        Medium,
        Leader,
        Strong,
    ),
    security(
        "BAJFINANCE",
        "Bajaj Finance",
        "Financial",
        "Mid",
        High,
        Average,
        Weak,
    ),
    security(
        "BHARTIARTL",
        "Bharti Airtel",
        "Telecom",
        "Mid",
        Medium,
        Laggard,
        Moderate,
    ),
];

const SMALL_CAP: [Security; 4] = [
    security(
        "TATAELXSI",
        "Tata Elxsi",
        "IT",
        "Small",
        High,
        Leader,
        Moderate,
    ),
    security(
        "COFORGE",
        "Coforge",
        "IT",
        "Small",
        High,
        Average,
        Moderate,
    ),
    security(
        "LAURUSLABS",
        "Laurus Labs",
        "Pharma",
        "Small",
        High,
        Laggard,
        Weak,
    ),
    security(
        "PERSISTENT",
        "Persistent Systems",
        "IT",
        "Small",
        High,
        Leader,
        Moderate,
    ),
];

const GROWTH: [Security; 4] = [
    security(
        "DMART",
        "Avenue Supermarts",
        "Retail",
        "Large",
        Medium,
        Average,
        Strong,
    ),
    security(
        "BAJAJFINSV",
        "Bajaj Finserv",
        "Financial",
        "Large",
        High,
        Average,
        Weak,
    ),
    security(
        "TECHM",
        "Tech Mahindra",
        "IT",
        "Large",
        Medium,
        Leader,
        Moderate,
    ),
    security(
        "NAUKRI",
        "Info Edge",
        "Internet",
        "Large",
        High,
        Average,
        Weak,
    ),
];

const INFLATION_PROTECTION: [Security; 4] = [
    security(
        "GOLDBEES",
        "Nippon India Gold ETF",
        "Commodities",
        "ETF",
        Medium,
        Average,
        Strong,
    ),
    security(
        "SGBMAR31",
        "Sovereign Gold Bond",
        "Government",
        "Bond",
        Low,
        Leader,
        Strong,
    ),
    security(
        "SILVERBEES",
        "Nippon India Silver ETF",
        "Commodities",
        "ETF",
        High,
        Laggard,
        Moderate,
    ),
    security(
        "POWERGRID",
        "Power Grid Corporation",
        "Utilities",
        "Large",
        Low,
        Average,
        Strong,
    ),
];

const FIXED_INCOME: [Security; 4] = [
    security(
        "LIQUIDBEES",
        "Nippon India Liquid ETF",
        "Money Market",
        "ETF",
        Low,
        Average,
        Weak,
    ),
    security(
        "EBBETF0431",
        "Bharat Bond ETF 2031",
        "PSU Debt",
        "ETF",
        Low,
        Leader,
        Moderate,
    ),
    security(
        "GILT5YBEES",
        "Nippon India Gilt 5Y ETF",
        "Government",
        "ETF",
        Low,
        Leader,
        Moderate,
    ),
    security(
        "SETF10GILT",
        "SBI 10Y Gilt ETF",
        "Government",
        "ETF",
        Low,
        Average,
        Moderate,
    ),
];

/// Securities suggested for one non-empty allocation bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSuggestion {
    pub bucket: AssetBucket,
    pub label: &'static str,
    pub percentage: f64,
    pub securities: Vec<Security>,
}

/// Bucket to example securities, filtered by ESG and inflation preferences.
#[derive(Debug, Clone)]
pub struct SecurityCatalog {
    entries: BTreeMap<AssetBucket, Vec<Security>>,
}

impl Default for SecurityCatalog {
    fn default() -> Self {
        let entries = BTreeMap::from([
            (AssetBucket::LargeCap, LARGE_CAP.to_vec()),
            (AssetBucket::MidCap, MID_CAP.to_vec()),
            (AssetBucket::SmallCap, SMALL_CAP.to_vec()),
            (AssetBucket::Growth, GROWTH.to_vec()),
            (
                AssetBucket::InflationProtection,
                INFLATION_PROTECTION.to_vec(),
            ),
            (AssetBucket::FixedIncome, FIXED_INCOME.to_vec()),
        ]);
        Self { entries }
    }
}

impl SecurityCatalog {
    pub fn securities(&self, bucket: AssetBucket) -> &[Security] {
        self.entries.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Apply the ESG screen, then order by the inflation preference and truncate.
    ///
    /// ESG tier 3 drops laggards and tier 4 keeps leaders only. The protection strategy
    /// drops weak inflation performers and ranks strong ones first, balanced only ranks,
    /// growth keeps catalog order.
    pub fn recommend(
        &self,
        bucket: AssetBucket,
        esg_importance: Option<u8>,
        strategy: InflationStrategy,
    ) -> Vec<Security> {
        let mut picks: Vec<Security> = self
            .securities(bucket)
            .iter()
            .filter(|security| match esg_importance {
                Some(tier) if tier >= 4 => security.esg == EsgRating::Leader,
                Some(3) => security.esg != EsgRating::Laggard,
                _ => true,
            })
            .filter(|security| {
                strategy != InflationStrategy::Protection
                    || security.inflation != InflationPerformance::Weak
            })
            .cloned()
            .collect();

        if strategy != InflationStrategy::Growth {
            picks.sort_by_key(|security| security.inflation);
        }
        picks.truncate(DISPLAY_COUNT);
        picks
    }

    /// Suggestions for every bucket the allocation actually funds.
    pub fn suggestions(
        &self,
        allocation: &Allocation,
        answers: &AnswerSet,
    ) -> Vec<BucketSuggestion> {
        allocation
            .iter()
            .filter(|(_, percentage)| *percentage > 0.0)
            .map(|(bucket, percentage)| BucketSuggestion {
                bucket,
                label: bucket.label(),
                percentage,
                securities: self.recommend(
                    bucket,
                    answers.esg_importance,
                    answers.inflation_strategy,
                ),
            })
            .collect()
    }
}
