use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AssessmentId, AssetBucket, TierCoded};
use super::scoring::{AssessmentResult, RiskCategory};

const RECENT_ROWS: usize = 5;

/// Flat persisted record, one per completed assessment (one CSV row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRow {
    pub timestamp: String,
    pub assessment_id: String,
    pub profile: String,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub emergency_fund: u8,
    pub high_interest_debt: f64,
    pub age_group: u8,
    pub investment_purpose: String,
    pub time_horizon: u8,
    pub risk_behavior: u8,
    pub experience: u8,
    pub goal_priority: u8,
    pub loss_capacity: u8,
    pub liquidity_need: u8,
    pub financial_health_score: f64,
    pub risk_category: String,
    pub total_risk_score: f64,
    pub monthly_investment: f64,
    pub annual_investment: f64,
    pub confidence_score: u8,
    pub contradictions: u8,
    pub portfolio_large_cap: f64,
    pub portfolio_mid_cap: f64,
    pub portfolio_small_cap: f64,
    pub portfolio_growth: f64,
    pub portfolio_inflation_protection: f64,
    pub portfolio_fixed_income: f64,
}

impl AssessmentRow {
    pub fn from_result(
        id: &AssessmentId,
        created_at: DateTime<Utc>,
        result: &AssessmentResult,
    ) -> Self {
        let answers = &result.answers;
        let allocation = &result.allocation;
        Self {
            timestamp: created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            assessment_id: id.0.clone(),
            profile: result.profile.label().to_string(),
            monthly_income: answers.monthly_income,
            monthly_expenses: answers.monthly_expenses,
            emergency_fund: answers.emergency_fund,
            high_interest_debt: answers.high_interest_debt,
            age_group: answers.age_group,
            investment_purpose: answers.purpose.label().to_string(),
            time_horizon: answers.time_horizon,
            risk_behavior: answers.risk_behavior,
            experience: answers.experience,
            goal_priority: answers.goal_priority.tier(),
            loss_capacity: answers.loss_capacity,
            liquidity_need: answers.liquidity_need.tier(),
            financial_health_score: result.health.score,
            risk_category: result.final_category().label().to_string(),
            total_risk_score: result.risk.total,
            monthly_investment: result.investment.safe_monthly_investment,
            annual_investment: result.investment.annual_investment,
            confidence_score: result.confidence.score,
            contradictions: result.overrides.contradictions,
            portfolio_large_cap: allocation.get(AssetBucket::LargeCap),
            portfolio_mid_cap: allocation.get(AssetBucket::MidCap),
            portfolio_small_cap: allocation.get(AssetBucket::SmallCap),
            portfolio_growth: allocation.get(AssetBucket::Growth),
            portfolio_inflation_protection: allocation.get(AssetBucket::InflationProtection),
            portfolio_fixed_income: allocation.get(AssetBucket::FixedIncome),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait AssessmentStore: Send + Sync {
    fn append_record(&self, row: &AssessmentRow) -> Result<(), StoreError>;
    fn load_all(&self) -> Result<Vec<AssessmentRow>, StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("store encoding failure: {0}")]
    Csv(#[from] csv::Error),
    #[error("store lock poisoned")]
    Poisoned,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Aggregates over every stored assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentStatistics {
    pub total_assessments: usize,
    pub average_financial_health: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common_category: Option<String>,
    pub average_monthly_investment: f64,
    pub recent: Vec<AssessmentRow>,
}

impl AssessmentStatistics {
    pub fn from_rows(rows: &[AssessmentRow]) -> Self {
        let total = rows.len();
        let average = |value: fn(&AssessmentRow) -> f64| {
            if total == 0 {
                0.0
            } else {
                let sum: f64 = rows.iter().map(value).sum();
                (sum / total as f64 * 100.0).round() / 100.0
            }
        };

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for row in rows {
            *counts.entry(row.risk_category.as_str()).or_default() += 1;
        }
        // BTreeMap iterates labels in order, so ties keep the lexicographically smallest.
        let most_common_category = counts
            .iter()
            .fold(None::<(&str, usize)>, |best, (label, count)| match best {
                Some((_, top)) if *count <= top => best,
                _ => Some((*label, *count)),
            })
            .map(|(label, _)| label.to_string());

        Self {
            total_assessments: total,
            average_financial_health: average(|row| row.financial_health_score),
            most_common_category,
            average_monthly_investment: average(|row| row.monthly_investment),
            recent: rows
                .iter()
                .skip(total.saturating_sub(RECENT_ROWS))
                .cloned()
                .collect(),
        }
    }

    pub fn most_common(&self) -> Option<RiskCategory> {
        let label = self.most_common_category.as_deref()?;
        RiskCategory::ALL
            .into_iter()
            .find(|category| category.label() == label)
    }
}

/// Process-local store used by tests, the demo and servers started without a CSV path.
#[derive(Debug, Default)]
pub struct InMemoryAssessmentStore {
    rows: Mutex<Vec<AssessmentRow>>,
}

impl InMemoryAssessmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssessmentStore for InMemoryAssessmentStore {
    fn append_record(&self, row: &AssessmentRow) -> Result<(), StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .push(row.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<AssessmentRow>, StoreError> {
        Ok(self.rows.lock().map_err(|_| StoreError::Poisoned)?.clone())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.rows.lock().map_err(|_| StoreError::Poisoned)?.clear();
        Ok(())
    }
}
