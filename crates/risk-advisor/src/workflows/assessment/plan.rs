use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::catalog::{BucketSuggestion, SecurityCatalog};
use super::domain::{AnswerSet, AssessmentId, AssetBucket};
use super::scoring::{
    Allocation, AssessmentResult, FinancialHealthResult, InvestmentPlan, OverrideEntry,
    RiskCategory, RiskScoreResult,
};

const QUARTERLY_PORTFOLIO_CHECK: [&str; 4] = [
    "Review allocation percentages",
    "Check if rebalancing needed (+/-5%)",
    "Review stock performance",
    "Update financial health score",
];

const QUARTERLY_FINANCIAL_CHECK: [&str; 4] = [
    "Update income & expenses",
    "Check emergency fund status",
    "Review debt reduction progress",
    "Adjust SIP if income changes",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepPriority {
    High,
    Medium,
    Low,
}

impl StepPriority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineStep {
    pub title: &'static str,
    pub duration: String,
    pub action: String,
    pub priority: StepPriority,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketAmount {
    pub bucket: AssetBucket,
    pub label: &'static str,
    pub percentage: f64,
    pub monthly_amount: f64,
}

/// Step-by-step plan derived from a completed assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionPlan {
    pub timeline: Vec<TimelineStep>,
    pub monthly_checklist: Vec<String>,
    pub priority_actions: Vec<String>,
    pub bucket_amounts: Vec<BucketAmount>,
    pub quarterly_review: Vec<&'static str>,
}

impl ActionPlan {
    pub fn from_result(result: &AssessmentResult) -> Self {
        let investment = &result.investment;
        let mut timeline = Vec::new();
        let mut priority_actions = Vec::new();

        if investment.emergency_gap_amount > 0.0 {
            timeline.push(TimelineStep {
                title: "Build Emergency Fund",
                duration: format!("{} months", investment.emergency_timeline_months),
                action: format!(
                    "Save {}/month",
                    format_amount(investment.monthly_emergency_saving)
                ),
                priority: StepPriority::High,
            });
            priority_actions.push(format!(
                "Build Emergency Fund: Save {}/month for {} months",
                format_amount(investment.monthly_emergency_saving),
                investment.emergency_timeline_months
            ));
        }

        if investment.monthly_debt_payment > 0.0 {
            timeline.push(TimelineStep {
                title: "Pay High-Interest Debt",
                duration: "Ongoing".to_string(),
                action: format!(
                    "Pay {}/month minimum",
                    format_amount(investment.monthly_debt_payment)
                ),
                priority: StepPriority::Medium,
            });
            priority_actions.push(format!(
                "Pay High-Interest Debt: Minimum {}/month",
                format_amount(investment.monthly_debt_payment)
            ));
        }

        if investment.safe_monthly_investment > 0.0 {
            timeline.push(TimelineStep {
                title: "Start Investing",
                duration: "Immediate".to_string(),
                action: format!(
                    "Invest {}/month",
                    format_amount(investment.safe_monthly_investment)
                ),
                priority: StepPriority::Low,
            });
            priority_actions.push(format!(
                "Start Investing: {}/month as per allocation",
                format_amount(investment.safe_monthly_investment)
            ));
        }

        let mut monthly_checklist = Vec::new();
        if investment.monthly_emergency_saving > 0.0 {
            monthly_checklist.push(format!(
                "Save {} for emergency fund",
                format_amount(investment.monthly_emergency_saving)
            ));
        }
        if investment.monthly_debt_payment > 0.0 {
            monthly_checklist.push(format!(
                "Pay {} towards high-interest debt",
                format_amount(investment.monthly_debt_payment)
            ));
        }
        if investment.safe_monthly_investment > 0.0 {
            monthly_checklist.push(format!(
                "Invest {} as per allocation",
                format_amount(investment.safe_monthly_investment)
            ));
        }
        monthly_checklist.push("Review monthly expenses and budget".to_string());
        monthly_checklist.push("Track net worth growth".to_string());

        let bucket_amounts = result
            .allocation
            .monthly_amounts(investment.safe_monthly_investment)
            .into_iter()
            .map(|(bucket, monthly_amount)| BucketAmount {
                bucket,
                label: bucket.label(),
                percentage: result.allocation.get(bucket),
                monthly_amount,
            })
            .collect();

        Self {
            timeline,
            monthly_checklist,
            priority_actions,
            bucket_amounts,
            quarterly_review: QUARTERLY_PORTFOLIO_CHECK
                .into_iter()
                .chain(QUARTERLY_FINANCIAL_CHECK)
                .collect(),
        }
    }
}

/// Exportable report for one assessment.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    pub assessment_id: AssessmentId,
    pub timestamp: DateTime<Utc>,
    pub answers: AnswerSet,
    pub financial_health: FinancialHealthResult,
    pub risk_scores: RiskScoreResult,
    pub risk_category: RiskCategory,
    pub override_log: Vec<OverrideEntry>,
    pub safe_investment: InvestmentPlan,
    pub allocation: Allocation,
    pub confidence_score: u8,
    pub action_plan: ActionPlan,
    pub suggestions: Vec<BucketSuggestion>,
}

impl AssessmentReport {
    pub fn new(
        assessment_id: AssessmentId,
        timestamp: DateTime<Utc>,
        result: &AssessmentResult,
        catalog: &SecurityCatalog,
    ) -> Self {
        Self {
            assessment_id,
            timestamp,
            answers: result.answers.clone(),
            financial_health: result.health.clone(),
            risk_scores: result.risk.clone(),
            risk_category: result.final_category(),
            override_log: result.overrides.log.clone(),
            safe_investment: result.investment.clone(),
            allocation: result.allocation.clone(),
            confidence_score: result.confidence.score,
            action_plan: ActionPlan::from_result(result),
            suggestions: catalog.suggestions(&result.allocation, &result.answers),
        }
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text rendering for terminals.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AssessmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let health = &self.financial_health;
        let investment = &self.safe_investment;

        writeln!(
            f,
            "Assessment {} ({})",
            self.assessment_id.0,
            self.timestamp.format("%Y-%m-%d %H:%M")
        )?;
        writeln!(f)?;
        writeln!(f, "Financial health: {:.2}/100", health.score)?;
        writeln!(
            f,
            "  Disposable income: {}",
            format_amount(health.disposable_income)
        )?;
        writeln!(f, "  Debt ratio: {:.2}%", health.debt_ratio * 100.0)?;
        writeln!(
            f,
            "Risk: {} (score {:.2}/{})",
            self.risk_category.label(),
            self.risk_scores.total,
            self.risk_scores.scale_max
        )?;
        for entry in &self.override_log {
            writeln!(f, "  override: {}", entry.message)?;
        }
        writeln!(f, "Confidence: {}/100", self.confidence_score)?;
        writeln!(f)?;
        writeln!(
            f,
            "Monthly investment: {} ({} per year)",
            format_amount(investment.safe_monthly_investment),
            format_amount(investment.annual_investment)
        )?;
        if let Some(verdict) = investment.suitability.as_ref().filter(|v| !v.suitable) {
            writeln!(f, "Investing paused:")?;
            for reason in &verdict.reasons {
                writeln!(f, "  - {reason}")?;
            }
        }
        writeln!(f, "Allocation:")?;
        for (bucket, pct) in self.allocation.iter().filter(|(_, pct)| *pct > 0.0) {
            writeln!(f, "  {:<22} {:>5.1}%", bucket.label(), pct)?;
        }
        writeln!(f)?;
        writeln!(f, "Action plan:")?;
        for (position, step) in self.action_plan.timeline.iter().enumerate() {
            writeln!(
                f,
                "  {}. {} [{}] {} ({})",
                position + 1,
                step.title,
                step.priority.label(),
                step.action,
                step.duration
            )?;
        }
        writeln!(f, "Monthly checklist:")?;
        for item in &self.action_plan.monthly_checklist {
            writeln!(f, "  [ ] {item}")?;
        }
        Ok(())
    }
}

/// Whole rupees with thousands separators, e.g. `₹12,500`.
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round().abs() as u64;
    let digits = rounded.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (position, ch) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0.0 && rounded > 0 {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_amounts_with_thousands_separators() {
        assert_eq!(format_amount(0.0), "₹0");
        assert_eq!(format_amount(999.6), "₹1,000");
        assert_eq!(format_amount(1_234_567.0), "₹1,234,567");
        assert_eq!(format_amount(-2_500.0), "-₹2,500");
    }
}
