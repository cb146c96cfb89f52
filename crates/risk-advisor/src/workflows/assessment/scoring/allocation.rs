use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::{AnswerSet, AssetBucket};
use super::category::{classify, upper_bound};
use super::config::{AgeAdjustedAllocation, AllocationModel, ScoringConfig};
use super::overrides::OverrideOutcome;
use super::scale::{round1, round2};

/// Percentage split across asset buckets; sums to 100 once normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation(BTreeMap<AssetBucket, f64>);

impl Allocation {
    pub fn get(&self, bucket: AssetBucket) -> f64 {
        self.0.get(&bucket).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetBucket, f64)> + '_ {
        self.0.iter().map(|(bucket, pct)| (*bucket, *pct))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Monthly amount routed to each bucket for a given investment.
    pub fn monthly_amounts(&self, monthly_investment: f64) -> Vec<(AssetBucket, f64)> {
        self.iter()
            .filter(|(_, pct)| *pct > 0.0)
            .map(|(bucket, pct)| (bucket, round2(monthly_investment * pct / 100.0)))
            .collect()
    }

    /// Round to one decimal, rescale when the drift exceeds `drift_tolerance`, then hand the
    /// remaining residual to the largest bucket (first in bucket order on ties).
    pub fn normalized(raw: BTreeMap<AssetBucket, f64>, drift_tolerance: f64) -> Self {
        let mut buckets: BTreeMap<AssetBucket, f64> = raw
            .into_iter()
            .map(|(bucket, pct)| (bucket, round1(pct.max(0.0))))
            .collect();

        let sum: f64 = buckets.values().sum();
        if sum <= 0.0 {
            return Self(buckets);
        }

        if (sum - 100.0).abs() > drift_tolerance {
            for pct in buckets.values_mut() {
                *pct = round1(*pct * 100.0 / sum);
            }
        }

        let sum: f64 = buckets.values().sum();
        let residual = round1(100.0 - sum);
        if residual != 0.0 {
            let largest = buckets
                .iter()
                .fold(None::<(AssetBucket, f64)>, |best, (bucket, pct)| match best {
                    Some((_, top)) if *pct <= top => best,
                    _ => Some((*bucket, *pct)),
                })
                .map(|(bucket, _)| bucket);
            if let Some(slot) = largest.and_then(|bucket| buckets.get_mut(&bucket)) {
                *slot = round1((*slot + residual).max(0.0));
            }
        }

        Self(buckets)
    }
}

impl FromIterator<(AssetBucket, f64)> for Allocation {
    fn from_iter<I: IntoIterator<Item = (AssetBucket, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub(crate) fn allocate(
    answers: &AnswerSet,
    risk_total: f64,
    overrides: &OverrideOutcome,
    config: &ScoringConfig,
) -> Allocation {
    let raw = match &config.allocation.model {
        AllocationModel::Table(rows) => table_allocation(rows, overrides.allocation_key),
        AllocationModel::AgeAdjusted(adjusted) => {
            // Overrides cap the score the allocation is derived from.
            let ceiling = upper_bound(overrides.final_category, &config.categories);
            let effective = risk_total.min(ceiling);
            age_adjusted_allocation(answers, effective, adjusted, config)
        }
    };

    Allocation::normalized(raw, config.allocation.drift_tolerance)
}

fn table_allocation(rows: &[[f64; 4]], key: u8) -> BTreeMap<AssetBucket, f64> {
    let row = rows
        .get(usize::from(key.clamp(1, 5)) - 1)
        .copied()
        .unwrap_or([0.0; 4]);
    AssetBucket::EQUITY.into_iter().zip(row).collect()
}

fn age_adjusted_allocation(
    answers: &AnswerSet,
    score: f64,
    adjusted: &AgeAdjustedAllocation,
    config: &ScoringConfig,
) -> BTreeMap<AssetBucket, f64> {
    let base_equity = adjusted
        .age_equity
        .get(config.tiers.age_group.offset(answers.age_group))
        .copied()
        .unwrap_or(0.0);
    let strategy = answers.inflation_strategy;

    let equity = (base_equity
        * (adjusted.base_factor + adjusted.score_factor * score / 100.0)
        * adjusted.inflation_multiplier.get(strategy))
    .clamp(0.0, 100.0);
    let reserve = adjusted.inflation_reserve.get(strategy).min(equity);
    let remaining = equity - reserve;

    let bracket = usize::from(classify(score, &config.categories).index() - 1);
    let split = adjusted
        .bracket_splits
        .get(bracket)
        .copied()
        .unwrap_or([100.0, 0.0, 0.0, 0.0]);

    let mut buckets: BTreeMap<AssetBucket, f64> = AssetBucket::EQUITY
        .into_iter()
        .zip(split)
        .map(|(bucket, share)| (bucket, remaining * share / 100.0))
        .collect();
    buckets.insert(AssetBucket::InflationProtection, reserve);
    buckets.insert(AssetBucket::FixedIncome, 100.0 - equity);
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_drift_only_moves_the_largest_bucket() {
        let raw = BTreeMap::from([
            (AssetBucket::LargeCap, 49.9),
            (AssetBucket::MidCap, 29.9),
            (AssetBucket::SmallCap, 9.9),
            (AssetBucket::Growth, 10.0),
        ]);

        let allocation = Allocation::normalized(raw, 0.5);

        assert_eq!(allocation.get(AssetBucket::LargeCap), 50.2);
        assert_eq!(allocation.get(AssetBucket::MidCap), 29.9);
        assert_eq!(allocation.get(AssetBucket::SmallCap), 9.9);
        assert_eq!(allocation.get(AssetBucket::Growth), 10.0);
        assert!((allocation.total() - 100.0).abs() < 0.05);
    }

    #[test]
    fn large_drift_is_rescaled_before_the_residual() {
        let raw = BTreeMap::from([(AssetBucket::LargeCap, 30.0), (AssetBucket::MidCap, 30.0)]);

        let allocation = Allocation::normalized(raw, 0.5);

        assert_eq!(allocation.get(AssetBucket::LargeCap), 50.0);
        assert_eq!(allocation.get(AssetBucket::MidCap), 50.0);
    }

    #[test]
    fn ties_resolve_to_first_bucket() {
        let raw = BTreeMap::from([
            (AssetBucket::LargeCap, 33.3),
            (AssetBucket::MidCap, 33.3),
            (AssetBucket::SmallCap, 33.3),
        ]);

        let allocation = Allocation::normalized(raw, 0.5);

        assert_eq!(allocation.get(AssetBucket::LargeCap), 33.4);
        assert_eq!(allocation.get(AssetBucket::MidCap), 33.3);
    }

    #[test]
    fn monthly_amounts_skip_empty_buckets() {
        let allocation: Allocation = [
            (AssetBucket::LargeCap, 85.0),
            (AssetBucket::MidCap, 15.0),
            (AssetBucket::SmallCap, 0.0),
        ]
        .into_iter()
        .collect();

        let amounts = allocation.monthly_amounts(10_000.0);
        assert_eq!(
            amounts,
            vec![(AssetBucket::LargeCap, 8_500.0), (AssetBucket::MidCap, 1_500.0)]
        );
    }
}
