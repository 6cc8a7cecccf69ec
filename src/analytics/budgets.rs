use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::{add, percent_of, round2, Overflow};
use crate::database::models::{Budget, BudgetPeriod, Category};

const WARNING_THRESHOLD: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
const EXCEEDED_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BudgetStatus {
    #[serde(rename = "on-track")]
    OnTrack,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "exceeded")]
    Exceeded,
}

impl BudgetStatus {
    pub fn from_percentage(percentage: Decimal) -> Self {
        if percentage >= EXCEEDED_THRESHOLD {
            Self::Exceeded
        } else if percentage >= WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::OnTrack
        }
    }
}

/// Spend against a budget's limit for the window currently open.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
    pub status: BudgetStatus,
}

impl BudgetProgress {
    pub fn compute(limit: Decimal, spent: Decimal) -> Self {
        let raw = percent_of(spent, limit);
        Self {
            limit,
            spent,
            remaining: (limit - spent).max(Decimal::ZERO),
            percentage: round2(raw),
            status: BudgetStatus::from_percentage(raw),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetWithProgress {
    #[serde(flatten)]
    pub budget: Budget,
    pub progress: BudgetProgress,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetProgressEntry {
    pub id: Uuid,
    pub category: Category,
    pub period: BudgetPeriod,
    #[serde(flatten)]
    pub progress: BudgetProgress,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_budgets: u64,
    pub on_track_budgets: u64,
    pub warning_budgets: u64,
    pub exceeded_budgets: u64,
    pub total_budget_amount: Decimal,
    pub total_spent_amount: Decimal,
    pub overall_percentage: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAnalytics {
    pub summary: BudgetSummary,
    pub budget_progress: Vec<BudgetProgressEntry>,
}

pub fn budget_analytics(budgets: Vec<BudgetWithProgress>) -> Result<BudgetAnalytics, Overflow> {
    let mut summary = BudgetSummary::default();
    let mut budget_progress: Vec<BudgetProgressEntry> = Vec::with_capacity(budgets.len());

    for BudgetWithProgress { budget, progress } in budgets {
        summary.total_budgets += 1;
        match progress.status {
            BudgetStatus::OnTrack => summary.on_track_budgets += 1,
            BudgetStatus::Warning => summary.warning_budgets += 1,
            BudgetStatus::Exceeded => summary.exceeded_budgets += 1,
        }
        add(&mut summary.total_budget_amount, progress.limit)?;
        add(&mut summary.total_spent_amount, progress.spent)?;

        budget_progress.push(BudgetProgressEntry {
            id: budget.budget_id,
            category: budget.category,
            period: budget.period,
            progress,
        });
    }

    summary.overall_percentage = round2(percent_of(
        summary.total_spent_amount,
        summary.total_budget_amount,
    ));

    budget_progress.sort_by(|a, b| b.progress.percentage.cmp(&a.progress.percentage));

    Ok(BudgetAnalytics {
        summary,
        budget_progress,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::BudgetFields;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn with_progress(category: Category, limit: Decimal, spent: Decimal) -> BudgetWithProgress {
        let budget = Budget::new(
            Uuid::new_v4(),
            BudgetFields {
                category,
                limit,
                period: BudgetPeriod::Monthly,
            },
            Utc::now(),
        );
        BudgetWithProgress {
            budget,
            progress: BudgetProgress::compute(limit, spent),
        }
    }

    #[test]
    fn progress_thresholds() {
        let on_track = BudgetProgress::compute(dec!(1000), dec!(550));
        assert_eq!(on_track.remaining, dec!(450));
        assert_eq!(on_track.percentage, dec!(55));
        assert_eq!(on_track.status, BudgetStatus::OnTrack);

        let warning = BudgetProgress::compute(dec!(1000), dec!(800));
        assert_eq!(warning.status, BudgetStatus::Warning);

        let exceeded = BudgetProgress::compute(dec!(1000), dec!(1200));
        assert_eq!(exceeded.remaining, Decimal::ZERO);
        assert_eq!(exceeded.percentage, dec!(120));
        assert_eq!(exceeded.status, BudgetStatus::Exceeded);
    }

    #[test]
    fn just_below_a_threshold_is_not_promoted_by_rounding() {
        // 99.999% rounds to 100.00 for display but has not been exceeded
        let progress = BudgetProgress::compute(dec!(100000), dec!(99999));
        assert_eq!(progress.percentage, dec!(100));
        assert_eq!(progress.status, BudgetStatus::Warning);
    }

    #[test]
    fn zero_limit_reports_zero_percent() {
        let progress = BudgetProgress::compute(Decimal::ZERO, dec!(25));
        assert_eq!(progress.percentage, Decimal::ZERO);
        assert_eq!(progress.remaining, Decimal::ZERO);
        assert_eq!(progress.status, BudgetStatus::OnTrack);
    }

    #[test]
    fn analytics_counts_and_orders_by_percentage() {
        let analytics = budget_analytics(vec![
            with_progress(Category::Food, dec!(1000), dec!(550)),
            with_progress(Category::Travel, dec!(200), dec!(250)),
            with_progress(Category::Bills, dec!(500), dec!(450)),
        ])
        .unwrap();

        assert_eq!(analytics.summary.total_budgets, 3);
        assert_eq!(analytics.summary.on_track_budgets, 1);
        assert_eq!(analytics.summary.warning_budgets, 1);
        assert_eq!(analytics.summary.exceeded_budgets, 1);
        assert_eq!(analytics.summary.total_budget_amount, dec!(1700));
        assert_eq!(analytics.summary.total_spent_amount, dec!(1250));
        assert_eq!(analytics.summary.overall_percentage, dec!(73.53));

        let order: Vec<_> = analytics.budget_progress.iter().map(|b| b.category).collect();
        assert_eq!(order, vec![Category::Travel, Category::Bills, Category::Food]);
    }

    #[test]
    fn empty_analytics_is_all_zero() {
        let analytics = budget_analytics(Vec::new()).unwrap();
        assert_eq!(analytics.summary, BudgetSummary::default());
        assert!(analytics.budget_progress.is_empty());
    }

    #[test]
    fn summary_totals_past_decimal_range_are_an_error() {
        let result = budget_analytics(vec![
            with_progress(Category::Food, Decimal::MAX, dec!(10)),
            with_progress(Category::Travel, Decimal::MAX, dec!(10)),
        ]);
        assert_eq!(result.err(), Some(Overflow));
    }
}
