use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::period::month_key;
use super::{add, checked_total, percent_change, percent_of, Overflow};
use crate::database::models::{Investment, InvestmentType};

const PERFORMER_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeTotals {
    #[serde(rename = "type")]
    pub inv_type: InvestmentType,
    pub total_invested: Decimal,
    pub total_current_value: Decimal,
    pub count: u64,
    pub profit_loss: Decimal,
    pub profit_loss_percentage: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallTotals {
    pub total_invested: Decimal,
    pub total_current_value: Decimal,
    pub total_count: u64,
    pub profit_loss: Decimal,
    pub profit_loss_percentage: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub by_type: Vec<TypeTotals>,
    pub overall: OverallTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Performer {
    pub id: Uuid,
    pub symbol: String,
    #[serde(rename = "type")]
    pub inv_type: InvestmentType,
    pub amount_invested: Decimal,
    pub current_value: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percentage: Decimal,
}

impl From<&Investment> for Performer {
    fn from(inv: &Investment) -> Self {
        Self {
            id: inv.investment_id,
            symbol: inv.symbol.clone(),
            inv_type: inv.inv_type,
            amount_invested: inv.amount_invested,
            current_value: inv.current_value,
            profit_loss: inv.profit_loss(),
            profit_loss_percentage: inv.profit_loss_percentage(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolTotals {
    pub symbol: String,
    #[serde(rename = "type")]
    pub inv_type: InvestmentType,
    pub total_invested: Decimal,
    pub total_current_value: Decimal,
    pub count: u64,
    pub profit_loss: Decimal,
    pub profit_loss_percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyInvestment {
    pub year: i32,
    pub month: u32,
    pub total_invested: Decimal,
    pub total_current_value: Decimal,
    pub count: u64,
    pub profit_loss: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    pub total_investments: u64,
    pub profitable_investments: u64,
    pub loss_making_investments: u64,
    pub average_profit_loss_percentage: Decimal,
    pub max_profit_loss_percentage: Decimal,
    pub min_profit_loss_percentage: Decimal,
    pub profitable_percentage: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentAnalytics {
    pub portfolio_summary: PortfolioSummary,
    pub top_performers: Vec<Performer>,
    pub worst_performers: Vec<Performer>,
    pub symbol_distribution: Vec<SymbolTotals>,
    pub monthly_trend: Vec<MonthlyInvestment>,
    pub performance_stats: PerformanceStats,
}

pub fn portfolio_summary(investments: &[Investment]) -> Result<PortfolioSummary, Overflow> {
    let mut by_type: Vec<TypeTotals> = Vec::new();

    for inv_type in [InvestmentType::Stock, InvestmentType::Crypto] {
        let mut invested = Decimal::ZERO;
        let mut current = Decimal::ZERO;
        let mut count = 0;
        for inv in investments.iter().filter(|i| i.inv_type == inv_type) {
            add(&mut invested, inv.amount_invested)?;
            add(&mut current, inv.current_value)?;
            count += 1;
        }
        if count > 0 {
            by_type.push(TypeTotals {
                inv_type,
                total_invested: invested,
                total_current_value: current,
                count,
                profit_loss: current - invested,
                profit_loss_percentage: percent_change(invested, current),
            });
        }
    }

    let mut overall = OverallTotals::default();
    for totals in &by_type {
        add(&mut overall.total_invested, totals.total_invested)?;
        add(&mut overall.total_current_value, totals.total_current_value)?;
        overall.total_count += totals.count;
    }
    overall.profit_loss = overall.total_current_value - overall.total_invested;
    overall.profit_loss_percentage =
        percent_change(overall.total_invested, overall.total_current_value);

    Ok(PortfolioSummary { by_type, overall })
}

/// `investments` are expected newest first; ties keep that order.
pub fn investment_analytics(
    investments: &[Investment],
    trailing: &[Investment],
) -> Result<InvestmentAnalytics, Overflow> {
    let mut ranked: Vec<&Investment> = investments.iter().collect();
    ranked.sort_by(|a, b| b.profit_loss_percentage().cmp(&a.profit_loss_percentage()));
    let top_performers = ranked
        .iter()
        .take(PERFORMER_COUNT)
        .map(|inv| Performer::from(*inv))
        .collect();

    ranked.sort_by(|a, b| a.profit_loss_percentage().cmp(&b.profit_loss_percentage()));
    let worst_performers = ranked
        .iter()
        .take(PERFORMER_COUNT)
        .map(|inv| Performer::from(*inv))
        .collect();

    Ok(InvestmentAnalytics {
        portfolio_summary: portfolio_summary(investments)?,
        top_performers,
        worst_performers,
        symbol_distribution: symbol_distribution(investments)?,
        monthly_trend: monthly_trend(trailing)?,
        performance_stats: performance_stats(investments)?,
    })
}

pub fn symbol_distribution(investments: &[Investment]) -> Result<Vec<SymbolTotals>, Overflow> {
    let mut by_symbol: HashMap<&str, SymbolTotals> = HashMap::new();

    for inv in investments {
        let entry = by_symbol
            .entry(inv.symbol.as_str())
            .or_insert_with(|| SymbolTotals {
                symbol: inv.symbol.clone(),
                // first position seen decides the type shown for the symbol
                inv_type: inv.inv_type,
                total_invested: Decimal::ZERO,
                total_current_value: Decimal::ZERO,
                count: 0,
                profit_loss: Decimal::ZERO,
                profit_loss_percentage: Decimal::ZERO,
            });
        add(&mut entry.total_invested, inv.amount_invested)?;
        add(&mut entry.total_current_value, inv.current_value)?;
        entry.count += 1;
    }

    let mut result: Vec<SymbolTotals> = by_symbol
        .into_values()
        .map(|mut s| {
            s.profit_loss = s.total_current_value - s.total_invested;
            s.profit_loss_percentage = percent_change(s.total_invested, s.total_current_value);
            s
        })
        .collect();

    result.sort_by(|a, b| {
        b.total_current_value
            .cmp(&a.total_current_value)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    Ok(result)
}

pub fn monthly_trend(investments: &[Investment]) -> Result<Vec<MonthlyInvestment>, Overflow> {
    let mut by_month: BTreeMap<(i32, u32), (Decimal, Decimal, u64)> = BTreeMap::new();

    for inv in investments {
        let entry = by_month
            .entry(month_key(inv.date))
            .or_insert((Decimal::ZERO, Decimal::ZERO, 0));
        add(&mut entry.0, inv.amount_invested)?;
        add(&mut entry.1, inv.current_value)?;
        entry.2 += 1;
    }

    Ok(by_month
        .into_iter()
        .map(|((year, month), (invested, current, count))| MonthlyInvestment {
            year,
            month,
            total_invested: invested,
            total_current_value: current,
            count,
            profit_loss: current - invested,
        })
        .collect())
}

pub fn performance_stats(investments: &[Investment]) -> Result<PerformanceStats, Overflow> {
    if investments.is_empty() {
        return Ok(PerformanceStats::default());
    }

    let percentages: Vec<Decimal> = investments
        .iter()
        .map(Investment::profit_loss_percentage)
        .collect();

    let total = investments.len() as u64;
    let profitable = investments
        .iter()
        .filter(|i| i.profit_loss() > Decimal::ZERO)
        .count() as u64;
    let loss_making = investments
        .iter()
        .filter(|i| i.profit_loss() < Decimal::ZERO)
        .count() as u64;

    let sum = checked_total(percentages.iter().copied())?;

    Ok(PerformanceStats {
        total_investments: total,
        profitable_investments: profitable,
        loss_making_investments: loss_making,
        average_profit_loss_percentage: sum / Decimal::from(total),
        max_profit_loss_percentage: percentages.iter().copied().max().unwrap_or_default(),
        min_profit_loss_percentage: percentages.iter().copied().min().unwrap_or_default(),
        profitable_percentage: percent_of(Decimal::from(profitable), Decimal::from(total)),
    })
}
