use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;

use super::period::month_key;
use super::{add, Overflow};
use crate::database::models::{
    BorrowOrLend, Category, PaymentMethod, SettlementStatus, Transaction, TransactionType,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_amount: Decimal,
    pub total_transactions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: Category,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    pub total_transactions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowLendSummary {
    #[serde(rename = "type")]
    pub direction: BorrowOrLend,
    pub pending: Decimal,
    pub settled: Decimal,
    pub total: Decimal,
    pub total_transactions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentMethodTotal {
    pub method: PaymentMethod,
    pub total: Decimal,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCashFlow {
    pub year: i32,
    pub month: u32,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAnalytics {
    pub summary: TransactionSummary,
    pub category_breakdown: Vec<CategoryBreakdown>,
    pub borrow_lend_summary: Vec<BorrowLendSummary>,
    pub payment_method_distribution: Vec<PaymentMethodTotal>,
    pub monthly_trend: Vec<MonthlyCashFlow>,
}

/// `in_range` feeds every section except the trend, which is computed from `trailing`
/// (the last twelve months regardless of the requested range).
pub fn transaction_analytics(
    in_range: &[Transaction],
    trailing: &[Transaction],
) -> Result<TransactionAnalytics, Overflow> {
    Ok(TransactionAnalytics {
        summary: summarize(in_range)?,
        category_breakdown: category_breakdown(in_range)?,
        borrow_lend_summary: borrow_lend_summary(in_range)?,
        payment_method_distribution: payment_method_distribution(in_range)?,
        monthly_trend: monthly_trend(trailing)?,
    })
}

pub fn summarize(txns: &[Transaction]) -> Result<TransactionSummary, Overflow> {
    let mut summary = TransactionSummary::default();
    for txn in txns {
        match txn.txn_type {
            TransactionType::Income => add(&mut summary.total_income, txn.amount)?,
            TransactionType::Expense => add(&mut summary.total_expense, txn.amount)?,
        }
        summary.total_transactions += 1;
    }
    summary.net_amount = summary.total_income - summary.total_expense;
    Ok(summary)
}

pub fn category_breakdown(txns: &[Transaction]) -> Result<Vec<CategoryBreakdown>, Overflow> {
    let mut by_category: HashMap<Category, CategoryBreakdown> = HashMap::new();

    for txn in txns {
        let entry = by_category
            .entry(txn.category)
            .or_insert_with(|| CategoryBreakdown {
                category: txn.category,
                income: Decimal::ZERO,
                expense: Decimal::ZERO,
                net: Decimal::ZERO,
                total_transactions: 0,
            });
        match txn.txn_type {
            TransactionType::Income => add(&mut entry.income, txn.amount)?,
            TransactionType::Expense => add(&mut entry.expense, txn.amount)?,
        }
        entry.total_transactions += 1;
    }

    let mut result: Vec<CategoryBreakdown> = by_category
        .into_values()
        .map(|mut c| {
            c.net = c.income - c.expense;
            c
        })
        .collect();

    result.sort_by(|a, b| {
        b.expense
            .cmp(&a.expense)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });
    Ok(result)
}

pub fn borrow_lend_summary(txns: &[Transaction]) -> Result<Vec<BorrowLendSummary>, Overflow> {
    let mut result: Vec<BorrowLendSummary> = Vec::new();

    for direction in [BorrowOrLend::Borrow, BorrowOrLend::Lend] {
        let mut pending = Decimal::ZERO;
        let mut settled = Decimal::ZERO;
        let mut count = 0;

        for txn in txns.iter().filter(|t| t.borrow_or_lend == direction) {
            match txn.settlement_status {
                SettlementStatus::Pending => add(&mut pending, txn.amount)?,
                SettlementStatus::Settled => add(&mut settled, txn.amount)?,
            }
            count += 1;
        }

        if count > 0 {
            result.push(BorrowLendSummary {
                direction,
                pending,
                settled,
                total: pending.checked_add(settled).ok_or(Overflow)?,
                total_transactions: count,
            });
        }
    }

    Ok(result)
}

pub fn payment_method_distribution(txns: &[Transaction]) -> Result<Vec<PaymentMethodTotal>, Overflow> {
    let mut by_method: HashMap<PaymentMethod, (Decimal, u64)> = HashMap::new();

    for txn in txns {
        let entry = by_method.entry(txn.payment_method).or_insert((Decimal::ZERO, 0));
        add(&mut entry.0, txn.amount)?;
        entry.1 += 1;
    }

    let mut result: Vec<PaymentMethodTotal> = by_method
        .into_iter()
        .map(|(method, (total, count))| PaymentMethodTotal { method, total, count })
        .collect();

    result.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.method.as_str().cmp(b.method.as_str()))
    });
    Ok(result)
}

/// Months without activity are omitted; the rest are in chronological order.
pub fn monthly_trend(txns: &[Transaction]) -> Result<Vec<MonthlyCashFlow>, Overflow> {
    let mut by_month: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();

    for txn in txns {
        let entry = by_month
            .entry(month_key(txn.date))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match txn.txn_type {
            TransactionType::Income => add(&mut entry.0, txn.amount)?,
            TransactionType::Expense => add(&mut entry.1, txn.amount)?,
        }
    }

    Ok(by_month
        .into_iter()
        .map(|((year, month), (income, expense))| MonthlyCashFlow {
            year,
            month,
            income,
            expense,
            net: income - expense,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::TransactionFields;
    use chrono::{DateTime, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn txn(
        amount: Decimal,
        txn_type: TransactionType,
        category: Category,
        payment_method: PaymentMethod,
        date: &str,
    ) -> Transaction {
        Transaction::new(
            Uuid::new_v4(),
            TransactionFields {
                amount,
                txn_type,
                description: None,
                category,
                payment_method,
                borrow_or_lend: BorrowOrLend::None,
                person_name: None,
                contact_details: None,
                settlement_status: SettlementStatus::Pending,
                date: at(date),
            },
            Utc::now(),
        )
    }

    fn loan(amount: Decimal, direction: BorrowOrLend, status: SettlementStatus) -> Transaction {
        let mut t = txn(
            amount,
            TransactionType::Expense,
            Category::Other,
            PaymentMethod::Cash,
            "2026-05-02T00:00:00Z",
        );
        t.borrow_or_lend = direction;
        t.person_name = Some("Asha".into());
        t.settlement_status = status;
        t
    }

    fn sample() -> Vec<Transaction> {
        use Category::*;
        use PaymentMethod::*;
        use TransactionType::*;
        vec![
            txn(dec!(5000), Income, Salary, NetBanking, "2026-05-01T09:00:00Z"),
            txn(dec!(300), Expense, Food, Upi, "2026-05-03T12:00:00Z"),
            txn(dec!(250), Expense, Food, Cash, "2026-05-10T12:00:00Z"),
            txn(dec!(1200), Expense, Travel, CreditCard, "2026-04-20T12:00:00Z"),
            txn(dec!(40), Income, Food, Upi, "2026-04-21T12:00:00Z"),
        ]
    }

    #[test]
    fn summary_totals() {
        let summary = summarize(&sample()).unwrap();
        assert_eq!(summary.total_income, dec!(5040));
        assert_eq!(summary.total_expense, dec!(1750));
        assert_eq!(summary.net_amount, dec!(3290));
        assert_eq!(summary.total_transactions, 5);
    }

    #[test]
    fn category_expenses_add_up_to_total_expense() {
        let txns = sample();
        let breakdown = category_breakdown(&txns).unwrap();
        let expense_sum: Decimal = breakdown.iter().map(|c| c.expense).sum();
        assert_eq!(expense_sum, summarize(&txns).unwrap().total_expense);

        assert_eq!(breakdown[0].category, Category::Travel);
        let food = breakdown.iter().find(|c| c.category == Category::Food).unwrap();
        assert_eq!(food.expense, dec!(550));
        assert_eq!(food.income, dec!(40));
        assert_eq!(food.net, dec!(-510));
        assert_eq!(food.total_transactions, 3);
    }

    #[test]
    fn borrow_lend_skips_plain_transactions() {
        let mut txns = sample();
        txns.push(loan(dec!(100), BorrowOrLend::Lend, SettlementStatus::Pending));
        txns.push(loan(dec!(60), BorrowOrLend::Lend, SettlementStatus::Settled));
        txns.push(loan(dec!(75), BorrowOrLend::Borrow, SettlementStatus::Settled));

        let summary = borrow_lend_summary(&txns).unwrap();
        assert_eq!(summary.len(), 2);

        let lend = summary.iter().find(|s| s.direction == BorrowOrLend::Lend).unwrap();
        assert_eq!(lend.pending, dec!(100));
        assert_eq!(lend.settled, dec!(60));
        assert_eq!(lend.total, dec!(160));
        assert_eq!(lend.total_transactions, 2);

        let borrow = summary.iter().find(|s| s.direction == BorrowOrLend::Borrow).unwrap();
        assert_eq!(borrow.pending, Decimal::ZERO);
        assert_eq!(borrow.settled, dec!(75));
    }

    #[test]
    fn payment_methods_sorted_by_total() {
        let dist = payment_method_distribution(&sample()).unwrap();
        let order: Vec<_> = dist.iter().map(|d| d.method).collect();
        assert_eq!(
            order,
            vec![
                PaymentMethod::NetBanking,
                PaymentMethod::CreditCard,
                PaymentMethod::Upi,
                PaymentMethod::Cash
            ]
        );
        assert_eq!(dist[2].total, dec!(340));
        assert_eq!(dist[2].count, 2);
    }

    #[test]
    fn trend_is_chronological() {
        let trend = monthly_trend(&sample()).unwrap();
        assert_eq!(trend.len(), 2);
        assert_eq!((trend[0].year, trend[0].month), (2026, 4));
        assert_eq!(trend[0].income, dec!(40));
        assert_eq!(trend[0].expense, dec!(1200));
        assert_eq!(trend[0].net, dec!(-1160));
        assert_eq!((trend[1].year, trend[1].month), (2026, 5));
        assert_eq!(trend[1].net, dec!(4450));
    }

    #[test]
    fn empty_input_yields_empty_sections() {
        let analytics = transaction_analytics(&[], &[]).unwrap();
        assert_eq!(analytics.summary, TransactionSummary::default());
        assert!(analytics.category_breakdown.is_empty());
        assert!(analytics.borrow_lend_summary.is_empty());
        assert!(analytics.payment_method_distribution.is_empty());
        assert!(analytics.monthly_trend.is_empty());
    }

    #[test]
    fn oversized_totals_are_an_error() {
        use Category::*;
        use PaymentMethod::*;
        use TransactionType::*;
        let huge = vec![
            txn(Decimal::MAX, Expense, Food, Cash, "2026-05-03T12:00:00Z"),
            txn(Decimal::MAX, Expense, Food, Cash, "2026-05-04T12:00:00Z"),
        ];
        assert_eq!(summarize(&huge), Err(Overflow));
        assert!(transaction_analytics(&huge, &[]).is_err());
        assert!(monthly_trend(&huge).is_err());
    }
}
