mod common;

use finance_dashboard::database::models::{InvestmentStatus, InvestmentType};
use finance_dashboard::error::AppError;
use finance_dashboard::service::investments::{
    self, InvestmentInput, InvestmentQuery, ValueInput,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

fn position(kind: &str, symbol: &str, invested: Decimal, current: Decimal, date: &str) -> InvestmentInput {
    InvestmentInput {
        inv_type: Some(kind.into()),
        symbol: Some(symbol.into()),
        amount_invested: Some(invested),
        current_value: Some(current),
        date: Some(date.into()),
        ..Default::default()
    }
}

async fn seed(pool: &Pool<Sqlite>, user: Uuid) {
    for input in [
        position("stock", "AAPL", dec!(1000), dec!(1200), "2026-01-10"),
        position("stock", "MSFT", dec!(500), dec!(450), "2026-02-03"),
        position("crypto", "BTC", dec!(2000), dec!(3000), "2026-02-20"),
        position("crypto", "ETH", dec!(800), dec!(800), "2024-06-01"),
    ] {
        investments::create(pool, user, input, common::now()).await.unwrap();
    }
}

#[tokio::test]
async fn current_value_defaults_and_valuation_is_derived() {
    let pool = common::pool().await;
    let user = common::user(&pool, "investor@example.com").await;

    let input = InvestmentInput {
        inv_type: Some("stock".into()),
        symbol: Some(" tsla ".into()),
        amount_invested: Some(dec!(750)),
        quantity: Some(dec!(3)),
        ..Default::default()
    };
    let view = investments::create(&pool, user, input, common::now()).await.unwrap();

    assert_eq!(view.investment.symbol, "TSLA");
    assert_eq!(view.investment.current_value, dec!(750));
    assert_eq!(view.investment.date, common::now());
    assert_eq!(view.profit_loss, Decimal::ZERO);
    assert_eq!(view.status, InvestmentStatus::Neutral);

    let id = view.investment.investment_id.to_string();
    let read = investments::get(&pool, user, &id).await.unwrap();
    assert_eq!(read.investment.quantity, Some(dec!(3)));
}

#[tokio::test]
async fn set_value_revalues_and_validates() {
    let pool = common::pool().await;
    let user = common::user(&pool, "revalue@example.com").await;
    let other = common::user(&pool, "nosy@example.com").await;

    let view = investments::create(
        &pool,
        user,
        position("crypto", "SOL", dec!(400), dec!(400), "2026-03-01"),
        common::now(),
    )
    .await
    .unwrap();
    let id = view.investment.investment_id.to_string();

    for bad in [None, Some(dec!(-1))] {
        let err = investments::set_current_value(&pool, user, &id, ValueInput { current_value: bad }, common::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Please provide a valid current value"));
    }

    let err = investments::set_current_value(
        &pool,
        other,
        &id,
        ValueInput {
            current_value: Some(dec!(500)),
        },
        common::now(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Investment")));

    let revalued = investments::set_current_value(
        &pool,
        user,
        &id,
        ValueInput {
            current_value: Some(dec!(300)),
        },
        common::now(),
    )
    .await
    .unwrap();
    assert_eq!(revalued.investment.current_value, dec!(300));
    assert_eq!(revalued.investment.amount_invested, dec!(400));
    assert_eq!(revalued.profit_loss, dec!(-100));
    assert_eq!(revalued.profit_loss_percentage, dec!(-25));
    assert_eq!(revalued.status, InvestmentStatus::Loss);
}

#[tokio::test]
async fn symbol_filter_is_a_case_insensitive_substring() {
    let pool = common::pool().await;
    let user = common::user(&pool, "search@example.com").await;
    seed(&pool, user).await;

    let query = InvestmentQuery {
        symbol: Some("t".into()),
        ..Default::default()
    };
    let page = investments::list(&pool, user, &query).await.unwrap();
    let mut symbols: Vec<String> = page.items.iter().map(|v| v.investment.symbol.clone()).collect();
    symbols.sort();
    assert_eq!(symbols, vec!["BTC", "ETH"]);

    let crypto = InvestmentQuery {
        inv_type: Some("crypto".into()),
        sort: Some("-currentValue".into()),
        ..Default::default()
    };
    let page = investments::list(&pool, user, &crypto).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items[0].investment.symbol, "BTC");
    assert_eq!(page.pagination.pages, 1);

    let wildcard = InvestmentQuery {
        symbol: Some("%".into()),
        ..Default::default()
    };
    assert_eq!(investments::list(&pool, user, &wildcard).await.unwrap().total, 0);
}

#[tokio::test]
async fn portfolio_totals_by_type_and_overall() {
    let pool = common::pool().await;
    let user = common::user(&pool, "portfolio@example.com").await;
    seed(&pool, user).await;

    let summary = investments::portfolio(&pool, user).await.unwrap();

    let stock = summary
        .by_type
        .iter()
        .find(|t| t.inv_type == InvestmentType::Stock)
        .unwrap();
    assert_eq!(stock.total_invested, dec!(1500));
    assert_eq!(stock.total_current_value, dec!(1650));
    assert_eq!(stock.count, 2);
    assert_eq!(stock.profit_loss, dec!(150));
    assert_eq!(stock.profit_loss_percentage, dec!(10));

    assert_eq!(summary.overall.total_invested, dec!(4300));
    assert_eq!(summary.overall.total_current_value, dec!(5450));
    assert_eq!(summary.overall.total_count, 4);
    assert_eq!(summary.overall.profit_loss, dec!(1150));
}

#[tokio::test]
async fn analytics_ranks_and_trends() {
    let pool = common::pool().await;
    let user = common::user(&pool, "ranks@example.com").await;
    seed(&pool, user).await;

    let analytics = investments::analytics(&pool, user, common::now()).await.unwrap();

    let top: Vec<&str> = analytics.top_performers.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(top, vec!["BTC", "AAPL", "ETH", "MSFT"]);
    assert_eq!(analytics.worst_performers[0].symbol, "MSFT");

    assert_eq!(analytics.symbol_distribution[0].symbol, "BTC");

    // ETH is older than twelve months
    let months: Vec<(i32, u32)> = analytics.monthly_trend.iter().map(|m| (m.year, m.month)).collect();
    assert_eq!(months, vec![(2026, 1), (2026, 2)]);
    assert_eq!(analytics.monthly_trend[1].count, 2);

    let stats = &analytics.performance_stats;
    assert_eq!(stats.total_investments, 4);
    assert_eq!(stats.profitable_investments, 2);
    assert_eq!(stats.loss_making_investments, 1);
    assert_eq!(stats.max_profit_loss_percentage, dec!(50));
    assert_eq!(stats.min_profit_loss_percentage, dec!(-10));
    assert_eq!(stats.profitable_percentage, dec!(50));
}

#[tokio::test]
async fn delete_is_owner_scoped() {
    let pool = common::pool().await;
    let user = common::user(&pool, "keep@example.com").await;
    let other = common::user(&pool, "take@example.com").await;

    let view = investments::create(
        &pool,
        user,
        position("stock", "NVDA", dec!(100), dec!(180), "2026-03-01"),
        common::now(),
    )
    .await
    .unwrap();
    let id = view.investment.investment_id.to_string();

    assert!(matches!(
        investments::delete(&pool, other, &id).await,
        Err(AppError::NotFound(_))
    ));
    investments::delete(&pool, user, &id).await.unwrap();
    assert!(matches!(
        investments::get(&pool, user, &id).await,
        Err(AppError::NotFound(_))
    ));
}
