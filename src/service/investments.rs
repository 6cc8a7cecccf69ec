use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{Pool, Sqlite};
use tracing::info;
use uuid::Uuid;

use crate::analytics::investments::{
    investment_analytics, portfolio_summary, InvestmentAnalytics, PortfolioSummary,
};
use crate::analytics::period::trailing_months_start;
use crate::database::db::queries::investments::{self as queries, InvestmentFilter};
use crate::database::db::queries::ListOrder;
use crate::database::models::{Investment, InvestmentFields, InvestmentType, InvestmentView};
use crate::error::AppError;
use crate::service::pagination::{parse_sort, PageRequest, Paged};
use crate::service::validation::{filter_value, parse_id, Violations, MAX_AMOUNT};

const RESOURCE: &str = "Investment";
const MAX_SYMBOL_CHARS: usize = 10;

const SORT_FIELDS: &[(&str, &str)] = &[
    ("date", "date"),
    ("symbol", "symbol"),
    ("amountInvested", "CAST(amount_invested AS REAL)"),
    ("currentValue", "CAST(current_value AS REAL)"),
    ("type", "inv_type"),
    ("createdAt", "created_at"),
];

const DEFAULT_ORDER: ListOrder = ListOrder {
    column: "date",
    descending: true,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentInput {
    #[serde(rename = "type")]
    pub inv_type: Option<String>,
    pub symbol: Option<String>,
    pub amount_invested: Option<Decimal>,
    pub current_value: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub purchase_price: Option<Decimal>,
    pub date: Option<String>,
}

impl InvestmentInput {
    fn over(self, existing: &Investment) -> Self {
        Self {
            inv_type: self.inv_type.or_else(|| Some(existing.inv_type.as_str().into())),
            symbol: self.symbol.or_else(|| Some(existing.symbol.clone())),
            amount_invested: self.amount_invested.or(Some(existing.amount_invested)),
            current_value: self.current_value.or(Some(existing.current_value)),
            quantity: self.quantity.or(existing.quantity),
            purchase_price: self.purchase_price.or(existing.purchase_price),
            date: self.date.or_else(|| Some(existing.date.to_rfc3339())),
        }
    }

    fn validate(self, now: DateTime<Utc>) -> Result<InvestmentFields, AppError> {
        let mut v = Violations::default();

        let inv_type = v.choice(
            self.inv_type.as_deref(),
            InvestmentType::parse,
            "Investment type is required",
            "Investment type must be either stock or crypto",
        );
        let symbol = match self.symbol.map(|s| s.trim().to_uppercase()).filter(|s| !s.is_empty()) {
            None => {
                v.push("Symbol is required");
                None
            }
            Some(symbol) if symbol.chars().count() > MAX_SYMBOL_CHARS => {
                v.push("Symbol cannot be more than 10 characters");
                None
            }
            Some(symbol) => Some(symbol),
        };
        let amount_invested = v.amount(self.amount_invested, "Amount invested");
        let current_value = v.non_negative(self.current_value, "Current value");
        let quantity = v.non_negative(self.quantity, "Quantity");
        let purchase_price = v.non_negative(self.purchase_price, "Purchase price");
        let date = match self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            None => Some(now),
            Some(raw) => v.timestamp(Some(raw), "Please provide a valid date"),
        };

        v.finish()?;

        let (Some(inv_type), Some(symbol), Some(amount_invested), Some(date)) =
            (inv_type, symbol, amount_invested, date)
        else {
            return Err(AppError::Validation("Missing required fields".into()));
        };

        Ok(InvestmentFields {
            inv_type,
            symbol,
            amount_invested,
            current_value: current_value.unwrap_or(amount_invested),
            quantity,
            purchase_price,
            date,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentQuery {
    #[serde(rename = "type")]
    pub inv_type: Option<String>,
    pub symbol: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

impl InvestmentQuery {
    fn filter(&self) -> Result<InvestmentFilter, AppError> {
        let mut v = Violations::default();
        let inv_type = v.optional_choice(
            filter_value(self.inv_type.as_deref()),
            InvestmentType::parse,
            "Investment type must be either stock or crypto",
        );
        v.finish()?;

        Ok(InvestmentFilter {
            inv_type,
            symbol: self
                .symbol
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            since: None,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueInput {
    pub current_value: Option<Decimal>,
}

pub async fn list(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    query: &InvestmentQuery,
) -> Result<Paged<InvestmentView>, AppError> {
    let filter = query.filter()?;
    let request = PageRequest::parse(query.page.as_deref(), query.limit.as_deref());
    let order = parse_sort(query.sort.as_deref(), SORT_FIELDS, DEFAULT_ORDER);

    let total = queries::count_investments(pool, user_id, &filter).await?;
    let items = queries::list_investments(pool, user_id, &filter, order, request.window()).await?;

    Ok(request
        .paginate(items, u64::try_from(total).unwrap_or_default())
        .map(InvestmentView::from))
}

async fn find(pool: &Pool<Sqlite>, user_id: Uuid, id: &str) -> Result<Investment, AppError> {
    let investment_id = parse_id(id, RESOURCE)?;
    queries::get_investment(pool, user_id, investment_id)
        .await?
        .ok_or(AppError::NotFound(RESOURCE))
}

pub async fn get(pool: &Pool<Sqlite>, user_id: Uuid, id: &str) -> Result<InvestmentView, AppError> {
    find(pool, user_id, id).await.map(InvestmentView::from)
}

pub async fn create(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    input: InvestmentInput,
    now: DateTime<Utc>,
) -> Result<InvestmentView, AppError> {
    let investment = Investment::new(user_id, input.validate(now)?, now);
    queries::insert_investment(pool, &investment).await?;

    info!(investment_id = %investment.investment_id, %user_id, symbol = %investment.symbol, "investment created");
    Ok(investment.into())
}

pub async fn update(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    id: &str,
    input: InvestmentInput,
    now: DateTime<Utc>,
) -> Result<InvestmentView, AppError> {
    let mut investment = find(pool, user_id, id).await?;
    let fields = input.over(&investment).validate(now)?;
    investment.apply(fields, now);

    if !queries::update_investment(pool, &investment).await? {
        return Err(AppError::NotFound(RESOURCE));
    }
    Ok(investment.into())
}

pub async fn delete(pool: &Pool<Sqlite>, user_id: Uuid, id: &str) -> Result<(), AppError> {
    let investment_id = parse_id(id, RESOURCE)?;
    if !queries::delete_investment(pool, user_id, investment_id).await? {
        return Err(AppError::NotFound(RESOURCE));
    }

    info!(%investment_id, %user_id, "investment deleted");
    Ok(())
}

/// Revalues a position without touching anything else.
pub async fn set_current_value(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    id: &str,
    input: ValueInput,
    now: DateTime<Utc>,
) -> Result<InvestmentView, AppError> {
    let current_value = input
        .current_value
        .filter(|v| (!v.is_sign_negative() || v.is_zero()) && *v <= MAX_AMOUNT)
        .ok_or_else(|| AppError::Validation("Please provide a valid current value".into()))?;

    let mut investment = find(pool, user_id, id).await?;
    investment.current_value = current_value;
    investment.updated_at = now;

    if !queries::update_investment(pool, &investment).await? {
        return Err(AppError::NotFound(RESOURCE));
    }
    Ok(investment.into())
}

pub async fn portfolio(pool: &Pool<Sqlite>, user_id: Uuid) -> Result<PortfolioSummary, AppError> {
    let investments = queries::matching_investments(pool, user_id, &InvestmentFilter::default()).await?;
    Ok(portfolio_summary(&investments)?)
}

pub async fn analytics(
    pool: &Pool<Sqlite>,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<InvestmentAnalytics, AppError> {
    let all = queries::matching_investments(pool, user_id, &InvestmentFilter::default()).await?;
    let trailing_filter = InvestmentFilter {
        since: Some(trailing_months_start(now, 12)),
        ..Default::default()
    };
    let trailing = queries::matching_investments(pool, user_id, &trailing_filter).await?;

    Ok(investment_analytics(&all, &trailing)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 18, 12, 0, 0).unwrap()
    }

    fn btc() -> InvestmentInput {
        InvestmentInput {
            inv_type: Some("crypto".into()),
            symbol: Some("  btc ".into()),
            amount_invested: Some(dec!(500)),
            ..Default::default()
        }
    }

    #[test]
    fn current_value_defaults_to_amount_invested() {
        let fields = btc().validate(now()).unwrap();
        assert_eq!(fields.symbol, "BTC");
        assert_eq!(fields.current_value, dec!(500));
        assert_eq!(fields.date, now());
    }

    #[test]
    fn explicit_zero_current_value_is_kept() {
        let fields = InvestmentInput {
            current_value: Some(dec!(0)),
            ..btc()
        }
        .validate(now())
        .unwrap();
        assert_eq!(fields.current_value, dec!(0));
    }

    #[test]
    fn symbol_rules() {
        let long = InvestmentInput {
            symbol: Some("ABCDEFGHIJK".into()),
            ..btc()
        };
        assert_eq!(
            long.validate(now()).unwrap_err().to_string(),
            "Symbol cannot be more than 10 characters"
        );

        let blank = InvestmentInput {
            symbol: Some("   ".into()),
            inv_type: Some("bond".into()),
            ..btc()
        };
        assert_eq!(
            blank.validate(now()).unwrap_err().to_string(),
            "Investment type must be either stock or crypto, Symbol is required"
        );
    }

    #[test]
    fn update_keeps_stored_value_when_omitted() {
        let stored = Investment::new(
            Uuid::new_v4(),
            InvestmentInput {
                current_value: Some(dec!(650)),
                ..btc()
            }
            .validate(now())
            .unwrap(),
            now(),
        );
        let patch = InvestmentInput {
            amount_invested: Some(dec!(600)),
            ..Default::default()
        };
        let fields = patch.over(&stored).validate(now()).unwrap();
        assert_eq!(fields.amount_invested, dec!(600));
        assert_eq!(fields.current_value, dec!(650));
    }
}
