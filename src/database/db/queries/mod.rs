/*
SQL for each resource lives in its own module. Every read and write is scoped by
`user_id`, so a row owned by someone else behaves exactly like a missing row.
 */

pub mod budgets;
pub mod investments;
pub mod sessions;
pub mod transactions;

/// Sort column and direction for paginated listings.
///
/// `column` is always one of the `&'static str` SQL expressions a service whitelists,
/// never caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOrder {
    pub column: &'static str,
    pub descending: bool,
}

impl ListOrder {
    pub fn sql_direction(&self) -> &'static str {
        if self.descending {
            " DESC"
        } else {
            " ASC"
        }
    }
}

/// LIMIT/OFFSET window of a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: i64,
    pub offset: i64,
}
