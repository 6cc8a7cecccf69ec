/*
Use cases behind each endpoint: validate the request, run the owner-scoped queries and
reshape the rows. Handlers stay thin and only translate HTTP in and out.
 */

pub mod budgets;
pub mod investments;
pub mod pagination;
pub mod transactions;
pub mod validation;
