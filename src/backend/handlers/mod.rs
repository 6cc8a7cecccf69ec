pub mod budgets;
pub mod investments;
pub mod transactions;

use serde_json::{json, Value};

use crate::backend::response::Envelope;

/// Body of every successful DELETE.
pub(crate) fn deleted(resource: &str) -> Envelope<Value> {
    Envelope::data(json!({})).with_message(format!("{resource} deleted successfully"))
}
