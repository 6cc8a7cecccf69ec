use serde::Serialize;

use crate::service::pagination::{Paged, Pagination};

/// Uniform JSON body of every endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            count: None,
            total: None,
            pagination: None,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            count: None,
            total: None,
            pagination: None,
            data: None,
            message: Some(message.into()),
        }
    }
}

impl<T> Envelope<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        let mut envelope = Self::data(items);
        envelope.count = envelope.data.as_ref().map(|d| d.len() as u64);
        envelope
    }

    pub fn page(paged: Paged<T>) -> Self {
        let mut envelope = Self::list(paged.items);
        envelope.total = Some(paged.total);
        envelope.pagination = Some(paged.pagination);
        envelope
    }
}
