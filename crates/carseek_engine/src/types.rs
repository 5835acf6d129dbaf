use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SellerType {
    Private,
    Dealer,
}

impl SellerType {
    pub fn as_str(self) -> &'static str {
        match self {
            SellerType::Private => "private",
            SellerType::Dealer => "dealer",
        }
    }
}

/// One car listing as returned by the listings API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: u64,
    pub title: String,
    pub price: u32,
    pub year: u16,
    pub brand: String,
    pub model: String,
    pub location: Option<String>,
    pub seller_type: SellerType,
}

/// One page of listings. Stored wholesale as the latest result; never
/// merged with a previous page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListingsPage {
    pub items: Vec<Listing>,
    pub total: u64,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FetchFailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for FetchFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailureKind::InvalidRequest => write!(f, "invalid request"),
            FetchFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FetchFailureKind::Timeout => write!(f, "timeout"),
            FetchFailureKind::Network => write!(f, "network error"),
            FetchFailureKind::Decode => write!(f, "decode error"),
        }
    }
}
