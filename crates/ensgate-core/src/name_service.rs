//! Resolution client contract and the record shapes it returns.
//!
//! # Queries
//!
//! | Method | Keyed by | Returns |
//! |--------|----------|---------|
//! | [`NameService::address_record`] | name | ETH address record |
//! | [`NameService::primary_name`] | address | reverse (primary) name |
//! | [`NameService::text_record`] | name, key | text record value |
//! | [`NameService::is_available`] | name | registration availability |
//! | [`NameService::owner`] | name | owner / registrant |
//! | [`NameService::expiry`] | name | expiry and grace period |
//! | [`NameService::records`] | name | aggregated records |
//! | [`NameService::subnames`] | name | indexed subnames |
//! | [`NameService::name_history`] | name | indexed events |
//! | [`NameService::rent_price`] | name, seconds | rent price in wei |
//!
//! Absence is never an error: a missing record is `None` or an empty list.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

pub type ResolveFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ResolveError>> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryName {
    pub name: String,
    /// Whether the name resolves forward to the same address.
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub forward_match: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ownership {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub registrant: Option<String>,
    pub ownership_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpiryStatus {
    Active,
    Expired,
    GracePeriod,
}

impl ExpiryStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::GracePeriod => "grace period",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expiry {
    /// Unix seconds.
    pub expires_at: i64,
    /// Seconds.
    pub grace_period: u64,
    pub status: ExpiryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinRecord {
    pub id: u64,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentHash {
    pub protocol_type: String,
    pub decoded: String,
}

/// Aggregated records served by the enriched client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameRecords {
    #[serde(default)]
    pub resolver_address: Option<String>,
    #[serde(default)]
    pub coins: Vec<CoinRecord>,
    #[serde(default)]
    pub texts: Vec<TextRecord>,
    #[serde(default)]
    pub content_hash: Option<ContentHash>,
}

impl NameRecords {
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty() && self.texts.is_empty() && self.content_hash.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subname {
    pub name: String,
    #[serde(default)]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub block_number: u64,
    pub transaction_hash: String,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Rent price in wei, as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub base: String,
    pub premium: String,
}

/// Upstream naming-resolution client.
pub trait NameService: Send + Sync {
    fn address_record<'a>(&'a self, name: &'a str) -> ResolveFuture<'a, Option<AddressRecord>>;

    fn primary_name<'a>(&'a self, address: &'a str) -> ResolveFuture<'a, Option<PrimaryName>>;

    fn text_record<'a>(&'a self, name: &'a str, key: &'a str)
        -> ResolveFuture<'a, Option<String>>;

    fn is_available<'a>(&'a self, name: &'a str) -> ResolveFuture<'a, bool>;

    fn owner<'a>(&'a self, name: &'a str) -> ResolveFuture<'a, Option<Ownership>>;

    fn expiry<'a>(&'a self, name: &'a str) -> ResolveFuture<'a, Option<Expiry>>;

    fn records<'a>(&'a self, name: &'a str) -> ResolveFuture<'a, NameRecords>;

    fn subnames<'a>(&'a self, name: &'a str) -> ResolveFuture<'a, Vec<Subname>>;

    fn name_history<'a>(&'a self, name: &'a str) -> ResolveFuture<'a, Vec<HistoryEvent>>;

    fn rent_price<'a>(&'a self, name: &'a str, duration_secs: u64) -> ResolveFuture<'a, Price>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_accept_sparse_upstream_payloads() {
        let records: NameRecords = serde_json::from_str(
            r#"{"texts":[{"key":"url","value":"https://ens.domains"}]}"#,
        )
        .expect("sparse payload decodes");

        assert_eq!(records.texts.len(), 1);
        assert!(records.coins.is_empty());
        assert!(records.content_hash.is_none());
        assert!(!records.is_empty());
    }

    #[test]
    fn expiry_status_uses_camel_case_tags() {
        let expiry: Expiry = serde_json::from_str(
            r#"{"expiresAt":1700000000,"gracePeriod":7776000,"status":"gracePeriod"}"#,
        )
        .expect("expiry decodes");

        assert_eq!(expiry.status, ExpiryStatus::GracePeriod);
        assert_eq!(expiry.grace_period, 7_776_000);
    }

    #[test]
    fn history_event_reads_type_tag() {
        let event: HistoryEvent = serde_json::from_str(
            r#"{"type":"Transfer","blockNumber":12,"transactionHash":"0xabc"}"#,
        )
        .expect("event decodes");

        assert_eq!(event.kind, "Transfer");
        assert_eq!(event.detail, None);
    }
}
