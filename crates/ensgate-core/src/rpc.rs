//! JSON-RPC 2.0 resolution client.
//!
//! The upstream resolution service owns every naming rule (normalisation,
//! resolver lookup, content-hash decoding, event indexing). This client only
//! frames calls, sends them over an [`RpcTransport`] and decodes results.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ResolveError;
use crate::name_service::{
    AddressRecord, Expiry, HistoryEvent, NameRecords, NameService, Ownership, Price, PrimaryName,
    ResolveFuture, Subname,
};
use crate::transport::RpcTransport;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Frames JSON-RPC requests over one transport.
pub struct JsonRpcClient<T> {
    transport: T,
    next_id: AtomicU64,
}

impl<T: RpcTransport> JsonRpcClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<R, ResolveError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::to_string(&RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        })
        .map_err(|e| {
            ResolveError::unclassified(format!("failed to encode {method} request: {e}"))
        })?;

        debug!(method, id, "dispatching rpc call");
        let raw = self.transport.send(body).await?;

        let response: RpcResponse = serde_json::from_str(&raw).map_err(|e| {
            ResolveError::unclassified(format!("malformed response to {method}: {e}"))
        })?;

        if let Some(error) = response.error {
            return Err(ResolveError::protocol(format!(
                "{} (rpc code {})",
                error.message, error.code
            )));
        }

        serde_json::from_value(response.result.unwrap_or(Value::Null)).map_err(|e| {
            ResolveError::unclassified(format!("unexpected result shape for {method}: {e}"))
        })
    }
}

/// [`NameService`] implementation speaking JSON-RPC to the upstream service.
pub struct RpcNameService<T> {
    rpc: JsonRpcClient<T>,
}

impl<T: RpcTransport> RpcNameService<T> {
    pub fn new(transport: T) -> Self {
        Self {
            rpc: JsonRpcClient::new(transport),
        }
    }
}

impl<T: RpcTransport> NameService for RpcNameService<T> {
    fn address_record<'a>(&'a self, name: &'a str) -> ResolveFuture<'a, Option<AddressRecord>> {
        Box::pin(
            self.rpc
                .call::<Option<AddressRecord>>("ens_getAddressRecord", json!({ "name": name })),
        )
    }

    fn primary_name<'a>(&'a self, address: &'a str) -> ResolveFuture<'a, Option<PrimaryName>> {
        Box::pin(
            self.rpc
                .call::<Option<PrimaryName>>("ens_getName", json!({ "address": address })),
        )
    }

    fn text_record<'a>(
        &'a self,
        name: &'a str,
        key: &'a str,
    ) -> ResolveFuture<'a, Option<String>> {
        Box::pin(async move {
            let record: Option<TextValue> = self
                .rpc
                .call("ens_getTextRecord", json!({ "name": name, "key": key }))
                .await?;
            Ok(record.map(|record| record.value))
        })
    }

    fn is_available<'a>(&'a self, name: &'a str) -> ResolveFuture<'a, bool> {
        Box::pin(
            self.rpc
                .call::<bool>("ens_getAvailable", json!({ "name": name })),
        )
    }

    fn owner<'a>(&'a self, name: &'a str) -> ResolveFuture<'a, Option<Ownership>> {
        Box::pin(
            self.rpc
                .call::<Option<Ownership>>("ens_getOwner", json!({ "name": name })),
        )
    }

    fn expiry<'a>(&'a self, name: &'a str) -> ResolveFuture<'a, Option<Expiry>> {
        Box::pin(
            self.rpc
                .call::<Option<Expiry>>("ens_getExpiry", json!({ "name": name })),
        )
    }

    fn records<'a>(&'a self, name: &'a str) -> ResolveFuture<'a, NameRecords> {
        Box::pin(async move {
            let records: Option<NameRecords> =
                self.rpc.call("ens_getRecords", json!({ "name": name })).await?;
            Ok(records.unwrap_or_default())
        })
    }

    fn subnames<'a>(&'a self, name: &'a str) -> ResolveFuture<'a, Vec<Subname>> {
        Box::pin(async move {
            let subnames: Option<Vec<Subname>> =
                self.rpc.call("ens_getSubnames", json!({ "name": name })).await?;
            Ok(subnames.unwrap_or_default())
        })
    }

    fn name_history<'a>(&'a self, name: &'a str) -> ResolveFuture<'a, Vec<HistoryEvent>> {
        Box::pin(async move {
            let events: Option<Vec<HistoryEvent>> =
                self.rpc.call("ens_getNameHistory", json!({ "name": name })).await?;
            Ok(events.unwrap_or_default())
        })
    }

    fn rent_price<'a>(&'a self, name: &'a str, duration_secs: u64) -> ResolveFuture<'a, Price> {
        Box::pin(async move {
            let price: Option<Price> = self
                .rpc
                .call(
                    "ens_getPrice",
                    json!({ "name": name, "duration": duration_secs }),
                )
                .await?;
            price.ok_or_else(|| {
                ResolveError::protocol(format!("ENS returned no price for {name}"))
            })
        })
    }
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: String,
}
