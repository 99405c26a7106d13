//! # ensgate Core
//!
//! Resilient naming-service (ENS) lookups exposed as callable operations.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Provider list resolution** from configuration, with a preferred endpoint
//! - **Retry-then-fallback transport** across every provider
//! - **Rotatable enriched client** bound to one provider at a time
//! - **Error classification** into four user-facing categories
//! - **Uniform response envelope** returned by every operation
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`classify`] | Error categories and message templates |
//! | [`client`] | Client factory and enriched-client rotation |
//! | [`config`] | Environment and policy configuration |
//! | [`context`] | Clients shared by operation handlers |
//! | [`domain`] | Names, addresses, wei amounts, timestamps |
//! | [`envelope`] | `{content, isError}` response envelope |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`name_service`] | Resolution client trait and record shapes |
//! | [`operations`] | Operation handlers and dispatch |
//! | [`provider`] | Ordered provider URL list |
//! | [`retry`] | Retry budget and delay policy |
//! | [`rpc`] | JSON-RPC resolution client |
//! | [`transport`] | Endpoint and fallback transports |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ensgate_core::{dispatch, Config, ServiceContext};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = ServiceContext::from_config(&Config::from_env())?;
//!
//!     let response = dispatch(&ctx, "resolve-name", json!({ "name": "vitalik" })).await;
//!     println!("{}", response.message());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ Operation        │──────────────▶ classify / envelope
//! │ handlers         │
//! └───┬──────────┬───┘
//!     │          │
//!     ▼          ▼
//! ┌────────┐  ┌──────────────────┐
//! │ public │  │ enriched client  │── rotate on network failure
//! │ client │  │ (one provider)   │
//! └───┬────┘  └────────┬─────────┘
//!     ▼                ▼
//! ┌──────────────────┐ ┌──────────────────┐
//! │ FallbackTransport│ │ EndpointTransport│
//! │ (all providers)  │ │ retry + timeout  │
//! └────────┬─────────┘ └────────┬─────────┘
//!          ▼                    ▼
//!       ┌──────────────────────────┐
//!       │ HttpClient (reqwest)     │
//!       └──────────────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Handlers never return `Err`. Failures carry an [`ErrorKind`] which the
//! classifier maps onto an [`ErrorCategory`]:
//!
//! ```rust
//! use ensgate_core::{classify, ResolveError};
//!
//! let error = ResolveError::invalid_input("'abc' is not a valid Ethereum address");
//! assert_eq!(
//!     classify(&error, "reverse lookup"),
//!     "Invalid input: 'abc' is not a valid Ethereum address"
//! );
//! ```

pub mod classify;
pub mod client;
pub mod config;
pub mod context;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod name_service;
pub mod operations;
pub mod provider;
pub mod retry;
pub mod rpc;
pub mod transport;

// Classification
pub use classify::{category_of, category_of_message, classify, classify_message, ErrorCategory};

// Clients
pub use client::{ClientBuilder, ClientFactory, EnrichedClientHandle};

// Configuration
pub use config::Config;
pub use context::ServiceContext;

// Domain types
pub use domain::{Address, EnsName, RegistrationDuration, UtcDateTime, Wei, SECONDS_PER_YEAR};

// Envelope
pub use envelope::{normalize, Content, ContentType, ToolResponse};

// Error types
pub use error::{
    ConfigError, EndpointFailure, ErrorKind, ResolveError, TransportError, ValidationError,
};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse, ReqwestHttpClient,
};

// Resolution client
pub use name_service::{
    AddressRecord, CoinRecord, ContentHash, Expiry, ExpiryStatus, HistoryEvent, NameRecords,
    NameService, Ownership, Price, PrimaryName, ResolveFuture, Subname, TextRecord,
};
pub use rpc::{JsonRpcClient, RpcNameService};

// Operations
pub use operations::{
    check_availability, dispatch, get_all_records, get_name_history, get_registration_price,
    get_subdomains, get_text_record, parse_arguments, resolve_name, reverse_lookup, AddressArgs,
    NameArgs, Operation, PriceArgs, TextRecordArgs,
};

// Providers and transport
pub use provider::{ProviderUrls, DEFAULT_PROVIDER_URLS};
pub use retry::RetryConfig;
pub use transport::{
    EndpointTransport, FallbackTransport, RpcTransport, TransportFuture, TransportPolicy,
};
