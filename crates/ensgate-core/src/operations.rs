//! Operation handlers.
//!
//! Every handler returns exactly one [`ToolResponse`]; failures are
//! classified into an error envelope and never escape as `Err`.
//!
//! | Operation | Client | Label used for unknown errors |
//! |-----------|--------|-------------------------------|
//! | `resolve-name` | public | resolving name |
//! | `reverse-lookup` | public | reverse lookup |
//! | `get-text-record` | public | getting text record |
//! | `check-availability` | public | checking availability |
//! | `get-all-records` | enriched | getting records |
//! | `get-subdomains` | public | getting subdomains |
//! | `get-name-history` | public | getting name history |
//! | `get-registration-price` | public | getting registration price |

use std::fmt::Write as _;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::context::ServiceContext;
use crate::domain::{Address, EnsName, RegistrationDuration, UtcDateTime, Wei};
use crate::envelope::{normalize, ToolResponse};
use crate::error::{ResolveError, ValidationError};
use crate::name_service::{Expiry, NameRecords, Ownership};

const DISPATCH_LABEL: &str = "dispatching operation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ResolveName,
    ReverseLookup,
    GetTextRecord,
    CheckAvailability,
    GetAllRecords,
    GetSubdomains,
    GetNameHistory,
    GetRegistrationPrice,
}

impl Operation {
    pub const ALL: [Self; 8] = [
        Self::ResolveName,
        Self::ReverseLookup,
        Self::GetTextRecord,
        Self::CheckAvailability,
        Self::GetAllRecords,
        Self::GetSubdomains,
        Self::GetNameHistory,
        Self::GetRegistrationPrice,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::ResolveName => "resolve-name",
            Self::ReverseLookup => "reverse-lookup",
            Self::GetTextRecord => "get-text-record",
            Self::CheckAvailability => "check-availability",
            Self::GetAllRecords => "get-all-records",
            Self::GetSubdomains => "get-subdomains",
            Self::GetNameHistory => "get-name-history",
            Self::GetRegistrationPrice => "get-registration-price",
        }
    }

    /// Phrase interpolated into the unknown-error template.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ResolveName => "resolving name",
            Self::ReverseLookup => "reverse lookup",
            Self::GetTextRecord => "getting text record",
            Self::CheckAvailability => "checking availability",
            Self::GetAllRecords => "getting records",
            Self::GetSubdomains => "getting subdomains",
            Self::GetNameHistory => "getting name history",
            Self::GetRegistrationPrice => "getting registration price",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|operation| operation.name() == name.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NameArgs {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressArgs {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextRecordArgs {
    pub name: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriceArgs {
    pub name: String,
    /// Whole years.
    #[serde(default = "default_duration_years")]
    pub duration: u64,
}

fn default_duration_years() -> u64 {
    1
}

pub async fn resolve_name(ctx: &ServiceContext, args: &NameArgs) -> ToolResponse {
    normalize(
        resolve_name_text(ctx, args).await,
        Operation::ResolveName.label(),
    )
}

pub async fn reverse_lookup(ctx: &ServiceContext, args: &AddressArgs) -> ToolResponse {
    normalize(
        reverse_lookup_text(ctx, args).await,
        Operation::ReverseLookup.label(),
    )
}

pub async fn get_text_record(ctx: &ServiceContext, args: &TextRecordArgs) -> ToolResponse {
    normalize(
        text_record_text(ctx, args).await,
        Operation::GetTextRecord.label(),
    )
}

pub async fn check_availability(ctx: &ServiceContext, args: &NameArgs) -> ToolResponse {
    normalize(
        availability_text(ctx, args).await,
        Operation::CheckAvailability.label(),
    )
}

pub async fn get_all_records(ctx: &ServiceContext, args: &NameArgs) -> ToolResponse {
    normalize(
        all_records_text(ctx, args).await,
        Operation::GetAllRecords.label(),
    )
}

pub async fn get_subdomains(ctx: &ServiceContext, args: &NameArgs) -> ToolResponse {
    normalize(
        subdomains_text(ctx, args).await,
        Operation::GetSubdomains.label(),
    )
}

pub async fn get_name_history(ctx: &ServiceContext, args: &NameArgs) -> ToolResponse {
    normalize(
        history_text(ctx, args).await,
        Operation::GetNameHistory.label(),
    )
}

pub async fn get_registration_price(ctx: &ServiceContext, args: &PriceArgs) -> ToolResponse {
    normalize(
        price_text(ctx, args).await,
        Operation::GetRegistrationPrice.label(),
    )
}

/// Routes `operation` with JSON `args` to its handler.
///
/// Unknown operations and undecodable arguments produce an invalid-input
/// envelope without any upstream call.
pub async fn dispatch(ctx: &ServiceContext, operation: &str, args: Value) -> ToolResponse {
    let Some(operation) = Operation::from_name(operation) else {
        let error = ValidationError::UnknownOperation {
            name: operation.to_owned(),
        };
        return normalize(Err(error.into()), DISPATCH_LABEL);
    };

    debug!(operation = operation.name(), "dispatching");
    normalize(run(ctx, operation, args).await, operation.label())
}

/// Parses raw JSON argument text for `operation`.
///
/// Malformed text yields the same invalid-input envelope `dispatch` returns
/// for undecodable arguments.
pub fn parse_arguments(operation: &str, raw: &str) -> Result<Value, ToolResponse> {
    serde_json::from_str(raw).map_err(|error| {
        let error = ValidationError::InvalidArguments {
            operation: operation.to_owned(),
            reason: error.to_string(),
        };
        normalize(Err(error.into()), DISPATCH_LABEL)
    })
}

async fn run(
    ctx: &ServiceContext,
    operation: Operation,
    args: Value,
) -> Result<String, ResolveError> {
    match operation {
        Operation::ResolveName => resolve_name_text(ctx, &decode(operation, args)?).await,
        Operation::ReverseLookup => reverse_lookup_text(ctx, &decode(operation, args)?).await,
        Operation::GetTextRecord => text_record_text(ctx, &decode(operation, args)?).await,
        Operation::CheckAvailability => availability_text(ctx, &decode(operation, args)?).await,
        Operation::GetAllRecords => all_records_text(ctx, &decode(operation, args)?).await,
        Operation::GetSubdomains => subdomains_text(ctx, &decode(operation, args)?).await,
        Operation::GetNameHistory => history_text(ctx, &decode(operation, args)?).await,
        Operation::GetRegistrationPrice => price_text(ctx, &decode(operation, args)?).await,
    }
}

fn decode<T: DeserializeOwned>(operation: Operation, args: Value) -> Result<T, ValidationError> {
    serde_json::from_value(args).map_err(|error| ValidationError::InvalidArguments {
        operation: operation.name().to_owned(),
        reason: error.to_string(),
    })
}

async fn resolve_name_text(ctx: &ServiceContext, args: &NameArgs) -> Result<String, ResolveError> {
    let name = EnsName::parse(&args.name)?;
    let record = ctx.public().address_record(name.as_str()).await?;

    Ok(match record {
        Some(record) => format!("The address for {name} is {}", record.value),
        None => format!("Could not resolve {name} to an address."),
    })
}

async fn reverse_lookup_text(
    ctx: &ServiceContext,
    args: &AddressArgs,
) -> Result<String, ResolveError> {
    let address = Address::parse(&args.address)?;
    let primary = ctx.public().primary_name(address.as_str()).await?;

    Ok(match primary {
        Some(primary) if primary.forward_match == Some(false) => format!(
            "The primary ENS name for {address} is {} (it does not resolve back to this address)",
            primary.name
        ),
        Some(primary) => format!("The primary ENS name for {address} is {}", primary.name),
        None => format!("No primary ENS name found for {address}."),
    })
}

async fn text_record_text(
    ctx: &ServiceContext,
    args: &TextRecordArgs,
) -> Result<String, ResolveError> {
    let name = EnsName::parse(&args.name)?;
    let key = args.key.trim();
    if key.is_empty() {
        return Err(ValidationError::EmptyTextKey.into());
    }

    let value = ctx.public().text_record(name.as_str(), key).await?;
    Ok(match value {
        Some(value) => format!("The {key} record for {name} is: {value}"),
        None => format!("No {key} record found for {name}."),
    })
}

async fn availability_text(ctx: &ServiceContext, args: &NameArgs) -> Result<String, ResolveError> {
    let name = EnsName::parse(&args.name)?;
    let client = ctx.public();
    if client.is_available(name.as_str()).await? {
        return Ok(format!("{name} is available for registration."));
    }

    // Owner and expiry enrich the answer; their failures do not fail it.
    let (owner, expiry) = tokio::join!(client.owner(name.as_str()), client.expiry(name.as_str()));
    let owner = owner.unwrap_or_else(|error| {
        warn!(%name, error = %error, "owner lookup failed");
        None
    });
    let expiry = expiry.unwrap_or_else(|error| {
        warn!(%name, error = %error, "expiry lookup failed");
        None
    });

    let mut text = format!("{name} is not available.");
    push_owner_lines(&mut text, owner.as_ref());
    push_expiry_line_or_warn(&mut text, &name, expiry.as_ref());
    Ok(text)
}

async fn all_records_text(ctx: &ServiceContext, args: &NameArgs) -> Result<String, ResolveError> {
    let name = EnsName::parse(&args.name)?;

    let (records, owner, expiry) = ctx
        .enriched()
        .call(|client| {
            let name = name.clone();
            async move {
                let records = client.records(name.as_str()).await?;
                let owner = client.owner(name.as_str()).await?;
                let expiry = client.expiry(name.as_str()).await?;
                Ok::<_, ResolveError>((records, owner, expiry))
            }
        })
        .await?;

    if records.is_empty() {
        return Ok(format!("No records found for {name}."));
    }

    let mut text = format!("Records for {name}:");
    push_record_lines(&mut text, &records);
    push_owner_lines(&mut text, owner.as_ref());
    push_expiry_line_or_warn(&mut text, &name, expiry.as_ref());
    Ok(text)
}

async fn subdomains_text(ctx: &ServiceContext, args: &NameArgs) -> Result<String, ResolveError> {
    let name = EnsName::parse(&args.name)?;
    let subnames = ctx.public().subnames(name.as_str()).await?;
    if subnames.is_empty() {
        return Ok(format!("No subdomains found for {name}."));
    }

    let mut text = format!("Subdomains of {name}:");
    for subname in &subnames {
        match &subname.owner {
            Some(owner) => {
                let _ = write!(text, "\n- {} (owner: {owner})", subname.name);
            }
            None => {
                let _ = write!(text, "\n- {}", subname.name);
            }
        }
    }
    Ok(text)
}

async fn history_text(ctx: &ServiceContext, args: &NameArgs) -> Result<String, ResolveError> {
    let name = EnsName::parse(&args.name)?;
    let events = ctx.public().name_history(name.as_str()).await?;
    if events.is_empty() {
        return Ok(format!("No history found for {name}."));
    }

    let mut text = format!("History for {name}:");
    for event in &events {
        let _ = write!(
            text,
            "\n- {} at block {} (tx {})",
            event.kind, event.block_number, event.transaction_hash
        );
        if let Some(detail) = &event.detail {
            let _ = write!(text, ": {detail}");
        }
    }
    Ok(text)
}

async fn price_text(ctx: &ServiceContext, args: &PriceArgs) -> Result<String, ResolveError> {
    let name = EnsName::parse(&args.name)?;
    let duration = RegistrationDuration::from_years(args.duration)?;

    let price = ctx
        .public()
        .rent_price(name.as_str(), duration.as_seconds())
        .await?;
    let base = upstream_wei(&price.base)?;
    let premium = upstream_wei(&price.premium)?;
    let total = base.checked_add(premium).map_err(malformed_price)?;

    let years = duration.years();
    let unit = if years == 1 { "year" } else { "years" };
    Ok(format!(
        "Registration price for {name} ({years} {unit}): base {base} ETH, premium {premium} ETH, total {total} ETH"
    ))
}

fn upstream_wei(value: &str) -> Result<Wei, ResolveError> {
    Wei::parse(value).map_err(malformed_price)
}

fn malformed_price(error: ValidationError) -> ResolveError {
    ResolveError::protocol(format!("ENS returned a malformed price: {error}"))
}

fn push_record_lines(text: &mut String, records: &NameRecords) {
    if let Some(resolver) = &records.resolver_address {
        let _ = write!(text, "\nResolver: {resolver}");
    }
    if !records.coins.is_empty() {
        text.push_str("\nAddresses:");
        for coin in &records.coins {
            let _ = write!(text, "\n  {} ({}): {}", coin.name, coin.id, coin.value);
        }
    }
    if !records.texts.is_empty() {
        text.push_str("\nText records:");
        for record in &records.texts {
            let _ = write!(text, "\n  {}: {}", record.key, record.value);
        }
    }
    if let Some(content_hash) = &records.content_hash {
        let _ = write!(
            text,
            "\nContent hash: {} ({})",
            content_hash.decoded, content_hash.protocol_type
        );
    }
}

fn push_owner_lines(text: &mut String, ownership: Option<&Ownership>) {
    let Some(ownership) = ownership else {
        return;
    };
    if let Some(owner) = &ownership.owner {
        let _ = write!(text, "\nOwner: {owner}");
    }
    if let Some(registrant) = &ownership.registrant {
        let _ = write!(text, "\nRegistrant: {registrant}");
    }
}

/// Expiry is an enrichment line: an unreadable timestamp drops the line only.
fn push_expiry_line_or_warn(text: &mut String, name: &EnsName, expiry: Option<&Expiry>) {
    if let Err(error) = push_expiry_line(text, expiry) {
        warn!(%name, error = %error, "skipping malformed expiry");
    }
}

fn push_expiry_line(text: &mut String, expiry: Option<&Expiry>) -> Result<(), ResolveError> {
    let Some(expiry) = expiry else {
        return Ok(());
    };

    let expires_at = UtcDateTime::from_unix_seconds(expiry.expires_at)
        .map_err(|error| {
            ResolveError::protocol(format!("ENS returned a malformed expiry: {error}"))
        })?;
    let _ = write!(text, "\nExpires: {expires_at} ({})", expiry.status.as_str());
    if expiry.grace_period > 0 {
        let grace_end = expires_at.saturating_add(Duration::from_secs(expiry.grace_period));
        let _ = write!(text, "\nGrace period ends: {grace_end}");
    }
    Ok(())
}
