//! CLI argument definitions for ensgate.
//!
//! # Commands
//!
//! | Command | Operation |
//! |---------|-----------|
//! | `resolve` | `resolve-name` |
//! | `reverse` | `reverse-lookup` |
//! | `text` | `get-text-record` |
//! | `available` | `check-availability` |
//! | `records` | `get-all-records` |
//! | `subdomains` | `get-subdomains` |
//! | `history` | `get-name-history` |
//! | `price` | `get-registration-price` |
//! | `providers` | list the resolved provider order |
//! | `call` | any operation by name with JSON arguments |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--provider-url` | env | One URL (preferred) or a comma-separated list |
//! | `--timeout-ms` | `10000` | Per-attempt request timeout |
//! | `--retries` | `3` | Retries per provider after the first attempt |
//! | `--retry-delay-ms` | `1000` | Delay between retries |
//! | `--pretty` | `false` | Pretty-print the JSON envelope |
//!
//! # Examples
//!
//! ```bash
//! ensgate resolve vitalik
//! ensgate text vitalik.eth url --pretty
//! ensgate --provider-url https://rpc.example.org price nick --years 2
//! ensgate call get-subdomains '{"name":"ens.eth"}'
//! ```

use clap::{Args, Parser, Subcommand};
use ensgate_core::config::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_MS};

/// Resilient ENS lookups over multiple Ethereum providers.
///
/// Every command prints one JSON envelope `{content, isError}` on stdout.
/// Exit code 0 means success, 3 an error envelope, 2 a usage error.
#[derive(Debug, Parser)]
#[command(name = "ensgate", author, version, about = "Resilient ENS lookups")]
pub struct Cli {
    /// Provider override. Falls back to ENSGATE_PROVIDER_URL, then PROVIDER_URL.
    #[arg(long, global = true)]
    pub provider_url: Option<String>,

    /// Per-attempt request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Retries per provider after the first attempt.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_RETRIES)]
    pub retries: u32,

    /// Delay between retries in milliseconds.
    #[arg(long, global = true, default_value_t = DEFAULT_RETRY_DELAY_MS)]
    pub retry_delay_ms: u64,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(flatten)]
    Lookup(Lookup),

    /// Show the provider order that would be used.
    Providers,
}

impl Command {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Lookup(lookup) => lookup.name(),
            Self::Providers => "providers",
        }
    }
}

/// Commands that run an operation against the providers.
#[derive(Debug, Subcommand)]
pub enum Lookup {
    /// Resolve a name to its address.
    Resolve(NameArg),

    /// Find the primary name of an address.
    Reverse(AddressArg),

    /// Read one text record of a name.
    Text(TextArgs),

    /// Check whether a name can be registered.
    Available(NameArg),

    /// List every record of a name.
    Records(NameArg),

    /// List indexed subnames.
    Subdomains(NameArg),

    /// List indexed events of a name.
    History(NameArg),

    /// Quote the registration price.
    Price(PriceArgs),

    /// Run an operation by name with JSON arguments.
    ///
    ///   ensgate call resolve-name '{"name":"vitalik"}'
    Call(CallArgs),
}

impl Lookup {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Resolve(_) => "resolve",
            Self::Reverse(_) => "reverse",
            Self::Text(_) => "text",
            Self::Available(_) => "available",
            Self::Records(_) => "records",
            Self::Subdomains(_) => "subdomains",
            Self::History(_) => "history",
            Self::Price(_) => "price",
            Self::Call(_) => "call",
        }
    }
}

#[derive(Debug, Args)]
pub struct NameArg {
    /// Name; `.eth` is appended when missing.
    pub name: String,
}

#[derive(Debug, Args)]
pub struct AddressArg {
    /// `0x`-prefixed account address.
    pub address: String,
}

#[derive(Debug, Args)]
pub struct TextArgs {
    pub name: String,

    /// Record key, e.g. `url`, `avatar`, `com.twitter`.
    pub key: String,
}

#[derive(Debug, Args)]
pub struct PriceArgs {
    pub name: String,

    /// Registration length in whole years.
    #[arg(long, default_value_t = 1)]
    pub years: u64,
}

#[derive(Debug, Args)]
pub struct CallArgs {
    /// Operation name, e.g. `resolve-name`.
    pub operation: String,

    /// JSON object with the operation's arguments.
    #[arg(default_value = "{}")]
    pub args: String,
}
