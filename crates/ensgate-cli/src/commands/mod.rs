use std::time::Duration;

use ensgate_core::{
    dispatch, operations, parse_arguments, AddressArgs, Config, NameArgs, PriceArgs, ProviderUrls,
    ServiceContext, TextRecordArgs, ToolResponse,
};
use tracing::debug;

use crate::cli::{Cli, Command, Lookup};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<ToolResponse, CliError> {
    let config = config_from_cli(cli);
    debug!(command = cli.command.name(), "running command");

    match &cli.command {
        Command::Providers => {
            config.validate()?;
            Ok(providers_response(&config.provider_urls()))
        }
        Command::Lookup(lookup) => {
            let ctx = ServiceContext::from_config(&config)?;
            Ok(run_lookup(&ctx, lookup).await)
        }
    }
}

async fn run_lookup(ctx: &ServiceContext, lookup: &Lookup) -> ToolResponse {
    match lookup {
        Lookup::Resolve(arg) => operations::resolve_name(ctx, &name_args(&arg.name)).await,
        Lookup::Reverse(arg) => {
            let args = AddressArgs {
                address: arg.address.clone(),
            };
            operations::reverse_lookup(ctx, &args).await
        }
        Lookup::Text(arg) => {
            let args = TextRecordArgs {
                name: arg.name.clone(),
                key: arg.key.clone(),
            };
            operations::get_text_record(ctx, &args).await
        }
        Lookup::Available(arg) => operations::check_availability(ctx, &name_args(&arg.name)).await,
        Lookup::Records(arg) => operations::get_all_records(ctx, &name_args(&arg.name)).await,
        Lookup::Subdomains(arg) => operations::get_subdomains(ctx, &name_args(&arg.name)).await,
        Lookup::History(arg) => operations::get_name_history(ctx, &name_args(&arg.name)).await,
        Lookup::Price(arg) => {
            let args = PriceArgs {
                name: arg.name.clone(),
                duration: arg.years,
            };
            operations::get_registration_price(ctx, &args).await
        }
        Lookup::Call(arg) => match parse_arguments(&arg.operation, &arg.args) {
            Ok(args) => dispatch(ctx, &arg.operation, args).await,
            Err(response) => response,
        },
    }
}

/// Environment first, then explicit flags.
fn config_from_cli(cli: &Cli) -> Config {
    let mut config = Config::from_env()
        .with_timeout(Duration::from_millis(cli.timeout_ms))
        .with_max_retries(cli.retries)
        .with_retry_delay(Duration::from_millis(cli.retry_delay_ms));

    if let Some(url) = cli.provider_url.as_deref().filter(|url| !url.trim().is_empty()) {
        config = config.with_provider_override(url);
    }

    config
}

fn name_args(name: &str) -> NameArgs {
    NameArgs {
        name: name.to_owned(),
    }
}

fn providers_response(urls: &ProviderUrls) -> ToolResponse {
    let lines = urls
        .iter()
        .enumerate()
        .map(|(index, url)| {
            if index == 0 {
                format!("{}. {url} (preferred)", index + 1)
            } else {
                format!("{}. {url}", index + 1)
            }
        })
        .collect::<Vec<_>>();

    ToolResponse::text(format!("Providers in fallback order:\n{}", lines.join("\n")))
}
