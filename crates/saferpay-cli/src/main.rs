use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use saferpay::{Config, Params, SaferpayClient, SaferpayError};

#[derive(Parser)]
#[command(name = "saferpay", about = "Talk to the Saferpay hosting gateway")]
struct Cli {
    /// Gateway base URL
    #[arg(long, env = "SAFERPAY_ENDPOINT", global = true)]
    endpoint: Option<Url>,

    /// Merchant account id
    #[arg(long, env = "SAFERPAY_ACCOUNT_ID", global = true)]
    account_id: Option<String>,

    #[arg(long, env = "SAFERPAY_USER_AGENT", global = true)]
    user_agent: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a payment and print the hosted payment page URL
    PaymentUrl {
        /// KEY=VALUE request parameters (AMOUNT, CURRENCY, DESCRIPTION, ...)
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Verify a confirmation callback (DATA=..., SIGNATURE=...)
    Verify {
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
        /// Parameters of the original request to check the callback against
        #[arg(long = "original", value_parser = parse_param)]
        original: Vec<(String, String)>,
    },
    /// Complete a verified payment (ID=...)
    Complete {
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(kind = ?e.kind(), code = ?e.code(), "{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), SaferpayError> {
    let mut config = Config::from_env()?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(account_id) = cli.account_id {
        config.account_id = account_id;
    }
    if let Some(user_agent) = cli.user_agent {
        config.user_agent = user_agent;
    }

    tracing::debug!(endpoint = %config.endpoint, account = %config.account_id, "using gateway");
    let client = SaferpayClient::with_config(config)?;

    match cli.command {
        Command::PaymentUrl { params } => {
            let params: Params = params.into_iter().collect();
            let url = client.get_payment_url(&params).await?;
            println!("{url}");
        }
        Command::Verify { params, original } => {
            let params: Params = params.into_iter().collect();
            let original: Option<Params> =
                (!original.is_empty()).then(|| original.into_iter().collect());
            let confirmation = client.handle_pay_confirm(&params, original.as_ref()).await?;
            print_json(&confirmation);
        }
        Command::Complete { params } => {
            let params: Params = params.into_iter().collect();
            let completion = client.complete_payment(&params).await?;
            print_json(&completion);
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("failed to serialize result: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("AMOUNT=1000"),
            Ok(("AMOUNT".to_string(), "1000".to_string()))
        );
        assert_eq!(
            parse_param("DATA=a=b"),
            Ok(("DATA".to_string(), "a=b".to_string()))
        );
        assert!(parse_param("AMOUNT").is_err());
    }

    #[test]
    fn test_cli_parses_verify() {
        let cli = Cli::try_parse_from([
            "saferpay",
            "verify",
            "DATA=<IDP/>",
            "SIGNATURE=abc",
            "--original",
            "AMOUNT=1000",
            "--original",
            "CURRENCY=EUR",
        ])
        .unwrap();
        match cli.command {
            Command::Verify { params, original } => {
                assert_eq!(params.len(), 2);
                assert_eq!(original.len(), 2);
            }
            _ => panic!("expected verify"),
        }
    }
}
