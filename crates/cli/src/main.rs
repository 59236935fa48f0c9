use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use lnurl_resolver::{
    LnurlError, LnurlResolver, ResolverConfig, decode_lnurl_bech32, encode_lnurl_to_bech32,
    find_lnurl_in_text,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about = "Resolve and encode LNURLs", long_about = None)]
struct Cli {
    #[command(flatten)]
    args: Args,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, clap::Args, Debug, Serialize, Deserialize)]
struct Args {
    /// Optional toml file with the same keys as the flags below.
    #[arg(long, default_value = "lnurl.conf")]
    pub config: PathBuf,

    /// Loglevel to use. Can be used to filter logs through the env filter
    /// format.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// User-Agent sent to lnurl endpoints.
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Timeout of the endpoint request, in seconds.
    #[arg(long, default_value_t = ResolverConfig::default().timeout_secs)]
    pub timeout_secs: u64,
}

impl From<&Args> for ResolverConfig {
    fn from(args: &Args) -> Self {
        ResolverConfig {
            user_agent: args.user_agent.clone(),
            timeout_secs: args.timeout_secs,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve an lnurl, lightning address or LUD-17 url
    Resolve {
        /// The input to resolve
        input: String,
    },
    /// Encode a url as a bech32 lnurl
    Encode { url: String },
    /// Decode a bech32 lnurl into its url
    Decode { lnurl: String },
    /// Find the first valid bech32 lnurl in a text
    Find { text: String },
}

fn load_args(args: Args) -> Result<Args, figment::Error> {
    let config_file = std::fs::canonicalize(&args.config).ok();
    let mut figment = Figment::new().merge(Serialized::defaults(args));
    if let Some(config_file) = &config_file {
        figment = figment.merge(Toml::file(config_file));
    }

    figment.merge(Env::prefixed("LNURL_")).extract()
}

async fn run(command: Command, args: &Args) -> Result<(), anyhow::Error> {
    match command {
        Command::Resolve { input } => {
            let resolver = LnurlResolver::from_config(&args.into());
            let resolved = resolver.resolve(&input).await?;
            debug!("Resolved {input} to {}", resolved.descriptor.tag());
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
        Command::Encode { url } => println!("{}", encode_lnurl_to_bech32(&url)?),
        Command::Decode { lnurl } => println!("{}", decode_lnurl_bech32(&lnurl)?),
        Command::Find { text } => match find_lnurl_in_text(&text) {
            Some(lnurl) => println!("{lnurl}"),
            None => return Err(LnurlError::InvalidLnurl(text).into()),
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode, anyhow::Error> {
    let cli = Cli::parse();
    let args = load_args(cli.args)?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(&args.log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!(
        "lnurl cli started with timeout {}s, user agent {:?}",
        args.timeout_secs, args.user_agent
    );

    match run(cli.command, &args).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            match e.downcast_ref::<LnurlError>() {
                Some(lnurl_error) => eprintln!("{} error: {lnurl_error}", lnurl_error.kind()),
                None => eprintln!("error: {e}"),
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
