//! Command-line client for the authenticated user's profile.
//!
//! Reads a TOML config (see `config::schema`), authenticates with a bearer
//! token, and drives a `ProfileStore` over the HTTP transport.

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use profile_client::config::{load_config, ClientConfig};
use profile_client::observability::init_logging;
use profile_client::{ApiClient, Fields, FilePart, GroupMapper, ProfileStore, RefreshOutcome, StaticAuth};

/// The CLI keeps the profile untyped.
type RawProfile = Map<String, Value>;

#[derive(Parser)]
#[command(name = "profile-cli")]
#[command(about = "Inspect and update the authenticated user's profile", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "profile-client.toml")]
    config: PathBuf,

    /// API token; overrides `api.bearer_token`
    #[arg(short, long, env = "PROFILE_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the profile
    Show,
    /// Change profile fields, optionally uploading a file
    Update {
        /// `key=value`; the value is parsed as JSON when possible
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, Value)>,

        /// File sent under the `file` field
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Change the account password
    Password {
        #[arg(long)]
        current: String,

        #[arg(long)]
        new: String,
    },
}

#[derive(Serialize)]
struct PasswordChange {
    current_password: String,
    password: String,
    password_confirmation: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config_found = cli.config.exists();
    let mut config = if config_found {
        load_config(&cli.config)?
    } else {
        ClientConfig::default()
    };
    if let Some(token) = cli.token {
        config.api.bearer_token = Some(token);
    }

    init_logging(&config.observability)?;

    if !config_found {
        tracing::warn!(path = %cli.config.display(), "Config file not found, using defaults");
    }
    tracing::info!(
        base_url = %config.api.base_url,
        endpoint = %config.profile.endpoint,
        relations = config.profile.relations.len(),
        "Configuration loaded"
    );

    let api = ApiClient::from_config(&config.api)?;
    let auth = StaticAuth::new(config.api.bearer_token.is_some());
    let mapper = GroupMapper::<RawProfile>::with_groups(config.profile.groups.clone());
    let store = ProfileStore::new(api, Arc::new(auth), Arc::new(mapper), config.profile.clone());

    match cli.command {
        Commands::Show => {
            let profile = require_profile(&store).await?;
            print_profile(&profile)?;
        }
        Commands::Update { set, file } => {
            let current = require_profile(&store).await?;
            let mut user = current.as_ref().clone();
            user.extend(set);

            let mut attachments = Fields::new();
            if let Some(path) = file {
                attachments.insert("file", FilePart::from_path(&path).await?);
            }

            let saved = store.update_with_attachments(user, attachments).await?;
            print_profile(&saved)?;
        }
        Commands::Password { current, new } => {
            let change = PasswordChange {
                current_password: current,
                password: new.clone(),
                password_confirmation: new,
            };
            store.update_password(&change).await?;
            println!("Password updated");
        }
    }

    Ok(())
}

async fn require_profile(store: &ProfileStore<RawProfile>) -> Result<Arc<RawProfile>, Box<dyn Error>> {
    match store.refresh().await? {
        RefreshOutcome::Loaded(profile) => Ok(profile),
        RefreshOutcome::Skipped => Err("Not authenticated: pass --token or set PROFILE_API_TOKEN".into()),
    }
}

fn print_profile(profile: &RawProfile) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(profile)?);
    Ok(())
}

fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    if key.is_empty() {
        return Err("field name must not be empty".to_string());
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
