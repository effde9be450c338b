//! Cyolo CLI
//!
//! Runs a single connector operation from the command line.

#![deny(missing_docs)]

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};

use cyolo_connector::{CyoloConnector, Operation};
use cyolo_core::{
    config::{ConnectorConfig, ConnectorNamespace},
    fetch_credentials,
    logging::{self, info, LevelFilter},
    project, Connector,
};
use serde_json::{Map, Value};

/// Cyolo CLI: manage users, groups and access policies
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Args {
    #[clap(subcommand)]
    command: CyoloCommand,
    #[clap(short, long)]
    log_level: Option<LevelFilter>,
    /// Connectors file to read credentials from (defaults to ~/.cyolo/connectors.yaml)
    #[clap(short, long)]
    credentials: Option<PathBuf>,
    /// Namespace of the connector within the credentials file
    #[clap(short, long, default_value = "cyolo")]
    namespace: String,
}

#[derive(Subcommand, Debug)]
enum CyoloCommand {
    /// Run an operation and print its JSON result.
    Run {
        /// Operation name, e.g. get_policy_list
        operation: String,
        /// Operation parameters as a JSON object
        #[clap(short, long, default_value = "{}")]
        params: String,
    },
    /// Check that the server accepts the configured credentials.
    Check,
    /// List the supported operations.
    Operations,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::setup(args.log_level);

    match &args.command {
        CyoloCommand::Operations => {
            for op in Operation::ALL {
                println!("{op}");
            }
        }
        CyoloCommand::Check => {
            let connector = connector(&args)?;
            connector
                .check_health()
                .await
                .context("running health check")?;
            info!("credentials are valid");
        }
        CyoloCommand::Run { operation, params } => {
            let params = parse_params(params)?;
            let connector = connector(&args)?;
            let result = connector
                .run_named(operation, &params)
                .await
                .with_context(|| format!("running {operation}"))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn connector(args: &Args) -> Result<Box<CyoloConnector>> {
    let path = args
        .credentials
        .to_owned()
        .unwrap_or_else(project::connector_cfg_path);
    let creds = fetch_credentials(path.to_owned()).map_err(|e| {
        anyhow!(
            "unable to read credentials from {}: {e}",
            path.display()
        )
    })?;
    let namespace = ConnectorNamespace(args.namespace.to_owned());
    let connector_creds = creds.get(&namespace.0).ok_or_else(|| {
        anyhow!(
            "unable to find a connector called {} in {}",
            namespace,
            path.display()
        )
    })?;
    CyoloConnector::new(
        &ConnectorConfig::new("cyolo".to_owned(), Default::default()),
        connector_creds,
    )
}

fn parse_params(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw).context("parsing --params as JSON")? {
        Value::Object(map) => Ok(map),
        other => bail!("--params must be a JSON object, got {other}"),
    }
}
