///
/// This module implements the CLI interface for transcoder-preset: command
/// parsing, mapping arguments onto a preset descriptor, and the async entry
/// point shared by `main` and the integration tests.
///
/// All reconciliation logic lives in the [`transcoder-preset-core`] crate.
/// This module is strictly glue: arguments in, one reconcile call, outcome out.
///
/// ## How To Use
/// - Command line: `transcoder-preset apply --config task.yaml` or
///   `transcoder-preset preset --name sd_300 --container mp4 --preset-document sd_300.json`.
/// - Programmatic/integration use: call [`run`] with a constructed [`Cli`],
///   or [`run_with_client`] to supply your own client.
///
/// [`transcoder-preset-core`]: ../../transcoder-preset-core/
use crate::client::ElasticTranscoderClient;
use crate::load_config::load_config;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use transcoder_preset_core::contract::PresetClient;
use transcoder_preset_core::locator::NameMatchPolicy;
use transcoder_preset_core::{
    reconcile, Container, DesiredState, PresetDescriptor, ReconcileError, ReconcileOptions,
    ReconcileOutcome,
};

/// CLI for transcoder-preset: keep Elastic Transcoder presets present or absent by name.
#[derive(Parser)]
#[clap(
    name = "transcoder-preset",
    version,
    about = "Create, recreate or delete Elastic Transcoder presets by name"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile the preset described in a YAML task file
    Apply {
        /// Path to the YAML task file
        #[clap(long)]
        config: PathBuf,
        /// Report what would change without creating or deleting anything
        #[clap(long)]
        check: bool,
    },
    /// Reconcile a preset described by command line flags
    Preset(PresetArgs),
}

#[derive(Args)]
pub struct PresetArgs {
    /// Name of the preset
    #[clap(long)]
    pub name: String,
    /// Description passed through on create
    #[clap(long)]
    pub description: Option<String>,
    /// Container type for the output file
    #[clap(long, value_parser = parse_container)]
    pub container: Option<Container>,
    /// present or absent
    #[clap(long, default_value = "present", value_parser = parse_state)]
    pub state: DesiredState,
    /// Delete an existing preset first and create it again
    #[clap(long)]
    pub recreate: bool,
    /// JSON document with Video, Audio and/or Thumbnails sections
    #[clap(long)]
    pub preset_document: Option<PathBuf>,
    /// Report what would change without creating or deleting anything
    #[clap(long)]
    pub check: bool,
    /// Fail when more than one preset carries the name
    #[clap(long)]
    pub strict_names: bool,
    /// AWS region, defaults to AWS_REGION / AWS_DEFAULT_REGION
    #[clap(long)]
    pub region: Option<String>,
    /// Override the service endpoint URL
    #[clap(long)]
    pub endpoint: Option<String>,
}

fn parse_container(s: &str) -> Result<Container, ReconcileError> {
    s.parse()
}

fn parse_state(s: &str) -> Result<DesiredState, String> {
    s.parse()
}

/// Everything one run needs, independent of where it was declared.
#[derive(Debug)]
pub struct Invocation {
    pub descriptor: PresetDescriptor,
    pub options: ReconcileOptions,
    pub region: Option<String>,
    pub endpoint: Option<String>,
}

impl Commands {
    pub fn into_invocation(self) -> Result<Invocation> {
        match self {
            Commands::Apply { config, check } => {
                let task = load_config(&config)?;
                let options = ReconcileOptions {
                    check_mode: check,
                    name_policy: task.name_policy(),
                };
                Ok(Invocation {
                    descriptor: task.preset,
                    options,
                    region: task.connection.region,
                    endpoint: task.connection.endpoint,
                })
            }
            Commands::Preset(args) => {
                let name_policy = if args.strict_names {
                    NameMatchPolicy::RejectDuplicates
                } else {
                    NameMatchPolicy::FirstMatch
                };
                Ok(Invocation {
                    descriptor: PresetDescriptor {
                        name: args.name,
                        description: args.description,
                        container: args.container,
                        state: args.state,
                        recreate: args.recreate,
                        preset_document: args.preset_document,
                    },
                    options: ReconcileOptions {
                        check_mode: args.check,
                        name_policy,
                    },
                    region: args.region,
                    endpoint: args.endpoint,
                })
            }
        }
    }
}

/// Async CLI entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<ReconcileOutcome> {
    tracing::info!("run_started");

    let invocation = cli.command.into_invocation()?;
    invocation.descriptor.validate()?;

    let client = ElasticTranscoderClient::new_from_env(
        invocation.region.clone(),
        invocation.endpoint.clone(),
    )
    .map_err(|e| anyhow::anyhow!("Can't authorize connection - {e}"))?;

    run_with_client(&client, &invocation).await
}

/// Reconcile one invocation against the given client.
pub async fn run_with_client<C>(client: &C, invocation: &Invocation) -> Result<ReconcileOutcome>
where
    C: PresetClient + ?Sized,
{
    tracing::info!(
        preset_name = %invocation.descriptor.name,
        state = ?invocation.descriptor.state,
        check_mode = invocation.options.check_mode,
        "Reconciling preset"
    );
    let outcome = reconcile(client, &invocation.descriptor, invocation.options)
        .await
        .with_context(|| format!("Reconciling preset {}", invocation.descriptor.name))?;
    tracing::info!(
        preset_name = %outcome.name,
        changed = outcome.changed,
        msg = %outcome.msg,
        "Reconcile complete"
    );
    Ok(outcome)
}
