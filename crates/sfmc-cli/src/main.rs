//! sfmc - manage Service Fabric managed cluster resources

use clap::{Parser, Subcommand};
use sfmc_arm::FileProvider;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod args;
mod commands;
mod config;
mod confirm;
mod context;
mod display;
mod error;
mod exit_codes;

use commands::{
    app::AppCommand, app_type::AppTypeCommand, app_type_version::AppTypeVersionCommand,
    client_cert::ClientCertCommand, cluster::ClusterCommand, node_type::NodeTypeCommand,
    nsg_rule::NsgRuleCommand, service::ServiceCommand, vm_extension::VmExtensionCommand,
};
use config::Config;
use context::Context;
use display::OutputFormat;
use error::Result;

#[derive(Parser)]
#[command(name = "sfmc")]
#[command(version)]
#[command(about = "Manage Service Fabric managed clusters and their child resources", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file, defaults to ~/.config/sfmc/config.yaml
    #[arg(long, global = true, env = "SFMC_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding resource state
    #[arg(long, global = true, env = "SFMC_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Subscription for by-name targets
    #[arg(long, global = true, env = "SFMC_SUBSCRIPTION")]
    subscription: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,

    /// Log progress
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Managed clusters
    #[command(subcommand)]
    Cluster(ClusterCommand),

    /// Client certificates of a cluster
    #[command(subcommand)]
    ClientCert(ClientCertCommand),

    /// Network security rules of a cluster
    #[command(subcommand)]
    NsgRule(NsgRuleCommand),

    /// Node types
    #[command(subcommand)]
    NodeType(NodeTypeCommand),

    /// VM extensions of a node type
    #[command(subcommand)]
    VmExtension(VmExtensionCommand),

    /// Application types
    #[command(subcommand)]
    AppType(AppTypeCommand),

    /// Application type versions
    #[command(subcommand)]
    AppTypeVersion(AppTypeVersionCommand),

    /// Applications
    #[command(subcommand)]
    App(AppCommand),

    /// Services
    #[command(subcommand)]
    Service(ServiceCommand),
}

fn init_tracing(verbose: bool, debug: bool) {
    let default_level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(debug))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let config = Config::load(cli.config.as_deref())?;

    let state_dir = cli.state_dir.unwrap_or_else(|| config.state_dir());
    let subscription = cli
        .subscription
        .unwrap_or_else(|| config.subscription().to_string());
    tracing::debug!(
        "state directory {}, subscription {}",
        state_dir.display(),
        subscription
    );

    let provider = FileProvider::new(&state_dir)?.with_page_size(config.page_size());
    let mut ctx = Context::new(
        provider,
        &subscription,
        cli.output,
        config.default_location.clone(),
    );

    match cli.command {
        Commands::Cluster(command) => commands::cluster::run(&mut ctx, command).await?,
        Commands::ClientCert(command) => commands::client_cert::run(&mut ctx, command).await?,
        Commands::NsgRule(command) => commands::nsg_rule::run(&mut ctx, command).await?,
        Commands::NodeType(command) => commands::node_type::run(&mut ctx, command).await?,
        Commands::VmExtension(command) => commands::vm_extension::run(&mut ctx, command).await?,
        Commands::AppType(command) => commands::app_type::run(&mut ctx, command).await?,
        Commands::AppTypeVersion(command) => {
            commands::app_type_version::run(&mut ctx, command).await?
        }
        Commands::App(command) => commands::app::run(&mut ctx, command).await?,
        Commands::Service(command) => commands::service::run(&mut ctx, command).await?,
    }

    Ok(ctx.exit_code())
}

#[tokio::main]
async fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.debug);

    let code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    std::process::exit(code);
}
