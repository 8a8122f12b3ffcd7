//! Application commands

use clap::{Args, Subcommand};
use sfmc_arm::{ApplicationOptions, Outcome};
use sfmc_core::ResourceKind;

use super::with_spinner;
use crate::args::{MutationFlags, TargetArgs, key_values};
use crate::context::Context;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum AppCommand {
    /// Create an application
    New(NewArgs),

    /// Show an application, or list those of a cluster
    Get(GetArgs),
}

#[derive(Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Application name
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(long)]
    pub app_type_name: String,

    #[arg(long)]
    pub app_type_version: String,

    /// Provision the type version from this package first
    #[arg(long)]
    pub package_url: Option<String>,

    /// Application parameter as key=value (repeatable)
    #[arg(long = "parameter")]
    pub parameters: Vec<String>,

    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Recreate a type version left in Failed state without asking
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub flags: MutationFlags,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Application name; omit to list all
    #[arg(short, long)]
    pub name: Option<String>,
}

pub async fn run(ctx: &mut Context, command: AppCommand) -> Result<()> {
    match command {
        AppCommand::New(args) => new(ctx, args).await,
        AppCommand::Get(args) => get(ctx, args).await,
    }
}

fn application_options(args: &NewArgs) -> Result<ApplicationOptions> {
    let mut options = ApplicationOptions::new(&args.app_type_name, &args.app_type_version);
    if let Some(package_url) = &args.package_url {
        options = options.with_package_url(package_url);
    }
    options.parameters = key_values(&args.parameters)?;
    options.tags = key_values(&args.tags)?;
    options.force = args.force;

    options.validate()?;
    Ok(options)
}

async fn new(ctx: &mut Context, args: NewArgs) -> Result<()> {
    ctx.apply_flags(args.flags);
    let options = application_options(&args)?;

    let targets = args
        .target
        .identities(ResourceKind::Application, None, args.name.as_deref())?;
    for identity_args in targets {
        let identity = ctx.resolve(ResourceKind::Application, &identity_args)?;
        if !ctx.should_process(&identity, "Create application") {
            continue;
        }

        let outcome: Outcome<_> = with_spinner(
            format!("Creating application {}", identity.name),
            ctx.client.new_application(&identity, &options),
        )
        .await
        .into();
        ctx.report(outcome, args.flags.pass_thru)?;
    }
    Ok(())
}

async fn get(ctx: &mut Context, args: GetArgs) -> Result<()> {
    if args.target.by_name() && args.name.is_none() {
        for identity_args in args.target.identities(ResourceKind::ManagedCluster, None, None)? {
            let cluster = ctx.resolve(ResourceKind::ManagedCluster, &identity_args)?;
            let outcome: Outcome<_> = ctx.client.list_applications(&cluster).await.into();
            ctx.report_list(outcome)?;
        }
        return Ok(());
    }

    let targets = args
        .target
        .identities(ResourceKind::Application, None, args.name.as_deref())?;
    for identity_args in targets {
        let identity = ctx.resolve(ResourceKind::Application, &identity_args)?;
        let outcome: Outcome<_> = ctx.client.get_application(&identity).await.into();
        ctx.report(outcome, false)?;
    }
    Ok(())
}
