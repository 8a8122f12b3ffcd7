//! Application type version commands

use clap::{Args, Subcommand};
use sfmc_arm::{ApplicationTypeVersionOptions, Outcome};
use sfmc_core::ResourceKind;

use super::with_spinner;
use crate::args::{MutationFlags, TargetArgs, key_values};
use crate::context::Context;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum AppTypeVersionCommand {
    /// Provision an application type version from a package
    New(NewArgs),

    /// Show an application type version
    Get(GetArgs),
}

#[derive(Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(long)]
    pub app_type_name: Option<String>,

    /// Version to provision
    #[arg(short = 'n', long = "app-type-version")]
    pub type_version: Option<String>,

    /// Absolute URL of the application package
    #[arg(long)]
    pub package_url: String,

    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Recreate a version left in Failed state without asking
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub flags: MutationFlags,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(long)]
    pub app_type_name: Option<String>,

    #[arg(short = 'n', long = "app-type-version")]
    pub type_version: Option<String>,
}

pub async fn run(ctx: &mut Context, command: AppTypeVersionCommand) -> Result<()> {
    match command {
        AppTypeVersionCommand::New(args) => new(ctx, args).await,
        AppTypeVersionCommand::Get(args) => get(ctx, args).await,
    }
}

async fn new(ctx: &mut Context, args: NewArgs) -> Result<()> {
    ctx.apply_flags(args.flags);
    let mut options = ApplicationTypeVersionOptions::new(&args.package_url);
    options.tags = key_values(&args.tags)?;
    if args.force {
        options = options.with_force();
    }
    options.validate()?;

    let targets = args.target.identities(
        ResourceKind::ApplicationTypeVersion,
        args.app_type_name.as_deref(),
        args.type_version.as_deref(),
    )?;
    for identity_args in targets {
        let identity = ctx.resolve(ResourceKind::ApplicationTypeVersion, &identity_args)?;
        if !ctx.should_process(&identity, "Create application type version") {
            continue;
        }

        let outcome: Outcome<_> = with_spinner(
            format!("Provisioning version {}", identity.name),
            ctx.client.new_application_type_version(&identity, &options),
        )
        .await
        .into();
        ctx.report(outcome, args.flags.pass_thru)?;
    }
    Ok(())
}

async fn get(ctx: &mut Context, args: GetArgs) -> Result<()> {
    let targets = args.target.identities(
        ResourceKind::ApplicationTypeVersion,
        args.app_type_name.as_deref(),
        args.type_version.as_deref(),
    )?;
    for identity_args in targets {
        let identity = ctx.resolve(ResourceKind::ApplicationTypeVersion, &identity_args)?;
        let outcome: Outcome<_> = ctx
            .client
            .get_application_type_version(&identity)
            .await
            .into();
        ctx.report(outcome, false)?;
    }
    Ok(())
}
