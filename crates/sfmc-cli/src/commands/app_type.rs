//! Application type commands

use clap::{Args, Subcommand};
use sfmc_arm::{Outcome, TagMutation};
use sfmc_core::ResourceKind;

use super::with_spinner;
use crate::args::{MutationFlags, TargetArgs, key_values};
use crate::context::Context;
use crate::error::{CliError, Result};

#[derive(Subcommand, Debug)]
pub enum AppTypeCommand {
    /// Create an application type
    New(NewArgs),

    /// Show an application type, or list those of a cluster
    Get(GetArgs),

    /// Change the tags of an application type
    Set(SetArgs),
}

#[derive(Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Application type name
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[command(flatten)]
    pub flags: MutationFlags,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Application type name; omit to list all
    #[arg(short, long)]
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(short, long)]
    pub name: Option<String>,

    /// Tag as key=value (repeatable); merged into the current tags
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Replace the current tags instead of merging
    #[arg(long, conflicts_with = "clear")]
    pub replace: bool,

    /// Remove every tag
    #[arg(long, conflicts_with = "tags")]
    pub clear: bool,

    #[command(flatten)]
    pub flags: MutationFlags,
}

pub async fn run(ctx: &mut Context, command: AppTypeCommand) -> Result<()> {
    match command {
        AppTypeCommand::New(args) => new(ctx, args).await,
        AppTypeCommand::Get(args) => get(ctx, args).await,
        AppTypeCommand::Set(args) => set(ctx, args).await,
    }
}

fn tag_mutation(args: &SetArgs) -> Result<TagMutation> {
    if args.clear {
        return Ok(TagMutation::Clear);
    }
    if args.tags.is_empty() {
        return Err(CliError::input_with_help(
            "No tags given",
            "Pass --tag key=value, or --clear to remove every tag",
        ));
    }

    let tags = key_values(&args.tags)?;
    Ok(if args.replace {
        TagMutation::Replace(tags)
    } else {
        TagMutation::Merge(tags)
    })
}

async fn new(ctx: &mut Context, args: NewArgs) -> Result<()> {
    ctx.apply_flags(args.flags);
    let tags = key_values(&args.tags)?;

    let targets = args
        .target
        .identities(ResourceKind::ApplicationType, None, args.name.as_deref())?;
    for identity_args in targets {
        let identity = ctx.resolve(ResourceKind::ApplicationType, &identity_args)?;
        if !ctx.should_process(&identity, "Create application type") {
            continue;
        }

        let outcome: Outcome<_> = with_spinner(
            format!("Creating application type {}", identity.name),
            ctx.client.new_application_type(&identity, &tags),
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
            let outcome: Outcome<_> = ctx.client.list_application_types(&cluster).await.into();
            ctx.report_list(outcome)?;
        }
        return Ok(());
    }

    let targets = args
        .target
        .identities(ResourceKind::ApplicationType, None, args.name.as_deref())?;
    for identity_args in targets {
        let identity = ctx.resolve(ResourceKind::ApplicationType, &identity_args)?;
        let outcome: Outcome<_> = ctx.client.get_application_type(&identity).await.into();
        ctx.report(outcome, false)?;
    }
    Ok(())
}

async fn set(ctx: &mut Context, args: SetArgs) -> Result<()> {
    ctx.apply_flags(args.flags);
    let mutation = tag_mutation(&args)?;

    let targets = args
        .target
        .identities(ResourceKind::ApplicationType, None, args.name.as_deref())?;
    for identity_args in targets {
        let identity = ctx.resolve(ResourceKind::ApplicationType, &identity_args)?;
        if !ctx.should_process(&identity, "Update application type") {
            continue;
        }

        let outcome: Outcome<_> = ctx
            .client
            .update_application_type(&identity, &mutation)
            .await
            .into();
        ctx.report(outcome, args.flags.pass_thru)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_args(tags: &[&str], replace: bool, clear: bool) -> SetArgs {
        SetArgs {
            target: TargetArgs::default(),
            name: Some("VotingType".into()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            replace,
            clear,
            flags: MutationFlags::default(),
        }
    }

    #[test]
    fn test_tags_merge_by_default() {
        let mutation = tag_mutation(&set_args(&["env=prod"], false, false)).unwrap();
        assert!(matches!(mutation, TagMutation::Merge(tags) if tags["env"] == "prod"));

        let mutation = tag_mutation(&set_args(&["env=prod"], true, false)).unwrap();
        assert!(matches!(mutation, TagMutation::Replace(_)));
    }

    #[test]
    fn test_no_tags_is_rejected() {
        assert!(tag_mutation(&set_args(&[], false, false)).is_err());
        assert_eq!(
            tag_mutation(&set_args(&[], false, true)).unwrap(),
            TagMutation::Clear
        );
    }
}
