//! VM extension commands

use clap::{Args, Subcommand};
use sfmc_arm::{Outcome, UpdateVmExtension};
use sfmc_core::{ResourceKind, VmExtension};

use super::with_spinner;
use crate::args::{MutationFlags, TargetArgs, json_value};
use crate::context::Context;
use crate::error::{CliError, Result};

#[derive(Subcommand, Debug)]
pub enum VmExtensionCommand {
    /// Install an extension on a node type
    Add(AddArgs),

    /// Change an installed extension
    Set(SetArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(long)]
    pub node_type_name: Option<String>,

    /// Extension name
    #[arg(short, long)]
    pub name: String,

    #[arg(long)]
    pub publisher: String,

    /// Extension type, e.g. `CustomScriptExtension`
    #[arg(long = "type")]
    pub extension_type: String,

    #[arg(long)]
    pub type_handler_version: String,

    #[arg(long)]
    pub auto_upgrade_minor_version: bool,

    #[arg(long)]
    pub force_update_tag: Option<String>,

    /// Public settings as a JSON object
    #[arg(long)]
    pub settings: Option<String>,

    /// Protected settings as a JSON object
    #[arg(long)]
    pub protected_settings: Option<String>,

    /// Extensions that must provision first (repeatable)
    #[arg(long = "provision-after")]
    pub provision_after_extensions: Vec<String>,

    /// When to run relative to the Service Fabric runtime, e.g. BeforeSFRuntime (repeatable)
    #[arg(long = "setup-order")]
    pub setup_order: Vec<String>,

    #[command(flatten)]
    pub flags: MutationFlags,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(long)]
    pub node_type_name: Option<String>,

    #[arg(short, long)]
    pub name: String,

    #[arg(long)]
    pub type_handler_version: Option<String>,

    #[arg(long)]
    pub auto_upgrade_minor_version: Option<bool>,

    #[arg(long)]
    pub force_update_tag: Option<String>,

    #[arg(long)]
    pub settings: Option<String>,

    #[arg(long)]
    pub protected_settings: Option<String>,

    #[arg(long = "provision-after")]
    pub provision_after_extensions: Vec<String>,

    #[arg(long = "setup-order")]
    pub setup_order: Vec<String>,

    #[command(flatten)]
    pub flags: MutationFlags,
}

pub async fn run(ctx: &mut Context, command: VmExtensionCommand) -> Result<()> {
    match command {
        VmExtensionCommand::Add(args) => add(ctx, args).await,
        VmExtensionCommand::Set(args) => set(ctx, args).await,
    }
}

fn extension(args: &AddArgs) -> Result<VmExtension> {
    Ok(VmExtension {
        name: args.name.clone(),
        publisher: args.publisher.clone(),
        extension_type: args.extension_type.clone(),
        type_handler_version: args.type_handler_version.clone(),
        auto_upgrade_minor_version: Some(args.auto_upgrade_minor_version),
        force_update_tag: args.force_update_tag.clone(),
        settings: json_value("settings", args.settings.as_deref())?,
        protected_settings: json_value("protected-settings", args.protected_settings.as_deref())?,
        provision_after_extensions: args.provision_after_extensions.clone(),
        setup_order: args.setup_order.clone(),
        ..Default::default()
    })
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() { None } else { Some(values.to_vec()) }
}

fn extension_update(args: &SetArgs) -> Result<UpdateVmExtension> {
    let update = UpdateVmExtension {
        name: args.name.clone(),
        type_handler_version: args.type_handler_version.clone(),
        auto_upgrade_minor_version: args.auto_upgrade_minor_version,
        force_update_tag: args.force_update_tag.clone(),
        settings: json_value("settings", args.settings.as_deref())?,
        protected_settings: json_value("protected-settings", args.protected_settings.as_deref())?,
        provision_after_extensions: non_empty(&args.provision_after_extensions),
        setup_order: non_empty(&args.setup_order),
    };

    if update.is_empty() {
        return Err(CliError::input(format!(
            "Nothing to change on extension {}",
            args.name
        )));
    }
    Ok(update)
}

async fn add(ctx: &mut Context, args: AddArgs) -> Result<()> {
    ctx.apply_flags(args.flags);
    let extension = extension(&args)?;

    let targets = args
        .target
        .identities(ResourceKind::NodeType, None, args.node_type_name.as_deref())?;
    for identity_args in targets {
        let identity = ctx.resolve(ResourceKind::NodeType, &identity_args)?;
        if !ctx.should_process(&identity, "Add VM extension") {
            continue;
        }

        let outcome: Outcome<_> = with_spinner(
            format!("Adding extension {} to {}", extension.name, identity.name),
            ctx.client.add_vm_extension(&identity, extension.clone()),
        )
        .await
        .into();
        ctx.report(outcome, args.flags.pass_thru)?;
    }
    Ok(())
}

async fn set(ctx: &mut Context, args: SetArgs) -> Result<()> {
    ctx.apply_flags(args.flags);
    let update = extension_update(&args)?;

    let targets = args
        .target
        .identities(ResourceKind::NodeType, None, args.node_type_name.as_deref())?;
    for identity_args in targets {
        let identity = ctx.resolve(ResourceKind::NodeType, &identity_args)?;
        if !ctx.should_process(&identity, "Update VM extension") {
            continue;
        }

        let outcome: Outcome<_> = with_spinner(
            format!("Updating extension {} on {}", update.name, identity.name),
            ctx.client.update_vm_extension(&identity, &update),
        )
        .await
        .into();
        ctx.report(outcome, args.flags.pass_thru)?;
    }
    Ok(())
}
