//! Node type commands

use clap::{Args, Subcommand};
use sfmc_arm::{NewNodeTypeOptions, Outcome};
use sfmc_core::{DiskType, EndpointRange, ResourceKind};

use super::with_spinner;
use crate::args::{MutationFlags, TargetArgs, key_values};
use crate::context::Context;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum NodeTypeCommand {
    /// Create a node type in a cluster
    New(NewArgs),

    /// Show a node type, or list the node types of a cluster
    Get(GetArgs),
}

#[derive(Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Node type name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Number of VMs
    #[arg(long)]
    pub instance_count: i32,

    /// Host the system services on this node type
    #[arg(long)]
    pub primary: bool,

    #[arg(long)]
    pub disk_size_gb: Option<i32>,

    #[arg(long)]
    pub disk_type: Option<DiskType>,

    #[arg(long)]
    pub vm_size: Option<String>,

    #[arg(long)]
    pub vm_image_publisher: Option<String>,

    #[arg(long)]
    pub vm_image_offer: Option<String>,

    #[arg(long)]
    pub vm_image_sku: Option<String>,

    #[arg(long)]
    pub vm_image_version: Option<String>,

    /// Application port range as start-end
    #[arg(long)]
    pub application_ports: Option<EndpointRange>,

    /// Ephemeral port range as start-end
    #[arg(long)]
    pub ephemeral_ports: Option<EndpointRange>,

    /// Capacity as key=value (repeatable)
    #[arg(long = "capacity")]
    pub capacities: Vec<String>,

    /// Placement property as key=value (repeatable)
    #[arg(long = "placement-property")]
    pub placement_properties: Vec<String>,

    /// Resource id of a user assigned identity (repeatable)
    #[arg(long = "user-assigned-identity")]
    pub user_assigned_identities: Vec<String>,

    /// Only run stateless workloads
    #[arg(long)]
    pub stateless: bool,

    #[arg(long)]
    pub multiple_placement_groups: bool,

    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[command(flatten)]
    pub flags: MutationFlags,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Node type name; omit to list all
    #[arg(short, long)]
    pub name: Option<String>,
}

pub async fn run(ctx: &mut Context, command: NodeTypeCommand) -> Result<()> {
    match command {
        NodeTypeCommand::New(args) => new(ctx, args).await,
        NodeTypeCommand::Get(args) => get(ctx, args).await,
    }
}

fn node_type_options(args: &NewArgs) -> Result<NewNodeTypeOptions> {
    let mut options = NewNodeTypeOptions::new(args.instance_count);
    if args.primary {
        options = options.primary();
    }
    options.disk_size_gb = args.disk_size_gb;
    options.disk_type = args.disk_type;
    options.vm_size = args.vm_size.clone();
    options.vm_image_publisher = args.vm_image_publisher.clone();
    options.vm_image_offer = args.vm_image_offer.clone();
    options.vm_image_sku = args.vm_image_sku.clone();
    options.vm_image_version = args.vm_image_version.clone();
    options.application_ports = args.application_ports;
    options.ephemeral_ports = args.ephemeral_ports;
    options.capacities = key_values(&args.capacities)?;
    options.placement_properties = key_values(&args.placement_properties)?;
    options.user_assigned_identities = args.user_assigned_identities.clone();
    options.is_stateless = args.stateless;
    options.multiple_placement_groups = args.multiple_placement_groups;
    options.tags = key_values(&args.tags)?;

    options.validate()?;
    Ok(options)
}

async fn new(ctx: &mut Context, args: NewArgs) -> Result<()> {
    ctx.apply_flags(args.flags);
    let options = node_type_options(&args)?;

    let targets = args
        .target
        .identities(ResourceKind::NodeType, None, args.name.as_deref())?;
    for identity_args in targets {
        let identity = ctx.resolve(ResourceKind::NodeType, &identity_args)?;
        if !ctx.should_process(&identity, "Create node type") {
            continue;
        }

        let outcome: Outcome<_> = with_spinner(
            format!("Creating node type {}", identity.name),
            ctx.client.new_node_type(&identity, &options),
        )
        .await
        .into();
        ctx.report(outcome, args.flags.pass_thru)?;
    }
    Ok(())
}

async fn get(ctx: &mut Context, args: GetArgs) -> Result<()> {
    if args.target.by_name() && args.name.is_none() {
        let cluster_args = args.target.identities(ResourceKind::ManagedCluster, None, None)?;
        for identity_args in cluster_args {
            let cluster = ctx.resolve(ResourceKind::ManagedCluster, &identity_args)?;
            let outcome: Outcome<_> = ctx.client.list_node_types(&cluster).await.into();
            ctx.report_list(outcome)?;
        }
        return Ok(());
    }

    let targets = args
        .target
        .identities(ResourceKind::NodeType, None, args.name.as_deref())?;
    for identity_args in targets {
        let identity = ctx.resolve(ResourceKind::NodeType, &identity_args)?;
        let outcome: Outcome<_> = ctx.client.get_node_type(&identity).await.into();
        ctx.report(outcome, false)?;
    }
    Ok(())
}
