//! Cluster commands - create, show and update managed clusters

use clap::{Args, Subcommand};
use sfmc_arm::{NewClusterOptions, Outcome, UpdateCluster};
use sfmc_core::{ClientCertificate, ClusterSku, ResourceKind, UpgradeCadence, UpgradeMode};

use super::with_spinner;
use crate::args::{MutationFlags, TargetArgs, key_values};
use crate::context::Context;
use crate::error::{CliError, Result};

#[derive(Subcommand, Debug)]
pub enum ClusterCommand {
    /// Create a managed cluster
    New(NewArgs),

    /// Show a cluster, or list the clusters of a resource group
    Get(GetArgs),

    /// Update cluster fields
    Set(SetArgs),
}

#[derive(Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Azure region, defaults to `defaultLocation` from the config
    #[arg(short, long)]
    pub location: Option<String>,

    /// Password of the VM administrator
    #[arg(long, env = "SFMC_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: String,

    #[arg(long, default_value = "vmadmin")]
    pub admin_user_name: String,

    #[arg(long, default_value = "Basic")]
    pub sku: ClusterSku,

    /// DNS name, defaults to the cluster name
    #[arg(long)]
    pub dns_name: Option<String>,

    #[arg(long, default_value_t = 19080)]
    pub http_gateway_port: i32,

    #[arg(long, default_value_t = 19000)]
    pub client_port: i32,

    #[arg(long, default_value = "Automatic")]
    pub upgrade_mode: UpgradeMode,

    #[arg(long)]
    pub upgrade_cadence: Option<UpgradeCadence>,

    /// Cluster code version, manual upgrade mode only
    #[arg(long)]
    pub code_version: Option<String>,

    #[arg(long)]
    pub zonal_resiliency: bool,

    /// Thumbprint of an initial client certificate
    #[arg(long, conflicts_with = "client_cert_common_name")]
    pub client_cert_thumbprint: Option<String>,

    /// Common name of an initial client certificate
    #[arg(long)]
    pub client_cert_common_name: Option<String>,

    #[arg(long, requires = "client_cert_common_name")]
    pub client_cert_issuer_thumbprint: Vec<String>,

    /// Register the initial client certificate as admin
    #[arg(long)]
    pub client_cert_is_admin: bool,

    /// Tag as key=value (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[command(flatten)]
    pub flags: MutationFlags,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(long)]
    pub dns_name: Option<String>,

    #[arg(long)]
    pub client_port: Option<i32>,

    #[arg(long)]
    pub http_gateway_port: Option<i32>,

    #[arg(long)]
    pub upgrade_mode: Option<UpgradeMode>,

    #[arg(long)]
    pub code_version: Option<String>,

    /// Replace all tags with these key=value pairs (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[command(flatten)]
    pub flags: MutationFlags,
}

pub async fn run(ctx: &mut Context, command: ClusterCommand) -> Result<()> {
    match command {
        ClusterCommand::New(args) => new(ctx, args).await,
        ClusterCommand::Get(args) => get(ctx, args).await,
        ClusterCommand::Set(args) => set(ctx, args).await,
    }
}

fn cluster_options(ctx: &Context, args: &NewArgs) -> Result<NewClusterOptions> {
    let location = args
        .location
        .clone()
        .or_else(|| ctx.default_location.clone())
        .ok_or_else(|| {
            CliError::input_with_help(
                "No location given",
                "Pass --location or set defaultLocation in the config file",
            )
        })?;

    let mut options = NewClusterOptions::new(location, &args.admin_password).with_sku(args.sku);
    options.admin_user_name = args.admin_user_name.clone();
    options.dns_name = args.dns_name.clone();
    options.http_gateway_connection_port = args.http_gateway_port;
    options.client_connection_port = args.client_port;
    options.upgrade_mode = args.upgrade_mode;
    options.upgrade_cadence = args.upgrade_cadence;
    options.code_version = args.code_version.clone();
    options.zonal_resiliency = args.zonal_resiliency;
    options.tags = key_values(&args.tags)?;

    if let Some(thumbprint) = &args.client_cert_thumbprint {
        options = options.with_client_certificate(ClientCertificate::by_thumbprint(
            thumbprint,
            args.client_cert_is_admin,
        ));
    } else if let Some(common_name) = &args.client_cert_common_name {
        options = options.with_client_certificate(ClientCertificate::by_common_name(
            common_name,
            &args.client_cert_issuer_thumbprint,
            args.client_cert_is_admin,
        ));
    }

    options.validate()?;
    Ok(options)
}

async fn new(ctx: &mut Context, args: NewArgs) -> Result<()> {
    ctx.apply_flags(args.flags);
    let options = cluster_options(ctx, &args)?;

    for identity_args in args.target.identities(ResourceKind::ManagedCluster, None, None)? {
        let identity = ctx.resolve(ResourceKind::ManagedCluster, &identity_args)?;
        if !ctx.should_process(&identity, "Create managed cluster") {
            continue;
        }

        let outcome: Outcome<_> = with_spinner(
            format!("Creating cluster {}", identity.name),
            ctx.client.new_cluster(&identity, &options),
        )
        .await
        .into();
        ctx.report(outcome, args.flags.pass_thru)?;
    }
    Ok(())
}

async fn get(ctx: &mut Context, args: GetArgs) -> Result<()> {
    if args.target.by_name() && args.target.cluster_name.is_none() {
        let resource_group = args.target.resource_group.as_deref().ok_or_else(|| {
            CliError::input_with_help(
                "No cluster selected",
                "Pass -g to list a resource group, or -c, --resource-id or --input-object",
            )
        })?;
        let clusters = ctx.client.list_clusters(resource_group).await?;
        return ctx.report_list(Outcome::Ok(clusters));
    }

    for identity_args in args.target.identities(ResourceKind::ManagedCluster, None, None)? {
        let identity = ctx.resolve(ResourceKind::ManagedCluster, &identity_args)?;
        let outcome: Outcome<_> = ctx.client.get_cluster(&identity).await.into();
        ctx.report(outcome, false)?;
    }
    Ok(())
}

async fn set(ctx: &mut Context, args: SetArgs) -> Result<()> {
    ctx.apply_flags(args.flags);
    let update = UpdateCluster {
        dns_name: args.dns_name,
        client_connection_port: args.client_port,
        http_gateway_connection_port: args.http_gateway_port,
        upgrade_mode: args.upgrade_mode,
        code_version: args.code_version,
        tags: if args.tags.is_empty() {
            None
        } else {
            Some(key_values(&args.tags)?)
        },
    };

    for identity_args in args.target.identities(ResourceKind::ManagedCluster, None, None)? {
        let identity = ctx.resolve(ResourceKind::ManagedCluster, &identity_args)?;
        if !ctx.should_process(&identity, "Update managed cluster") {
            continue;
        }

        let outcome: Outcome<_> = with_spinner(
            format!("Updating cluster {}", identity.name),
            ctx.client.update_cluster(&identity, &update),
        )
        .await
        .into();
        ctx.report(outcome, args.flags.pass_thru)?;
    }
    Ok(())
}
