//! Service commands

use clap::{Args, Subcommand};
use sfmc_arm::{Outcome, ServiceOptions};
use sfmc_core::{MoveCost, Partition, ResourceKind, ServiceKind, ServicePackageActivationMode};

use super::with_spinner;
use crate::args::{MutationFlags, TargetArgs, key_values};
use crate::context::Context;
use crate::error::{CliError, Result};

#[derive(Subcommand, Debug)]
pub enum ServiceCommand {
    /// Create a service under an application
    New(NewArgs),

    /// Show a service, or list the services of an application
    Get(GetArgs),
}

/// Stateless service settings
#[derive(Args, Debug, Default)]
pub struct StatelessArgs {
    /// Instance count, -1 for every node
    #[arg(long, allow_negative_numbers = true)]
    pub instance_count: Option<i32>,

    #[arg(long)]
    pub min_instance_count: Option<i32>,

    #[arg(long)]
    pub min_instance_percentage: Option<i32>,
}

/// Stateful service settings
#[derive(Args, Debug, Default)]
pub struct StatefulArgs {
    #[arg(long, requires = "stateful")]
    pub target_replica_set_size: Option<i32>,

    #[arg(long, requires = "stateful")]
    pub min_replica_set_size: Option<i32>,

    #[arg(long, requires = "stateful")]
    pub has_persisted_state: bool,

    /// ISO 8601 duration, e.g. PT1M
    #[arg(long, requires = "stateful")]
    pub replica_restart_wait_duration: Option<String>,

    #[arg(long, requires = "stateful")]
    pub quorum_loss_wait_duration: Option<String>,

    #[arg(long, requires = "stateful")]
    pub stand_by_replica_keep_duration: Option<String>,

    #[arg(long, requires = "stateful")]
    pub service_placement_time_limit: Option<String>,
}

/// Partition scheme; singleton when none is given
#[derive(Args, Debug, Default)]
pub struct PartitionArgs {
    /// Number of uniform Int64 range partitions
    #[arg(long, requires_all = ["low_key", "high_key"], conflicts_with = "partition_names")]
    pub partition_count: Option<i32>,

    #[arg(long, allow_negative_numbers = true)]
    pub low_key: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    pub high_key: Option<i64>,

    /// Named partition (repeatable)
    #[arg(long = "partition-name")]
    pub partition_names: Vec<String>,
}

#[derive(Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(long)]
    pub app_name: Option<String>,

    /// Service name
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(long)]
    pub service_type_name: String,

    /// Create a stateful service instead of a stateless one
    #[arg(long, conflicts_with_all = ["instance_count", "min_instance_count", "min_instance_percentage"])]
    pub stateful: bool,

    #[command(flatten)]
    pub stateless_args: StatelessArgs,

    #[command(flatten)]
    pub stateful_args: StatefulArgs,

    #[command(flatten)]
    pub partition: PartitionArgs,

    #[arg(long)]
    pub placement_constraints: Option<String>,

    #[arg(long)]
    pub default_move_cost: Option<MoveCost>,

    #[arg(long)]
    pub activation_mode: Option<ServicePackageActivationMode>,

    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[command(flatten)]
    pub flags: MutationFlags,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(long)]
    pub app_name: Option<String>,

    /// Service name; omit to list the services of the application
    #[arg(short, long)]
    pub name: Option<String>,
}

pub async fn run(ctx: &mut Context, command: ServiceCommand) -> Result<()> {
    match command {
        ServiceCommand::New(args) => new(ctx, args).await,
        ServiceCommand::Get(args) => get(ctx, args).await,
    }
}

fn service_kind(args: &NewArgs) -> ServiceKind {
    if args.stateful {
        let stateful = &args.stateful_args;
        ServiceKind::Stateful {
            target_replica_set_size: stateful.target_replica_set_size,
            min_replica_set_size: stateful.min_replica_set_size,
            has_persisted_state: stateful.has_persisted_state,
            replica_restart_wait_duration: stateful.replica_restart_wait_duration.clone(),
            quorum_loss_wait_duration: stateful.quorum_loss_wait_duration.clone(),
            stand_by_replica_keep_duration: stateful.stand_by_replica_keep_duration.clone(),
            service_placement_time_limit: stateful.service_placement_time_limit.clone(),
        }
    } else {
        let stateless = &args.stateless_args;
        ServiceKind::Stateless {
            instance_count: stateless.instance_count.unwrap_or(-1),
            min_instance_count: stateless.min_instance_count,
            min_instance_percentage: stateless.min_instance_percentage,
        }
    }
}

fn partition(args: &PartitionArgs) -> Partition {
    match (args.partition_count, args.low_key, args.high_key) {
        (Some(count), Some(low_key), Some(high_key)) => Partition::UniformInt64Range {
            count,
            low_key,
            high_key,
        },
        _ if !args.partition_names.is_empty() => Partition::Named {
            names: args.partition_names.clone(),
        },
        _ => Partition::Singleton,
    }
}

fn service_options(args: &NewArgs) -> Result<ServiceOptions> {
    let mut options = ServiceOptions::new(&args.service_type_name, service_kind(args))
        .with_partition(partition(&args.partition));
    options.placement_constraints = args.placement_constraints.clone();
    options.default_move_cost = args.default_move_cost;
    options.activation_mode = args.activation_mode;
    options.tags = key_values(&args.tags)?;

    options.validate()?;
    Ok(options)
}

async fn new(ctx: &mut Context, args: NewArgs) -> Result<()> {
    ctx.apply_flags(args.flags);
    let options = service_options(&args)?;

    let targets = args.target.identities(
        ResourceKind::Service,
        args.app_name.as_deref(),
        args.name.as_deref(),
    )?;
    for identity_args in targets {
        let identity = ctx.resolve(ResourceKind::Service, &identity_args)?;
        if !ctx.should_process(&identity, "Create service") {
            continue;
        }

        let outcome: Outcome<_> = with_spinner(
            format!("Creating service {}", identity.name),
            ctx.client.new_service(&identity, &options),
        )
        .await
        .into();
        ctx.report(outcome, args.flags.pass_thru)?;
    }
    Ok(())
}

async fn get(ctx: &mut Context, args: GetArgs) -> Result<()> {
    if args.target.by_name() && args.name.is_none() {
        let app_name = args.app_name.as_deref().ok_or_else(|| {
            CliError::input_with_help(
                "No application selected",
                "Pass --app-name to list its services, plus -n to show one",
            )
        })?;
        let targets = args
            .target
            .identities(ResourceKind::Application, None, Some(app_name))?;
        for identity_args in targets {
            let application = ctx.resolve(ResourceKind::Application, &identity_args)?;
            let outcome: Outcome<_> = ctx.client.list_services(&application).await.into();
            ctx.report_list(outcome)?;
        }
        return Ok(());
    }

    let targets = args.target.identities(
        ResourceKind::Service,
        args.app_name.as_deref(),
        args.name.as_deref(),
    )?;
    for identity_args in targets {
        let identity = ctx.resolve(ResourceKind::Service, &identity_args)?;
        let outcome: Outcome<_> = ctx.client.get_service(&identity).await.into();
        ctx.report(outcome, false)?;
    }
    Ok(())
}
