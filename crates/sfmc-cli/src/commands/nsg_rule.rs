//! Network security rule commands

use clap::{Args, Subcommand};
use sfmc_arm::{NetworkSecurityRuleUpdate, Outcome, find_rule};
use sfmc_core::{Access, Direction, NetworkSecurityRule, NsgProtocol, ResourceKind};

use super::with_spinner;
use crate::args::{MutationFlags, TargetArgs};
use crate::context::Context;
use crate::error::{CliError, Result};

#[derive(Subcommand, Debug)]
pub enum NsgRuleCommand {
    /// Append a rule to a cluster
    Add(AddArgs),

    /// Show one rule, or all rules of a cluster
    Get(GetArgs),

    /// Change fields of an existing rule
    Set(SetArgs),

    /// Remove a rule
    Remove(RemoveArgs),
}

/// Address and port filters of a rule
#[derive(Args, Debug, Default)]
pub struct RuleFilters {
    #[arg(long = "source-address-prefix")]
    pub source_address_prefixes: Vec<String>,

    #[arg(long = "destination-address-prefix")]
    pub destination_address_prefixes: Vec<String>,

    #[arg(long = "source-port-range")]
    pub source_port_ranges: Vec<String>,

    #[arg(long = "destination-port-range")]
    pub destination_port_ranges: Vec<String>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Rule name, unique within the cluster
    #[arg(short, long)]
    pub name: String,

    #[arg(long)]
    pub description: Option<String>,

    /// tcp, udp, icmp, ah, esp, http, https or any
    #[arg(long)]
    pub protocol: NsgProtocol,

    #[arg(long)]
    pub access: Access,

    #[arg(long)]
    pub direction: Direction,

    /// Evaluation order, 1000 to 3000
    #[arg(long)]
    pub priority: i32,

    #[command(flatten)]
    pub filters: RuleFilters,

    #[command(flatten)]
    pub flags: MutationFlags,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Only show the rule with this name
    #[arg(short, long)]
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(short, long)]
    pub name: String,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub protocol: Option<NsgProtocol>,

    #[arg(long)]
    pub access: Option<Access>,

    #[arg(long)]
    pub direction: Option<Direction>,

    #[arg(long)]
    pub priority: Option<i32>,

    #[command(flatten)]
    pub filters: RuleFilters,

    #[command(flatten)]
    pub flags: MutationFlags,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[arg(short, long)]
    pub name: String,

    #[command(flatten)]
    pub flags: MutationFlags,
}

pub async fn run(ctx: &mut Context, command: NsgRuleCommand) -> Result<()> {
    match command {
        NsgRuleCommand::Add(args) => add(ctx, args).await,
        NsgRuleCommand::Get(args) => get(ctx, args).await,
        NsgRuleCommand::Set(args) => set(ctx, args).await,
        NsgRuleCommand::Remove(args) => remove(ctx, args).await,
    }
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() { None } else { Some(values) }
}

fn rule_update(args: SetArgs) -> NetworkSecurityRuleUpdate {
    NetworkSecurityRuleUpdate {
        description: args.description,
        protocol: args.protocol,
        access: args.access,
        direction: args.direction,
        priority: args.priority,
        source_address_prefixes: non_empty(args.filters.source_address_prefixes),
        destination_address_prefixes: non_empty(args.filters.destination_address_prefixes),
        source_port_ranges: non_empty(args.filters.source_port_ranges),
        destination_port_ranges: non_empty(args.filters.destination_port_ranges),
    }
}

async fn add(ctx: &mut Context, args: AddArgs) -> Result<()> {
    ctx.apply_flags(args.flags);
    let rule = NetworkSecurityRule {
        name: args.name,
        description: args.description,
        protocol: args.protocol,
        access: args.access,
        direction: args.direction,
        priority: args.priority,
        source_address_prefixes: args.filters.source_address_prefixes,
        destination_address_prefixes: args.filters.destination_address_prefixes,
        source_port_ranges: args.filters.source_port_ranges,
        destination_port_ranges: args.filters.destination_port_ranges,
    };

    for identity_args in args.target.identities(ResourceKind::ManagedCluster, None, None)? {
        let identity = ctx.resolve(ResourceKind::ManagedCluster, &identity_args)?;
        if !ctx.should_process(&identity, "Add network security rule") {
            continue;
        }

        let outcome: Outcome<_> = with_spinner(
            format!("Adding rule {} to {}", rule.name, identity.name),
            ctx.client.add_network_security_rule(&identity, rule.clone()),
        )
        .await
        .into();
        ctx.report(outcome, args.flags.pass_thru)?;
    }
    Ok(())
}

async fn get(ctx: &mut Context, args: GetArgs) -> Result<()> {
    for identity_args in args.target.identities(ResourceKind::ManagedCluster, None, None)? {
        let identity = ctx.resolve(ResourceKind::ManagedCluster, &identity_args)?;
        let outcome: Outcome<_> = ctx
            .client
            .get_network_security_rules(&identity, args.name.as_deref())
            .await
            .into();
        ctx.report_list(outcome)?;
    }
    Ok(())
}

async fn set(ctx: &mut Context, args: SetArgs) -> Result<()> {
    ctx.apply_flags(args.flags);
    let targets = args.target.identities(ResourceKind::ManagedCluster, None, None)?;
    let name = args.name.clone();
    let pass_thru = args.flags.pass_thru;
    let update = rule_update(args);
    if update.is_empty() {
        return Err(CliError::input_with_help(
            format!("Nothing to change on rule {}", name),
            "Pass at least one of --description, --protocol, --access, --direction, --priority or a prefix/port filter",
        ));
    }

    for identity_args in targets {
        let identity = ctx.resolve(ResourceKind::ManagedCluster, &identity_args)?;
        if !ctx.should_process(&identity, "Update network security rule") {
            continue;
        }

        let outcome: Outcome<_> = with_spinner(
            format!("Updating rule {} on {}", name, identity.name),
            ctx.client
                .update_network_security_rule(&identity, &name, update.clone()),
        )
        .await
        .into();
        // Only the changed rule is emitted, not the whole cluster
        let outcome = outcome.and_then(|cluster| find_rule(&cluster, &name).cloned());
        ctx.report(outcome, pass_thru)?;
    }
    Ok(())
}

async fn remove(ctx: &mut Context, args: RemoveArgs) -> Result<()> {
    ctx.apply_flags(args.flags);

    for identity_args in args.target.identities(ResourceKind::ManagedCluster, None, None)? {
        let identity = ctx.resolve(ResourceKind::ManagedCluster, &identity_args)?;
        if !ctx.should_process(&identity, "Remove network security rule") {
            continue;
        }

        let outcome: Outcome<_> = with_spinner(
            format!("Removing rule {} from {}", args.name, identity.name),
            ctx.client.remove_network_security_rule(&identity, &args.name),
        )
        .await
        .into();
        ctx.report(outcome, args.flags.pass_thru)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_keep_current_values() {
        let args = SetArgs {
            target: TargetArgs::default(),
            name: "WebRule".into(),
            description: None,
            protocol: None,
            access: None,
            direction: None,
            priority: Some(1500),
            filters: RuleFilters::default(),
            flags: MutationFlags::default(),
        };

        let update = rule_update(args);
        assert_eq!(update.priority, Some(1500));
        assert_eq!(update.source_port_ranges, None);
        assert!(!update.is_empty());
    }
}
