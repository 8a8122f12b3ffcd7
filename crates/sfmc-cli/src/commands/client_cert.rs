//! Client certificate commands

use clap::{Args, Subcommand};
use sfmc_arm::{CertificateSelector, Outcome};
use sfmc_core::{ClientCertificate, ResourceKind};

use super::with_spinner;
use crate::args::{MutationFlags, TargetArgs};
use crate::context::Context;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum ClientCertCommand {
    /// Register a client certificate on a cluster
    Add(AddArgs),

    /// Unregister a client certificate
    Remove(RemoveArgs),
}

/// Exactly one of thumbprint or common name
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct CertificateKey {
    #[arg(long)]
    pub thumbprint: Option<String>,

    #[arg(long)]
    pub common_name: Option<String>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub key: CertificateKey,

    /// Issuer thumbprints pinned for a common name certificate
    #[arg(long, requires = "common_name")]
    pub issuer_thumbprint: Vec<String>,

    /// Grant admin access
    #[arg(long)]
    pub admin: bool,

    #[command(flatten)]
    pub flags: MutationFlags,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub key: CertificateKey,

    #[command(flatten)]
    pub flags: MutationFlags,
}

pub async fn run(ctx: &mut Context, command: ClientCertCommand) -> Result<()> {
    match command {
        ClientCertCommand::Add(args) => add(ctx, args).await,
        ClientCertCommand::Remove(args) => remove(ctx, args).await,
    }
}

fn selector(key: &CertificateKey) -> CertificateSelector {
    match (&key.thumbprint, &key.common_name) {
        (Some(thumbprint), _) => CertificateSelector::Thumbprint(thumbprint.clone()),
        (None, common_name) => CertificateSelector::CommonName(common_name.clone().unwrap_or_default()),
    }
}

async fn add(ctx: &mut Context, args: AddArgs) -> Result<()> {
    ctx.apply_flags(args.flags);
    let certificate = match (&args.key.thumbprint, &args.key.common_name) {
        (Some(thumbprint), _) => ClientCertificate::by_thumbprint(thumbprint, args.admin),
        (None, common_name) => ClientCertificate::by_common_name(
            common_name.as_deref().unwrap_or_default(),
            &args.issuer_thumbprint,
            args.admin,
        ),
    };

    for identity_args in args.target.identities(ResourceKind::ManagedCluster, None, None)? {
        let identity = ctx.resolve(ResourceKind::ManagedCluster, &identity_args)?;
        if !ctx.should_process(&identity, "Add client certificate") {
            continue;
        }

        let outcome: Outcome<_> = with_spinner(
            format!("Adding client certificate to {}", identity.name),
            ctx.client.add_client_certificate(&identity, certificate.clone()),
        )
        .await
        .into();
        ctx.report(outcome, args.flags.pass_thru)?;
    }
    Ok(())
}

async fn remove(ctx: &mut Context, args: RemoveArgs) -> Result<()> {
    ctx.apply_flags(args.flags);
    let selector = selector(&args.key);

    for identity_args in args.target.identities(ResourceKind::ManagedCluster, None, None)? {
        let identity = ctx.resolve(ResourceKind::ManagedCluster, &identity_args)?;
        if !ctx.should_process(&identity, "Remove client certificate") {
            continue;
        }

        let outcome: Outcome<_> = with_spinner(
            format!("Removing client certificate from {}", identity.name),
            ctx.client.remove_client_certificate(&identity, selector.clone()),
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
    fn test_selector_prefers_thumbprint() {
        let key = CertificateKey {
            thumbprint: Some("AA11".into()),
            common_name: None,
        };
        assert_eq!(selector(&key), CertificateSelector::Thumbprint("AA11".into()));

        let key = CertificateKey {
            thumbprint: None,
            common_name: Some("client.contoso.com".into()),
        };
        assert_eq!(
            selector(&key),
            CertificateSelector::CommonName("client.contoso.com".into())
        );
    }
}
