//! Per-invocation state shared by all commands

use serde::Serialize;
use sfmc_arm::{ArmClient, Confirm, FileProvider, Outcome, Projection};
use sfmc_core::{IdentityArgs, ResourceIdentity, ResourceKind};

use crate::args::MutationFlags;
use crate::confirm::TerminalConfirm;
use crate::display::{self, OutputFormat};
use crate::error::Result;
use crate::exit_codes;

pub struct Context {
    pub client: ArmClient<FileProvider>,

    pub format: OutputFormat,

    /// Location for new clusters when none is given
    pub default_location: Option<String>,

    confirm: TerminalConfirm,

    /// Soft failures reported so far
    soft_failures: usize,
}

impl Context {
    pub fn new(
        provider: FileProvider,
        subscription_id: &str,
        format: OutputFormat,
        default_location: Option<String>,
    ) -> Self {
        Self {
            client: ArmClient::new(provider, subscription_id),
            format,
            default_location,
            confirm: TerminalConfirm::default(),
            soft_failures: 0,
        }
    }

    /// Apply the `--what-if` / `--confirm` flags of a mutating command
    pub fn apply_flags(&mut self, flags: MutationFlags) {
        self.confirm = TerminalConfirm {
            what_if: flags.what_if,
            confirm: flags.confirm,
        };
        self.client.set_confirm(self.confirm);
    }

    pub fn resolve(&self, kind: ResourceKind, args: &IdentityArgs) -> Result<ResourceIdentity> {
        Ok(self.client.resolve(kind, args)?)
    }

    /// Whether a mutating call on `identity` may run
    pub fn should_process(&self, identity: &ResourceIdentity, action: &str) -> bool {
        let allowed = self.confirm.should_process(&identity.resource_id(), action);
        if !allowed && !self.confirm.what_if {
            display::warning(&format!("Skipped: {}", action));
        }
        allowed
    }

    /// Emit the result of one item
    ///
    /// Soft failures print an error record and let the batch continue;
    /// fatal errors stop it.
    pub fn report<T: Serialize>(&mut self, outcome: Outcome<T>, pass_thru: bool) -> Result<()> {
        match outcome {
            Outcome::Ok(resource) => display::emit(&Projection::of(resource, pass_thru), self.format),
            Outcome::SoftFail { failure, .. } => {
                display::error_record(&failure);
                self.soft_failures += 1;
                Ok(())
            }
            Outcome::Fatal(err) => Err(err.into()),
        }
    }

    /// Emit a listing
    pub fn report_list<T: Serialize>(&mut self, outcome: Outcome<Vec<T>>) -> Result<()> {
        match outcome {
            Outcome::Ok(resources) => display::emit(&Projection::Resources(resources), self.format),
            other => self.report(other, false),
        }
    }

    /// Exit code once every item has been processed
    pub fn exit_code(&self) -> i32 {
        if self.soft_failures > 0 {
            exit_codes::SOFT_FAILURE
        } else {
            exit_codes::SUCCESS
        }
    }
}
