//! CLI commands
//!
//! One module per resource family. Every command resolves its targets
//! first, then processes them in order: soft failures are reported and
//! skipped, the first fatal error ends the invocation.

use std::future::Future;

use crate::display;

pub mod app;
pub mod app_type;
pub mod app_type_version;
pub mod client_cert;
pub mod cluster;
pub mod node_type;
pub mod nsg_rule;
pub mod service;
pub mod vm_extension;

/// Await a provider call behind a spinner
pub(crate) async fn with_spinner<F: Future>(message: impl Into<String>, call: F) -> F::Output {
    let spinner = display::spinner(message);
    let output = call.await;
    spinner.finish_and_clear();
    output
}
