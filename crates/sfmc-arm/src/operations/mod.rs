//! Per-resource operations on [`ArmClient`](crate::ArmClient)
//!
//! Each module adds an `impl` block for one resource family. Creation goes
//! through the create policy of [`crate::gate`], every change through
//! fetch-mutate-put.

mod applications;
mod clusters;
mod node_types;
mod services;
