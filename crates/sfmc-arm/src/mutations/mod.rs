//! Mutation appliers
//!
//! Each applier describes one change to a fetched representation: an insert,
//! a filtered removal or a field overwrite. Appliers validate the
//! sub-collection invariants before touching the target, so a failed
//! mutation leaves the representation as it was.
//!
//! Name lookups are case-insensitive throughout.

mod certificates;
mod cluster;
mod extensions;
mod nsg;
mod tags;

pub use certificates::{AddClientCertificate, CertificateSelector, RemoveClientCertificate};
pub use cluster::UpdateCluster;
pub use extensions::{AddVmExtension, UpdateVmExtension};
pub use nsg::{
    AddNetworkSecurityRule, NetworkSecurityRuleUpdate, RemoveNetworkSecurityRule,
    UpdateNetworkSecurityRule, find_rule,
};
pub use tags::TagMutation;

use crate::error::Result;

/// Maximum edit distance for "did you mean" hints
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// One described change to a representation of type `T`
pub trait Mutation<T> {
    /// Human readable description, used for confirmation prompts and logs
    fn describe(&self) -> String;

    /// Apply the change in place
    ///
    /// On error, `target` is unchanged.
    fn apply(&self, target: &mut T) -> Result<()>;
}

/// Case-insensitive ordinal name comparison
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Closest candidate name to `input`, if one is close enough
pub(crate) fn closest_match<'a>(
    input: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    let input = input.to_lowercase();
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let distance = strsim::levenshtein(&input, &candidate.to_lowercase());
            (distance > 0 && distance <= MAX_SUGGESTION_DISTANCE).then_some((distance, candidate))
        })
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

/// "Did you mean" hint for a missing name
pub(crate) fn did_you_mean<'a>(
    input: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    closest_match(input, candidates).map(|name| format!("Did you mean '{}'?", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_match() {
        let names = ["WebRule", "SshRule", "AllowRdp"];
        assert_eq!(closest_match("webrul", names), Some("WebRule"));
        assert_eq!(closest_match("completely-different", names), None);
    }

    #[test]
    fn test_exact_match_is_not_suggested() {
        assert_eq!(closest_match("webrule", ["WebRule"]), None);
    }

    #[test]
    fn test_did_you_mean() {
        assert_eq!(
            did_you_mean("ssh-rule", ["SshRule"]).as_deref(),
            Some("Did you mean 'SshRule'?")
        );
    }
}
