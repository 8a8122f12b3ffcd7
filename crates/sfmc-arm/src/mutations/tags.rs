//! Tag appliers, shared by every resource kind

use sfmc_core::{ArmResource, Tags, merge_tags};

use super::Mutation;
use crate::error::Result;

/// Change the tags of a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMutation {
    /// Add or overwrite the given keys
    Merge(Tags),

    /// Clear, then set the given tags
    Replace(Tags),

    Clear,
}

impl<T: ArmResource> Mutation<T> for TagMutation {
    fn describe(&self) -> String {
        match self {
            TagMutation::Merge(tags) => format!("Merge {} tag(s)", tags.len()),
            TagMutation::Replace(tags) => format!("Replace tags with {} tag(s)", tags.len()),
            TagMutation::Clear => "Clear tags".to_string(),
        }
    }

    fn apply(&self, resource: &mut T) -> Result<()> {
        let tags = resource.tags_mut();
        match self {
            TagMutation::Merge(incoming) => merge_tags(tags, incoming),
            TagMutation::Replace(incoming) => {
                tags.clear();
                merge_tags(tags, incoming);
            }
            TagMutation::Clear => tags.clear(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfmc_core::{ApplicationType, parse_tags};

    #[test]
    fn test_merge_twice_is_idempotent() {
        let mut app_type = ApplicationType::default();
        let merge = TagMutation::Merge(parse_tags(["env=prod"]).unwrap());

        merge.apply(&mut app_type).unwrap();
        merge.apply(&mut app_type).unwrap();

        assert_eq!(app_type.tags.len(), 1);
    }

    #[test]
    fn test_replace_drops_old_keys() {
        let mut app_type = ApplicationType {
            tags: parse_tags(["env=dev", "owner=me"]).unwrap(),
            ..Default::default()
        };
        TagMutation::Replace(parse_tags(["env=prod"]).unwrap())
            .apply(&mut app_type)
            .unwrap();

        assert_eq!(app_type.tags, parse_tags(["env=prod"]).unwrap());

        Mutation::<ApplicationType>::apply(&TagMutation::Clear, &mut app_type).unwrap();
        assert!(app_type.tags.is_empty());
    }
}
