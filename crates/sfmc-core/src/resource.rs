//! Behaviour shared by all managed cluster resource representations

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::identity::{ResourceIdentity, ResourceKind};
use crate::state::ProvisioningState;
use crate::tags::Tags;

/// Creation and modification metadata stamped by the control plane
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SystemData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<DateTime<Utc>>,
}

/// A mutable snapshot of one remote resource
pub trait ArmResource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Kind addressed by this representation's resource id
    const KIND: ResourceKind;

    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn provisioning_state(&self) -> Option<ProvisioningState>;

    fn tags(&self) -> &Tags;

    fn tags_mut(&mut self) -> &mut Tags;

    /// Identity parsed from the representation's own id
    fn identity(&self) -> Result<ResourceIdentity> {
        if self.id().trim().is_empty() {
            return Err(CoreError::MissingIdentity { kind: Self::KIND });
        }
        ResourceIdentity::parse(Self::KIND, self.id())
    }

    fn is_failed(&self) -> bool {
        self.provisioning_state()
            .is_some_and(ProvisioningState::is_failed)
    }
}

/// Implement [`ArmResource`] for a struct with the standard top-level fields
macro_rules! impl_arm_resource {
    ($ty:ty, $kind:expr) => {
        impl $crate::resource::ArmResource for $ty {
            const KIND: $crate::identity::ResourceKind = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn provisioning_state(&self) -> Option<$crate::state::ProvisioningState> {
                self.provisioning_state
            }

            fn tags(&self) -> &$crate::tags::Tags {
                &self.tags
            }

            fn tags_mut(&mut self) -> &mut $crate::tags::Tags {
                &mut self.tags
            }
        }
    };
}

/// Declare a closed string enum with case-insensitive parsing
///
/// Variants may list aliases accepted on input only.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $wire:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const VARIANTS: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($wire) $(|| s.eq_ignore_ascii_case($alias))* {
                        return Ok(Self::$variant);
                    }
                )+
                Err($crate::error::CoreError::InvalidEnumValue {
                    field: $field,
                    value: s.to_string(),
                    expected: Self::VARIANTS.join(", "),
                })
            }
        }
    };
}

pub(crate) use impl_arm_resource;
pub(crate) use string_enum;

#[cfg(test)]
mod tests {
    use super::*;

    string_enum! {
        Color, "color" {
            Red => "red" | "crimson",
            Blue => "Blue",
        }
    }

    #[test]
    fn test_string_enum_parse() {
        assert_eq!("RED".parse::<Color>().unwrap(), Color::Red);
        assert_eq!("crimson".parse::<Color>().unwrap(), Color::Red);
        assert_eq!("blue".parse::<Color>().unwrap(), Color::Blue);
        assert_eq!(Color::Blue.to_string(), "Blue");
    }

    #[test]
    fn test_string_enum_invalid_lists_variants() {
        let err = "green".parse::<Color>().unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidEnumValue {
                field: "color",
                value: "green".to_string(),
                expected: "red, Blue".to_string(),
            }
        );
    }
}
