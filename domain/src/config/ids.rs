//! Stable identifiers for configuration entities.
//!
//! Display names are not unique and may change between discussions, so
//! every cross-reference (role → model → channel) and every transcript entry
//! carries one of these ids instead.

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

entity_id!(
    /// Identifies a [`Channel`](super::Channel)
    ChannelId
);
entity_id!(
    /// Identifies a [`Model`](super::Model)
    ModelId
);
entity_id!(
    /// Identifies a [`Role`](super::Role)
    RoleId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = RoleId::new("cognito-default");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"cognito-default\"");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(ChannelId::from("openai-official").to_string(), "openai-official");
    }
}
