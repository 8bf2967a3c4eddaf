use std::{borrow::Borrow, fmt};

use uuid::Uuid;

// Opaque string identifiers that are only compared,
// displayed and passed around.
macro_rules! string_id {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(from: String) -> Self {
                Self(from)
            }
        }

        impl From<&str> for $name {
            fn from(from: &str) -> Self {
                Self(from.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(from: $name) -> Self {
                from.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of locations and change requests.
    Id
);

// Assigned by the chat platform, never generated by us.
string_id!(
    /// Account id of a chat platform member.
    UserId
);

string_id!(
    /// Id of the interactive message that carries a change request.
    MessageId
);

impl Id {
    pub fn new() -> Self {
        Uuid::new_v4().into()
    }

    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
    }
}

impl From<Uuid> for Id {
    fn from(from: Uuid) -> Self {
        Self(from.as_simple().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_valid_and_unique() {
        let a = Id::new();
        let b = Id::new();
        assert!(a.is_valid());
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert!(!Id::default().is_valid());
    }

    #[test]
    fn external_ids_display_their_raw_value() {
        assert_eq!(UserId::from("1234").to_string(), "1234");
        assert_eq!(MessageId::from("m-1").as_str(), "m-1");
    }
}
