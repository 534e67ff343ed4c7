//! Newtype wrappers for resource identifiers.
//!
//! All newtypes serialize/deserialize as plain strings so records keep the
//! service's wire shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<String> for $name {
            fn eq(&self, other: &String) -> bool {
                self.0 == *other
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_newtype!(
    /// Unique, case-sensitive application key.
    ApplicationName
);

string_newtype!(
    /// Label of an application version, unique within its application.
    VersionLabel
);

string_newtype!(
    /// Generated environment identifier: `e-` followed by 10 lowercase letters.
    EnvironmentId
);

string_newtype!(
    /// Human-chosen environment name. Lookups by name resolve to the first match.
    EnvironmentName
);

string_newtype!(
    /// Per-response request identifier carried in the response metadata.
    RequestId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_id_display_and_as_ref() {
        let id = EnvironmentId::new("e-abcdefghij");
        assert_eq!(id.to_string(), "e-abcdefghij");
        assert_eq!(id.as_str(), "e-abcdefghij");
        assert_eq!(AsRef::<str>::as_ref(&id), "e-abcdefghij");
    }

    #[test]
    fn application_name_serde_is_transparent() {
        let name = ApplicationName::new("my-app");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"my-app\"");
        let back: ApplicationName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }

    #[test]
    fn names_compare_case_sensitively() {
        let a = ApplicationName::from("App");
        assert_eq!(a, "App");
        assert!(a != "app");
    }

    #[test]
    fn version_label_into_inner() {
        let v = VersionLabel::new("v1".to_owned());
        assert_eq!(v.into_inner(), "v1");
    }
}
