//! Case-insensitive natural keys.
//!
//! Course codes, department names, lecturer emails and student ids are looked
//! up by business-meaningful values that compare without regard to case. Each
//! key keeps the spelling it was created with for display and compares,
//! orders and hashes on its case-folded form.

/// Declare a trimmed, case-insensitive natural key newtype.
macro_rules! natural_key {
    (
        $(#[$outer:meta])*
        $name:ident, $error:ident :: $variant:ident
        $(, check = $check:expr)?
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name {
            raw: String,
            folded: String,
        }

        impl $name {
            /// Validate and construct the key from borrowed or owned input.
            pub fn new(value: impl Into<String>) -> Result<Self, $error> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err($error::$variant);
                }
                $(
                    let check: fn(&str) -> Result<(), $error> = $check;
                    check(trimmed)?;
                )?
                Ok(Self {
                    raw: trimmed.to_owned(),
                    folded: trimmed.to_lowercase(),
                })
            }

            /// Lower-cased form used for equality and ordering.
            pub fn folded(&self) -> &str {
                self.folded.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.raw.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.folded == other.folded
            }
        }

        impl Eq for $name {}

        impl std::hash::Hash for $name {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.folded.hash(state);
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.folded.cmp(&other.folded)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.raw
            }
        }

        impl TryFrom<String> for $name {
            type Error = $error;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

pub(crate) use natural_key;
