//! Store Options Module
//!
//! Normalizes connection options for the object store. Older releases used
//! different option names (`ACCESS_KEY_ID`, `SECRET_ACCESS_KEY`,
//! `STORAGE_BUCKET_NAME`); both spellings are accepted, in upper or lower case.

use std::collections::BTreeMap;

/// Legacy option names and the names that replaced them.
const RENAMED_OPTIONS: [(&str, &str); 3] = [
    ("ACCESS_KEY_ID", "ACCESS_KEY"),
    ("SECRET_ACCESS_KEY", "SECRET_KEY"),
    ("STORAGE_BUCKET_NAME", "BUCKET_NAME"),
];

/// Canned ACL used when none is configured.
pub const DEFAULT_ACL: &str = "private";

// == Store Options ==
/// Connection options, keyed by lowercase name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreOptions {
    values: BTreeMap<String, String>,
}

impl StoreOptions {
    // == Constructor ==
    /// Builds options from raw name/value pairs.
    ///
    /// Current names win over legacy ones, and upper case names win over
    /// lower case ones. Empty values are dropped and `location` is stripped
    /// of leading and trailing slashes.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut raw: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.is_empty())
            .collect();

        for (legacy, current) in RENAMED_OPTIONS {
            if !raw.contains_key(current) {
                if let Some(value) = raw.get(legacy).cloned() {
                    raw.insert(current.to_string(), value);
                }
            }
        }

        let location = raw
            .get("LOCATION")
            .or_else(|| raw.get("location"))
            .map(|l| l.trim_matches('/').to_string());

        // Lower case names first so upper case spellings overwrite them.
        let (lower, upper): (Vec<_>, Vec<_>) = raw
            .into_iter()
            .partition(|(name, _)| name.to_lowercase() == *name);
        let mut values: BTreeMap<String, String> = lower
            .into_iter()
            .chain(upper)
            .map(|(name, value)| (name.to_lowercase(), value))
            .collect();

        match location {
            Some(location) if !location.is_empty() => {
                values.insert("location".to_string(), location);
            }
            _ => {
                values.remove("location");
            }
        }

        Self { values }
    }

    /// Returns an option by (case-insensitive) name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn access_key(&self) -> Option<&str> {
        self.get("access_key")
    }

    pub fn secret_key(&self) -> Option<&str> {
        self.get("secret_key")
    }

    pub fn bucket_name(&self) -> Option<&str> {
        self.get("bucket_name")
    }

    pub fn region(&self) -> Option<&str> {
        self.get("region")
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.get("endpoint")
    }

    /// Namespace prefix, already stripped of slashes; empty when unset.
    pub fn location(&self) -> &str {
        self.get("location").unwrap_or("")
    }

    /// Canned ACL for new objects, `private` unless configured.
    pub fn default_acl(&self) -> &str {
        self.get("default_acl").unwrap_or(DEFAULT_ACL)
    }

    /// Canned ACL for the bucket; follows [`default_acl`](Self::default_acl)
    /// unless set on its own.
    pub fn bucket_acl(&self) -> &str {
        self.get("bucket_acl").unwrap_or_else(|| self.default_acl())
    }
}
