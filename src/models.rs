//! Core data models for the rescan pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single `from -> to` rewrite rule
///
/// `from` is a regular expression, `to` a replacement string that may
/// reference capture groups (`$1`, `${name}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    /// Pattern matched against the path
    pub from: String,
    /// Replacement for every match
    pub to: String,
}

impl RewriteRule {
    /// Create a new rule
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A root folder a media server exposes as one scannable unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    /// Display name of the library
    pub name: String,
    /// Absolute folder path of the library root
    pub path: String,
}

impl Library {
    /// Create a new library
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Check whether this library's path is a prefix of the folder
    pub fn owns(&self, folder: &str) -> bool {
        folder.starts_with(&self.path)
    }
}

/// One unit of work: a folder to rescan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
    /// Rewritten, absolute folder path
    pub folder: String,
    /// Priority configured on the trigger that produced the scan
    pub priority: i32,
    /// When the scan was created
    pub time: DateTime<Utc>,
}

impl Scan {
    /// Create a new scan stamped with the current time
    pub fn new(folder: impl Into<String>, priority: i32) -> Self {
        Self::at(folder, priority, Utc::now())
    }

    /// Create a new scan with an explicit timestamp
    pub fn at(folder: impl Into<String>, priority: i32, time: DateTime<Utc>) -> Self {
        Self {
            folder: folder.into(),
            priority,
            time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_library_owns_prefix() {
        let lib = Library::new("Movies", "/data/Movies/");
        assert!(lib.owns("/data/Movies/Foo (2020)"));
        assert!(!lib.owns("/data/TV/Foo"));
        assert!(!lib.owns("/data/Movies"));
    }

    #[test]
    fn test_scan_at() {
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let scan = Scan::at("/data/Movies/Foo", 5, time);
        assert_eq!(scan.folder, "/data/Movies/Foo");
        assert_eq!(scan.priority, 5);
        assert_eq!(scan.time, time);
    }

    #[test]
    fn test_rewrite_rule_deserialize() {
        let rule: RewriteRule = serde_json::from_str(r#"{"from": "^/mnt/", "to": "/data/"}"#).unwrap();
        assert_eq!(rule, RewriteRule::new("^/mnt/", "/data/"));
    }
}
