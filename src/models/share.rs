//! Share model
//!
//! Represents one SMB share definition as stored in shares.json.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// How a share is exported on the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// Not exported
    No,
    /// Exported and browseable
    Yes,
    /// Exported but hidden from browse lists
    Hidden,
    /// Exported as a Time Machine target
    TimeMachine,
    /// Exported as a hidden Time Machine target
    TimeMachineHidden,
}

impl ExportMode {
    /// Parse an export token as stored in shares.json
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "-" => Some(Self::No),
            "e" => Some(Self::Yes),
            "eh" => Some(Self::Hidden),
            "et" => Some(Self::TimeMachine),
            "eth" => Some(Self::TimeMachineHidden),
            _ => None,
        }
    }

    /// The token written to shares.json
    pub fn token(&self) -> &'static str {
        match self {
            Self::No => "-",
            Self::Yes => "e",
            Self::Hidden => "eh",
            Self::TimeMachine => "et",
            Self::TimeMachineHidden => "eth",
        }
    }

    pub fn is_exported(&self) -> bool {
        !matches!(self, Self::No)
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden | Self::TimeMachineHidden)
    }

    pub fn is_time_machine(&self) -> bool {
        matches!(self, Self::TimeMachine | Self::TimeMachineHidden)
    }
}

impl Default for ExportMode {
    fn default() -> Self {
        Self::Yes
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::No => write!(f, "No"),
            Self::Yes => write!(f, "Yes"),
            Self::Hidden => write!(f, "Yes (hidden)"),
            Self::TimeMachine => write!(f, "Yes (Time Machine)"),
            Self::TimeMachineHidden => write!(f, "Yes (Time Machine, hidden)"),
        }
    }
}

/// Access policy for a share
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityMode {
    /// Guest access, read/write for everyone
    Public,
    /// Guest read, write limited to the write list
    Secure,
    /// No guest access, valid users only
    Private,
}

impl SecurityMode {
    /// Parse a security token (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "public" => Some(Self::Public),
            "secure" => Some(Self::Secure),
            "private" => Some(Self::Private),
            _ => None,
        }
    }

    /// The token written to shares.json
    pub fn token(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Secure => "secure",
            Self::Private => "private",
        }
    }
}

impl Default for SecurityMode {
    fn default() -> Self {
        Self::Public
    }
}

impl fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "Public"),
            Self::Secure => write!(f, "Secure"),
            Self::Private => write!(f, "Private"),
        }
    }
}

/// A single share definition
///
/// `export` and `security` hold the raw tokens from the document so that an
/// unknown value surfaces as a validation error rather than a load failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRecord {
    /// Share name as seen by SMB clients
    pub name: String,

    /// Directory being shared; canonical once validated
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Export token, see [`ExportMode`]
    #[serde(default = "default_export")]
    pub export: String,

    /// Security token, see [`SecurityMode`]
    #[serde(default = "default_security")]
    pub security: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_mask: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_mask: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts_allow: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts_deny: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_users: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_list: Option<String>,

    /// Enable macOS (vfs_fruit) compatibility
    #[serde(default)]
    pub fruit: bool,

    /// Keys this version does not know about, written back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_enabled() -> bool {
    true
}

fn default_export() -> String {
    ExportMode::default().token().to_string()
}

fn default_security() -> String {
    SecurityMode::default().token().to_string()
}

impl ShareRecord {
    /// Create a new enabled, exported, public share
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            comment: None,
            enabled: true,
            export: default_export(),
            security: default_security(),
            create_mask: None,
            directory_mask: None,
            hosts_allow: None,
            hosts_deny: None,
            valid_users: None,
            write_list: None,
            fruit: false,
            extra: Map::new(),
        }
    }

    /// Create a share with a comment
    pub fn with_comment(
        name: impl Into<String>,
        path: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        let mut share = Self::new(name, path);
        share.comment = Some(comment.into());
        share
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Parsed export mode, `None` if the token is unrecognized
    pub fn export_mode(&self) -> Option<ExportMode> {
        ExportMode::parse(&self.export)
    }

    /// Parsed security mode, `None` if the token is unrecognized
    pub fn security_mode(&self) -> Option<SecurityMode> {
        SecurityMode::parse(&self.security)
    }
}

impl fmt::Display for ShareRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_share() {
        let share = ShareRecord::new("Media", "/mnt/user/media");
        assert_eq!(share.name, "Media");
        assert!(share.enabled);
        assert_eq!(share.export_mode(), Some(ExportMode::Yes));
        assert_eq!(share.security_mode(), Some(SecurityMode::Public));
        assert!(!share.fruit);
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let json = r#"{"name": "TestShare1", "path": "/mnt/user/test1", "comment": "Test 1"}"#;
        let share: ShareRecord = serde_json::from_str(json).unwrap();

        assert_eq!(share.comment.as_deref(), Some("Test 1"));
        assert!(share.enabled);
        assert_eq!(share.export, "e");
        assert_eq!(share.security, "public");
        assert!(share.create_mask.is_none());
    }

    #[test]
    fn test_absent_optionals_are_not_serialized() {
        let share = ShareRecord::new("Media", "/mnt/user/media");
        let value = serde_json::to_value(&share).unwrap();
        let object = value.as_object().unwrap();

        assert!(!object.contains_key("comment"));
        assert!(!object.contains_key("create_mask"));
        assert!(!object.contains_key("hosts_allow"));
        assert!(object.contains_key("enabled"));
    }

    #[test]
    fn test_unknown_tokens_still_deserialize() {
        let json = r#"{"name": "X", "path": "/mnt/x", "export": "zz", "security": "open"}"#;
        let share: ShareRecord = serde_json::from_str(json).unwrap();

        assert!(share.export_mode().is_none());
        assert!(share.security_mode().is_none());
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let json = r#"{"name":"A","path":"/mnt/a","case_sensitive":"yes","force_user":"nobody"}"#;
        let share: ShareRecord = serde_json::from_str(json).unwrap();
        assert_eq!(share.extra.get("force_user"), Some(&Value::from("nobody")));

        let value = serde_json::to_value(&share).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.get("case_sensitive"), Some(&Value::from("yes")));
        assert_eq!(object.get("force_user"), Some(&Value::from("nobody")));
        assert!(!object.contains_key("extra"));
    }

    #[test]
    fn test_export_mode_flags() {
        assert!(!ExportMode::No.is_exported());
        assert!(ExportMode::Hidden.is_hidden());
        assert!(ExportMode::TimeMachineHidden.is_time_machine());
        assert!(ExportMode::TimeMachineHidden.is_hidden());
        assert!(!ExportMode::TimeMachine.is_hidden());
        assert_eq!(ExportMode::parse("eth"), Some(ExportMode::TimeMachineHidden));
        assert_eq!(ExportMode::parse("x"), None);
    }

    #[test]
    fn test_security_mode_parsing() {
        assert_eq!(SecurityMode::parse("private"), Some(SecurityMode::Private));
        assert_eq!(SecurityMode::parse("SECURE"), Some(SecurityMode::Secure));
        assert_eq!(SecurityMode::parse("guest"), None);
    }

    #[test]
    fn test_enable_disable() {
        let mut share = ShareRecord::new("Media", "/mnt/user/media");
        share.disable();
        assert!(!share.enabled);
        share.enable();
        assert!(share.enabled);
    }
}
