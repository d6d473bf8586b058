// ABOUTME: Identity labels of the form [proto://][user@]host[:port][/path].
// ABOUTME: Parses labels into Identity records and renders their canonical string.

use crate::error::{HwsshError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static IDENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^",
        r"(?:(?P<proto>.*)://)?",
        r"(?:(?P<user>.*)@)?",
        r"(?P<host>.*?)",
        r"(?::(?P<port>\w*))?",
        r"(?P<path>/.*)?",
        r"$",
    ))
    .expect("identity pattern is valid")
});

/// The remote service/account a derived key is bound to.
///
/// Absent components are `None`, never empty strings. `index` is not part of
/// the label grammar; it selects between several keys for the same label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Identity {
    pub proto: Option<String>,
    pub user: Option<String>,
    pub host: String,
    pub port: Option<String>,
    pub path: Option<String>,
    pub index: u32,
}

impl Identity {
    /// Create an identity with only a host set.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Parse a label using the `[proto://][user@]host[:port][/path]` grammar.
    ///
    /// A label without separators is taken to be a bare host. One trailing
    /// newline is ignored, so labels read line by line parse as typed.
    ///
    /// # Errors
    /// Returns `HwsshError::InvalidIdentity` if the label does not match the
    /// grammar or leaves the host empty.
    pub fn parse(label: &str) -> Result<Self> {
        let caps = IDENTITY_RE
            .captures(label.strip_suffix('\n').unwrap_or(label))
            .ok_or_else(|| HwsshError::InvalidIdentity {
                label: label.to_string(),
                reason: "does not match [proto://][user@]host[:port][/path]".to_string(),
            })?;

        let field = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let host = field("host").ok_or_else(|| HwsshError::InvalidIdentity {
            label: label.to_string(),
            reason: "missing host".to_string(),
        })?;

        let identity = Self {
            proto: field("proto"),
            user: field("user"),
            host,
            port: field("port"),
            path: field("path"),
            index: 0,
        };
        tracing::debug!(?identity, "parsed identity");
        Ok(identity)
    }

    /// Set the key index.
    pub fn with_index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }

    /// Set the protocol component.
    pub fn with_proto(mut self, proto: impl Into<String>) -> Self {
        self.proto = Some(proto.into());
        self
    }

    /// Render the canonical label: present fields in the order proto, user,
    /// host, port, path.
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        if let Some(proto) = &self.proto {
            out.push_str(proto);
            out.push_str("://");
        }
        if let Some(user) = &self.user {
            out.push_str(user);
            out.push('@');
        }
        out.push_str(&self.host);
        if let Some(port) = &self.port {
            out.push(':');
            out.push_str(port);
        }
        if let Some(path) = &self.path {
            out.push_str(path);
        }
        out
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for Identity {
    type Err = HwsshError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_label() {
        let id = Identity::parse("ssh://alice@git.example.com:22/repo").expect("should parse");

        assert_eq!(id.proto.as_deref(), Some("ssh"));
        assert_eq!(id.user.as_deref(), Some("alice"));
        assert_eq!(id.host, "git.example.com");
        assert_eq!(id.port.as_deref(), Some("22"));
        assert_eq!(id.path.as_deref(), Some("/repo"));
        assert_eq!(id.index, 0);
    }

    #[test]
    fn test_full_label_canonicalizes_to_itself() {
        let label = "ssh://alice@git.example.com:22/repo";
        let id = Identity::parse(label).expect("should parse");
        assert_eq!(id.canonical(), label);
        assert_eq!(id.to_string(), label);
    }

    #[test]
    fn test_single_trailing_newline_is_ignored() {
        let id = Identity::parse("host\n").expect("should parse");
        assert_eq!(id, Identity::new("host"));

        let id = Identity::parse("ssh://a@h:22/p\n").expect("should parse");
        assert_eq!(id.port.as_deref(), Some("22"));
        assert_eq!(id.path.as_deref(), Some("/p"));
        assert_eq!(id.canonical(), "ssh://a@h:22/p");
    }

    #[test]
    fn test_bare_host() {
        let id = Identity::parse("example.com").expect("should parse");
        assert_eq!(id, Identity::new("example.com"));
    }

    #[test]
    fn test_user_and_host() {
        let id = Identity::parse("bob@server").expect("should parse");
        assert_eq!(id.user.as_deref(), Some("bob"));
        assert_eq!(id.host, "server");
        assert!(id.proto.is_none());
        assert!(id.port.is_none());
        assert!(id.path.is_none());
    }

    #[test]
    fn test_host_and_path_without_port() {
        let id = Identity::parse("server/some/path").expect("should parse");
        assert_eq!(id.host, "server");
        assert_eq!(id.path.as_deref(), Some("/some/path"));
        assert!(id.port.is_none());
    }

    #[test]
    fn test_empty_components_are_unset() {
        // An empty port or user collapses to None rather than ""
        let id = Identity::parse("@server:").expect("should parse");
        assert!(id.user.is_none());
        assert!(id.port.is_none());
        assert_eq!(id.host, "server");
        assert_eq!(id.canonical(), "server");
    }

    #[test]
    fn test_greedy_user_takes_last_at() {
        let id = Identity::parse("a@b@host").expect("should parse");
        assert_eq!(id.user.as_deref(), Some("a@b"));
        assert_eq!(id.host, "host");
    }

    #[test]
    fn test_non_word_port_stays_in_host() {
        let id = Identity::parse("host:22-x").expect("should parse");
        assert_eq!(id.host, "host:22-x");
        assert!(id.port.is_none());
    }

    #[test]
    fn test_empty_label_rejected() {
        let err = Identity::parse("").unwrap_err();
        assert!(matches!(err, HwsshError::InvalidIdentity { .. }));
    }

    #[test]
    fn test_label_without_host_rejected() {
        let err = Identity::parse("ssh://alice@:22/repo").unwrap_err();
        assert!(matches!(err, HwsshError::InvalidIdentity { .. }));
    }

    #[test]
    fn test_newline_rejected() {
        assert!(Identity::parse("host\nother").is_err());
        assert!(Identity::parse("host\n\n").is_err());
    }

    #[test]
    fn test_canonicalization_is_idempotent() {
        let labels = [
            "ssh://alice@git.example.com:22/repo",
            "example.com",
            "bob@server",
            "server:2222",
            "https://satoshi@bitcoin.org/login",
            "@server:",
            "a@b@host",
            "proto://host/path:with:colons",
        ];
        for label in labels {
            let first = Identity::parse(label).expect("should parse");
            let second = Identity::parse(&first.canonical()).expect("should reparse");
            assert_eq!(first, second, "canonicalization of {label:?} should be stable");
        }
    }

    #[test]
    fn test_identity_to_string_roundtrip() {
        let id = Identity {
            proto: Some("ssh".to_string()),
            user: Some("git".to_string()),
            host: "github.com".to_string(),
            port: Some("443".to_string()),
            path: Some("/org".to_string()),
            index: 0,
        };
        let parsed: Identity = id.canonical().parse().expect("should parse");
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_builders() {
        let id = Identity::parse("alice@host")
            .expect("should parse")
            .with_proto("ssh")
            .with_index(3);
        assert_eq!(id.canonical(), "ssh://alice@host");
        assert_eq!(id.index, 3);
    }
}
