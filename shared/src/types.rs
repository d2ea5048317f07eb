use std::net::Ipv4Addr;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::protocol::{DEFAULT_PATH, LOCAL_DOMAIN};

/// Reasons a [`ServiceRecord`] cannot be constructed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("host label must be a single non-empty DNS label, got {0:?}")]
    InvalidLabel(String),

    #[error("port 0 is not announceable")]
    ZeroPort,
}

/// The name-to-address mapping this system announces.
/// This is the canonical data model shared by the announcer daemon and
/// anything that reasons about what was advertised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Single DNS label, e.g. "specsserver"
    pub label: String,

    /// Fully-qualified hostname, e.g. "specsserver.local."
    pub hostname: String,

    /// IPv4 address the hostname should resolve to
    pub address: Ipv4Addr,

    /// Port of the companion HTTP service (advisory SRV/TXT metadata)
    pub port: u16,

    /// HTTP path advertised in the TXT record
    pub path: String,
}

impl ServiceRecord {
    /// Build a record for `<label>.local.` pointing at `address:port`.
    ///
    /// The label must be a single LDH label (letters, digits, hyphens);
    /// the port must be nonzero. Uniqueness of the resulting hostname on
    /// the multicast domain is not checked here.
    pub fn new(label: &str, address: Ipv4Addr, port: u16) -> Result<Self, RecordError> {
        if !is_valid_label(label) {
            return Err(RecordError::InvalidLabel(label.to_string()));
        }
        if port == 0 {
            return Err(RecordError::ZeroPort);
        }

        Ok(Self {
            label: label.to_string(),
            hostname: format!("{}.{}", label, LOCAL_DOMAIN),
            address,
            port,
            path: DEFAULT_PATH.to_string(),
        })
    }
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !label.starts_with('-')
        && !label.ends_with('-')
}

/// Health payload served by the companion HTTP daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStatus {
    /// Always "ok" while the server is able to answer at all
    pub status: String,

    /// Hostname the operator announced, e.g. "specsserver.local"
    pub hostname: String,

    /// System hostname of the machine actually serving
    pub machine: String,

    /// When this server process started
    pub started_at: DateTime<Utc>,

    /// Seconds since startup
    pub uptime_secs: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builds_local_hostname() {
        let record = ServiceRecord::new("specsserver", Ipv4Addr::new(192, 168, 1, 42), 80).unwrap();

        assert_eq!(record.hostname, "specsserver.local.");
        assert_eq!(record.address, Ipv4Addr::new(192, 168, 1, 42));
        assert_eq!(record.port, 80);
        assert_eq!(record.path, "/");
    }

    #[test]
    fn test_multi_label_name_rejected() {
        let err = ServiceRecord::new("specs.server", Ipv4Addr::LOCALHOST, 80).unwrap_err();
        assert_eq!(err, RecordError::InvalidLabel("specs.server".to_string()));
    }

    #[test]
    fn test_empty_label_rejected() {
        let err = ServiceRecord::new("", Ipv4Addr::LOCALHOST, 80).unwrap_err();
        assert_eq!(err, RecordError::InvalidLabel(String::new()));
    }

    #[test]
    fn test_hyphenated_label_accepted() {
        let record = ServiceRecord::new("specs-server-2", Ipv4Addr::LOCALHOST, 8080).unwrap();
        assert_eq!(record.hostname, "specs-server-2.local.");
    }

    #[test]
    fn test_leading_hyphen_rejected() {
        assert!(ServiceRecord::new("-specsserver", Ipv4Addr::LOCALHOST, 80).is_err());
    }

    #[test]
    fn test_port_zero_rejected() {
        let err = ServiceRecord::new("specsserver", Ipv4Addr::LOCALHOST, 0).unwrap_err();
        assert_eq!(err, RecordError::ZeroPort);
    }
}
