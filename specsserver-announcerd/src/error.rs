use std::net::Ipv4Addr;
use thiserror::Error;

/// Failures in the announcement lifecycle.
#[derive(Debug, Error)]
pub enum AnnounceError {
    /// The requested address is not assigned to a local interface, or the
    /// multicast layer refused the registration. Fatal, never retried.
    #[error("cannot claim {hostname} for {address}: {reason}")]
    BindConflict {
        hostname: String,
        address: Ipv4Addr,
        reason: String,
    },

    #[error("{0} is already being announced")]
    AlreadyAnnouncing(String),

    #[error("announcement for {0} was withdrawn and cannot be restarted")]
    AlreadyWithdrawn(String),

    /// A goodbye packet could not be sent. The process is already on its
    /// way out when this can occur, so callers log it and move on.
    #[error("failed to withdraw {fullname}: {reason}")]
    Withdrawal { fullname: String, reason: String },
}
