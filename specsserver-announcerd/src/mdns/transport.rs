use std::collections::HashMap;
use std::net::IpAddr;

use anyhow::{Context, Result};
use mdns_sd::{ServiceDaemon, ServiceInfo};

use shared::protocol::{HTTP_SERVICE_TYPE, TXT_PATH};
use shared::types::ServiceRecord;
use crate::error::AnnounceError;

/// Wire-protocol seam for the announcer. `advertise` hands back the
/// fullname that `withdraw` later takes, mirroring how mdns-sd keys
/// unregistration on `ServiceInfo::get_fullname`.
pub trait AnnounceTransport {
    fn advertise(&self, record: &ServiceRecord) -> Result<String, AnnounceError>;
    fn withdraw(&self, fullname: &str) -> Result<(), AnnounceError>;
}

/// Production transport over the mdns-sd responder daemon. Probing,
/// periodic re-announcement, and goodbye packets are the daemon's job;
/// this type only maps records and errors.
pub struct MdnsTransport {
    daemon: ServiceDaemon,
}

impl MdnsTransport {
    pub fn new() -> Result<Self> {
        let daemon = ServiceDaemon::new().context("Failed to create mDNS daemon")?;
        Ok(Self { daemon })
    }

    /// Stop the responder daemon itself, after the announcement has been
    /// withdrawn.
    pub fn shutdown(self) -> Result<()> {
        self.daemon
            .shutdown()
            .context("Failed to shut down mDNS daemon")?;
        Ok(())
    }
}

impl AnnounceTransport for MdnsTransport {
    fn advertise(&self, record: &ServiceRecord) -> Result<String, AnnounceError> {
        let bind_conflict = |reason: String| AnnounceError::BindConflict {
            hostname: record.hostname.clone(),
            address: record.address,
            reason,
        };

        // Announcing an address no local interface carries would hand out
        // an unreachable mapping; refuse before touching the network.
        let interfaces = local_ip_address::list_afinet_netifas()
            .map_err(|e| bind_conflict(format!("cannot enumerate local interfaces: {}", e)))?;
        let locally_assigned = interfaces
            .iter()
            .any(|(_, addr)| *addr == IpAddr::V4(record.address));
        if !locally_assigned {
            return Err(bind_conflict(
                "address is not assigned to any local interface".to_string(),
            ));
        }

        let txt_records = HashMap::from([(TXT_PATH.to_string(), record.path.clone())]);

        let service_info = ServiceInfo::new(
            HTTP_SERVICE_TYPE,
            &record.label,
            &record.hostname,
            &record.address.to_string(),
            record.port,
            txt_records,
        )
        .map_err(|e| bind_conflict(e.to_string()))?;

        let fullname = service_info.get_fullname().to_string();

        self.daemon
            .register(service_info)
            .map_err(|e| bind_conflict(e.to_string()))?;

        Ok(fullname)
    }

    fn withdraw(&self, fullname: &str) -> Result<(), AnnounceError> {
        self.daemon
            .unregister(fullname)
            .map_err(|e| AnnounceError::Withdrawal {
                fullname: fullname.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}
