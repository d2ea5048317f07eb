use tokio_util::sync::CancellationToken;

use shared::types::ServiceRecord;
use crate::error::AnnounceError;
use crate::mdns::transport::AnnounceTransport;

/// Lifecycle of a single announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncerState {
    Idle,
    Announcing,
    Withdrawn,
}

/// Owns one [`ServiceRecord`] and keeps its announcement alive.
///
/// One announcement per value; `Withdrawn` is terminal. The transitions
/// take `&mut self`, so start/stop cannot race from multiple threads.
pub struct Announcer<T: AnnounceTransport> {
    transport: T,
    record: ServiceRecord,
    state: AnnouncerState,
    fullname: Option<String>,
}

impl<T: AnnounceTransport> Announcer<T> {
    pub fn new(transport: T, record: ServiceRecord) -> Self {
        Self {
            transport,
            record,
            state: AnnouncerState::Idle,
            fullname: None,
        }
    }

    pub fn state(&self) -> AnnouncerState {
        self.state
    }

    /// Register the record with the multicast group.
    ///
    /// If the transport refuses, the state never leaves `Idle` and the
    /// error is surfaced to the caller. A second `start` on a live
    /// announcement is rejected rather than silently re-announcing.
    pub fn start(&mut self) -> Result<(), AnnounceError> {
        match self.state {
            AnnouncerState::Idle => {
                let fullname = self.transport.advertise(&self.record)?;
                tracing::info!(
                    "Registered {} -> {}:{} as {}",
                    self.record.hostname,
                    self.record.address,
                    self.record.port,
                    fullname
                );
                self.fullname = Some(fullname);
                self.state = AnnouncerState::Announcing;
                Ok(())
            }
            AnnouncerState::Announcing => Err(AnnounceError::AlreadyAnnouncing(
                self.record.hostname.clone(),
            )),
            AnnouncerState::Withdrawn => Err(AnnounceError::AlreadyWithdrawn(
                self.record.hostname.clone(),
            )),
        }
    }

    /// Withdraw the announcement. Idempotent: only a live announcement
    /// sends a goodbye. A failed goodbye is logged and not escalated;
    /// nothing can be done about it this late in the lifecycle.
    pub fn stop(&mut self) {
        if self.state != AnnouncerState::Announcing {
            return;
        }
        if let Some(fullname) = self.fullname.take() {
            match self.transport.withdraw(&fullname) {
                Ok(()) => tracing::info!("Unregistered {}", fullname),
                Err(e) => tracing::warn!("Best-effort withdrawal failed: {}", e),
            }
        }
        self.state = AnnouncerState::Withdrawn;
    }

    /// Park until the token fires, then withdraw exactly once.
    pub async fn run_until_cancelled(&mut self, cancel: CancellationToken) {
        cancel.cancelled().await;
        tracing::info!("Interrupt received, withdrawing {}", self.record.hostname);
        self.stop();
    }

    /// Hand the transport back for teardown once the lifecycle is over.
    pub fn into_transport(self) -> T {
        self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::net::Ipv4Addr;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Packet {
        Announce { hostname: String, address: Ipv4Addr },
        Goodbye { fullname: String },
    }

    /// Records what would have gone out on the wire, plus the set of
    /// registrations that have not been withdrawn yet.
    #[derive(Clone, Default)]
    struct FakeTransport {
        packets: Arc<Mutex<Vec<Packet>>>,
        active: Arc<Mutex<HashSet<String>>>,
        reject_advertise: bool,
    }

    impl FakeTransport {
        fn packets(&self) -> Vec<Packet> {
            self.packets.lock().unwrap().clone()
        }

        fn active_count(&self) -> usize {
            self.active.lock().unwrap().len()
        }

        fn goodbye_count(&self) -> usize {
            self.packets()
                .iter()
                .filter(|p| matches!(p, Packet::Goodbye { .. }))
                .count()
        }
    }

    impl AnnounceTransport for FakeTransport {
        fn advertise(&self, record: &ServiceRecord) -> Result<String, AnnounceError> {
            if self.reject_advertise {
                return Err(AnnounceError::BindConflict {
                    hostname: record.hostname.clone(),
                    address: record.address,
                    reason: "address is not assigned to any local interface".to_string(),
                });
            }
            let fullname = format!("{}._http._tcp.local.", record.label);
            self.packets.lock().unwrap().push(Packet::Announce {
                hostname: record.hostname.clone(),
                address: record.address,
            });
            self.active.lock().unwrap().insert(fullname.clone());
            Ok(fullname)
        }

        fn withdraw(&self, fullname: &str) -> Result<(), AnnounceError> {
            self.packets.lock().unwrap().push(Packet::Goodbye {
                fullname: fullname.to_string(),
            });
            self.active.lock().unwrap().remove(fullname);
            Ok(())
        }
    }

    fn test_record() -> ServiceRecord {
        ServiceRecord::new("specsserver", Ipv4Addr::new(192, 168, 1, 42), 80).unwrap()
    }

    #[test]
    fn test_start_then_stop_round_trip() {
        let transport = FakeTransport::default();
        let mut announcer = Announcer::new(transport.clone(), test_record());

        announcer.start().unwrap();
        assert_eq!(announcer.state(), AnnouncerState::Announcing);
        assert_eq!(
            transport.packets(),
            vec![Packet::Announce {
                hostname: "specsserver.local.".to_string(),
                address: Ipv4Addr::new(192, 168, 1, 42),
            }]
        );

        announcer.stop();
        assert_eq!(announcer.state(), AnnouncerState::Withdrawn);
        assert_eq!(transport.goodbye_count(), 1);
        assert_eq!(
            transport.active_count(),
            0,
            "no registration may outlive stop"
        );
    }

    #[test]
    fn test_stop_is_idempotent() {
        let transport = FakeTransport::default();
        let mut announcer = Announcer::new(transport.clone(), test_record());

        announcer.start().unwrap();
        announcer.stop();
        announcer.stop();

        assert_eq!(announcer.state(), AnnouncerState::Withdrawn);
        assert_eq!(transport.goodbye_count(), 1, "second stop must not re-send the goodbye");
    }

    #[test]
    fn test_double_start_rejected() {
        let transport = FakeTransport::default();
        let mut announcer = Announcer::new(transport.clone(), test_record());

        announcer.start().unwrap();
        let err = announcer.start().unwrap_err();

        assert!(matches!(err, AnnounceError::AlreadyAnnouncing(_)));
        assert_eq!(announcer.state(), AnnouncerState::Announcing);
        assert_eq!(transport.packets().len(), 1, "no silent re-announce");
    }

    #[test]
    fn test_start_after_withdraw_rejected() {
        let transport = FakeTransport::default();
        let mut announcer = Announcer::new(transport, test_record());

        announcer.start().unwrap();
        announcer.stop();
        let err = announcer.start().unwrap_err();

        assert!(matches!(err, AnnounceError::AlreadyWithdrawn(_)));
        assert_eq!(announcer.state(), AnnouncerState::Withdrawn);
    }

    #[test]
    fn test_rejected_advertise_stays_idle() {
        let transport = FakeTransport {
            reject_advertise: true,
            ..FakeTransport::default()
        };
        let mut announcer = Announcer::new(transport.clone(), test_record());

        let err = announcer.start().unwrap_err();

        assert!(matches!(err, AnnounceError::BindConflict { .. }));
        assert_eq!(announcer.state(), AnnouncerState::Idle);
        assert!(transport.packets().is_empty());
    }

    #[test]
    fn test_stop_before_start_sends_nothing() {
        let transport = FakeTransport::default();
        let mut announcer = Announcer::new(transport.clone(), test_record());

        announcer.stop();

        assert_eq!(announcer.state(), AnnouncerState::Idle);
        assert!(transport.packets().is_empty());
    }

    #[tokio::test]
    async fn test_interrupt_reaches_stop_exactly_once() {
        let transport = FakeTransport::default();
        let mut announcer = Announcer::new(transport.clone(), test_record());
        announcer.start().unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        announcer.run_until_cancelled(cancel).await;

        assert_eq!(announcer.state(), AnnouncerState::Withdrawn);
        assert_eq!(transport.goodbye_count(), 1);

        // a late second stop must not double-send
        announcer.stop();
        assert_eq!(transport.goodbye_count(), 1);
    }
}
