//! Gate command dispatch.
//!
//! Maps a validated (gate, action) pair onto its fixed topic/payload,
//! hands it to the broker client and appends one audit record. Delivery is
//! best-effort at-most-once: a failed publish is logged to process output
//! and nothing else — no retry, no user-visible failure.

use std::sync::Arc;

use metrics::counter;
use tracing::{error, info};

use crate::domain::{DomainResult, GateAction, GateId, LogRepositoryInterface, NewLogEntry};
use crate::infrastructure::mqtt::CommandPublisher;

/// Result of a dispatched command, for the API response.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub gate: GateId,
    pub action: GateAction,
    pub topic: &'static str,
    pub payload: &'static str,
    /// Audit text, e.g. "Gate externo open".
    pub command: String,
}

/// Gate service — publishes control messages and writes the audit trail.
pub struct GateService<L: LogRepositoryInterface> {
    publisher: Arc<dyn CommandPublisher>,
    logs: Arc<L>,
}

impl<L: LogRepositoryInterface> GateService<L> {
    pub fn new(publisher: Arc<dyn CommandPublisher>, logs: Arc<L>) -> Self {
        Self { publisher, logs }
    }

    /// Dispatch a command on behalf of a user. Exactly one audit record is
    /// appended per call; the record documents the command issued, not its
    /// delivery.
    pub async fn dispatch(
        &self,
        gate: GateId,
        action: GateAction,
        user_id: &str,
        username: &str,
    ) -> DomainResult<DispatchOutcome> {
        let topic = gate.topic();
        let payload = gate.payload(action);

        if let Err(e) = self.publisher.publish(topic, payload).await {
            error!("Failed to publish to {}: {}", topic, e);
        } else {
            info!(%gate, %action, topic, payload, username, "Gate command published");
        }

        counter!(
            "gate_commands_total",
            "gate" => gate.as_str(),
            "action" => action.as_str()
        )
        .increment(1);

        let command = format!("Gate {} {}", gate, action);
        self.logs
            .append(NewLogEntry {
                user_id: user_id.to_string(),
                username: username.to_string(),
                command: command.clone(),
            })
            .await?;

        Ok(DispatchOutcome {
            gate,
            action,
            topic,
            payload,
            command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, LogEntry, PaginatedResult};
    use crate::infrastructure::mqtt::MqttError;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    struct RecordingPublisher {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl RecordingPublisher {
        fn new(fail: bool) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl CommandPublisher for RecordingPublisher {
        async fn publish(&self, topic: &str, payload: &str) -> Result<(), MqttError> {
            if self.fail {
                return Err(MqttError::Publish("broker unreachable".into()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((topic.to_string(), payload.to_string()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemLogRepo {
        entries: Mutex<Vec<LogEntry>>,
    }

    #[async_trait]
    impl LogRepositoryInterface for MemLogRepo {
        async fn append(&self, entry: NewLogEntry) -> Result<LogEntry, DomainError> {
            let mut entries = self.entries.lock().unwrap();
            let stored = LogEntry {
                id: entries.len() as i32 + 1,
                user_id: entry.user_id,
                username: entry.username,
                command: entry.command,
                timestamp: Utc::now(),
            };
            entries.push(stored.clone());
            Ok(stored)
        }

        async fn list(
            &self,
            _page: u32,
            _page_size: u32,
        ) -> Result<PaginatedResult<LogEntry>, DomainError> {
            let entries = self.entries.lock().unwrap().clone();
            let total = entries.len() as u64;
            Ok(PaginatedResult::new(entries, total, 1, 100))
        }
    }

    #[tokio::test]
    async fn dispatch_publishes_and_audits_once() {
        let publisher = Arc::new(RecordingPublisher::new(false));
        let logs = Arc::new(MemLogRepo::default());
        let svc = GateService::new(publisher.clone(), logs.clone());

        let outcome = svc
            .dispatch(GateId::Externo, GateAction::Open, "u1", "joao")
            .await
            .unwrap();

        assert_eq!(outcome.topic, "gates/gate4/control");
        assert_eq!(outcome.payload, "1");
        assert_eq!(outcome.command, "Gate externo open");

        let sent = publisher.sent.lock().unwrap().clone();
        assert_eq!(sent, vec![("gates/gate4/control".into(), "1".into())]);

        let entries = logs.entries.lock().unwrap().clone();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_id, "u1");
        assert_eq!(entries[0].username, "joao");
        assert_eq!(entries[0].command, "Gate externo open");
    }

    #[tokio::test]
    async fn publish_failure_is_swallowed_but_still_audited() {
        let publisher = Arc::new(RecordingPublisher::new(true));
        let logs = Arc::new(MemLogRepo::default());
        let svc = GateService::new(publisher, logs.clone());

        let outcome = svc
            .dispatch(GateId::Gate1, GateAction::Close, "u2", "maria")
            .await
            .unwrap();

        assert_eq!(outcome.payload, "turn_off");
        assert_eq!(logs.entries.lock().unwrap().len(), 1);
    }
}
