//! Gate DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::DispatchOutcome;
use crate::domain::GateId;

/// A controllable gate
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GateDto {
    /// Gate identifier used in the dispatch URL
    pub id: String,
    /// MQTT control topic the gate's controller listens on
    pub topic: String,
}

impl From<GateId> for GateDto {
    fn from(gate: GateId) -> Self {
        Self {
            id: gate.as_str().to_string(),
            topic: gate.topic().to_string(),
        }
    }
}

/// Result of a dispatched gate command
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DispatchDto {
    pub gate: String,
    pub action: String,
    pub topic: String,
    pub payload: String,
    /// Audit text as recorded, e.g. "Gate externo open"
    pub command: String,
}

impl From<DispatchOutcome> for DispatchDto {
    fn from(o: DispatchOutcome) -> Self {
        Self {
            gate: o.gate.as_str().to_string(),
            action: o.action.as_str().to_string(),
            topic: o.topic.to_string(),
            payload: o.payload.to_string(),
            command: o.command,
        }
    }
}
