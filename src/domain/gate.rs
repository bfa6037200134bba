//! Gate identifiers, actions and their fixed MQTT topic/payload mapping.
//!
//! Each gate is a physical actuator addressed by a fixed topic string.
//! The mapping is static on purpose: the receivers in the field subscribe
//! to hardcoded topics and expect hardcoded payload tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The known gates. Anything else is rejected before reaching the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GateId {
    Gate1,
    Gate2,
    Externo,
    Interno,
}

/// Open/close command for a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GateAction {
    Open,
    Close,
}

impl GateId {
    pub const ALL: [GateId; 4] = [GateId::Gate1, GateId::Gate2, GateId::Externo, GateId::Interno];

    pub fn as_str(&self) -> &'static str {
        match self {
            GateId::Gate1 => "gate1",
            GateId::Gate2 => "gate2",
            GateId::Externo => "externo",
            GateId::Interno => "interno",
        }
    }

    /// Control topic for this gate.
    ///
    /// Externo/interno are cross-wired to the gate4/gate3 receivers in the
    /// field, so the mapping is intentionally inverted.
    pub fn topic(&self) -> &'static str {
        match self {
            GateId::Gate1 => "gates/gate1/control",
            GateId::Gate2 => "gates/gate2/control",
            GateId::Externo => "gates/gate4/control",
            GateId::Interno => "gates/gate3/control",
        }
    }

    /// Payload token for an action on this gate.
    ///
    /// The gate1/gate2 receivers expect textual tokens, the externo/interno
    /// receivers a single character.
    pub fn payload(&self, action: GateAction) -> &'static str {
        match self {
            GateId::Gate1 | GateId::Gate2 => match action {
                GateAction::Open => "turn_on",
                GateAction::Close => "turn_off",
            },
            GateId::Externo | GateId::Interno => match action {
                GateAction::Open => "1",
                GateAction::Close => "0",
            },
        }
    }
}

impl GateAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateAction::Open => "open",
            GateAction::Close => "close",
        }
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for GateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GateId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gate1" => Ok(GateId::Gate1),
            "gate2" => Ok(GateId::Gate2),
            "externo" => Ok(GateId::Externo),
            "interno" => Ok(GateId::Interno),
            _ => Err(()),
        }
    }
}

impl FromStr for GateAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(GateAction::Open),
            "close" => Ok(GateAction::Close),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_mapping_is_inverted_for_externo_interno() {
        assert_eq!(GateId::Externo.topic(), "gates/gate4/control");
        assert_eq!(GateId::Interno.topic(), "gates/gate3/control");
        assert_eq!(GateId::Gate1.topic(), "gates/gate1/control");
        assert_eq!(GateId::Gate2.topic(), "gates/gate2/control");
    }

    #[test]
    fn payload_tokens_per_receiver_family() {
        assert_eq!(GateId::Gate1.payload(GateAction::Open), "turn_on");
        assert_eq!(GateId::Gate2.payload(GateAction::Close), "turn_off");
        assert_eq!(GateId::Externo.payload(GateAction::Open), "1");
        assert_eq!(GateId::Interno.payload(GateAction::Close), "0");
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert!("gate3".parse::<GateId>().is_err());
        assert!("".parse::<GateId>().is_err());
        assert!("toggle".parse::<GateAction>().is_err());
        assert_eq!("externo".parse::<GateId>(), Ok(GateId::Externo));
        assert_eq!("open".parse::<GateAction>(), Ok(GateAction::Open));
    }
}
