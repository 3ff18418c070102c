//! JSON wire shapes exchanged with viewers.
//!
//! ## Inbound
//!
//! ```json
//! {"type": "MOVE", "move": {"from": "f5", "to": "f6"}}
//! {"type": "FORFEIT"}
//! ```
//!
//! ## Outbound
//!
//! Every outbound message carries a `type` tag. `JOIN`, `MOVE` and
//! `FORFEIT` carry the session snapshot after the change; `ERROR` carries
//! only a message and goes to the offending viewer alone.

use serde::{Deserialize, Serialize};

use crate::core::{Move, Player};
use crate::error::DuelError;

/// A move in notation form, as it travels over the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePayload {
    pub from: String,
    pub to: String,
}

impl MovePayload {
    /// Parse both ends into a `Move`.
    pub fn to_move(&self) -> Result<Move, DuelError> {
        Move::parse(&self.from, &self.to)
    }
}

impl From<Move> for MovePayload {
    fn from(mv: Move) -> Self {
        Self {
            from: mv.from.to_string(),
            to: mv.to.to_string(),
        }
    }
}

/// Commands a viewer may send.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundCommand {
    Move {
        #[serde(rename = "move")]
        mv: MovePayload,
    },
    Forfeit,
}

impl InboundCommand {
    /// Parse a raw text frame.
    ///
    /// Malformed JSON and unknown types are `InvalidCommand`.
    pub fn parse(raw: &str) -> Result<Self, DuelError> {
        serde_json::from_str(raw).map_err(|err| DuelError::InvalidCommand {
            reason: err.to_string(),
        })
    }
}

/// Board as sent to viewers: turn as 1 (white) or 0 (black), raw piece
/// bytes per file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub turn: u8,
    pub pieces: Vec<Vec<u8>>,
}

/// Externally visible session state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: String,
    pub board: BoardSnapshot,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub white_player: Option<Player>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub black_player: Option<Player>,
    pub ended: bool,
    /// Winning colour, wire-encoded, once the session has ended.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub winner: Option<u8>,
}

/// Messages pushed to viewers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundMessage {
    Join {
        player: Player,
        session: SessionSnapshot,
    },
    Move {
        #[serde(rename = "move")]
        mv: MovePayload,
        session: SessionSnapshot,
    },
    Forfeit {
        session: SessionSnapshot,
    },
    Error {
        message: String,
    },
}

impl OutboundMessage {
    pub fn error(message: impl Into<String>) -> Self {
        OutboundMessage::Error {
            message: message.into(),
        }
    }

    /// Encode as a JSON text frame.
    pub fn to_json(&self) -> Result<String, DuelError> {
        serde_json::to_string(self).map_err(|source| DuelError::Encoding { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            id: "duel-1".into(),
            board: BoardSnapshot {
                turn: 1,
                pieces: vec![vec![0; 6]; 11],
            },
            white_player: Some(Player::new("p1", "Alice")),
            black_player: None,
            ended: false,
            winner: None,
        }
    }

    #[test]
    fn test_parse_move_command() {
        let cmd = InboundCommand::parse(r#"{"type":"MOVE","move":{"from":"f5","to":"f6"}}"#).unwrap();
        let InboundCommand::Move { mv } = cmd else {
            panic!("expected a move command");
        };
        assert_eq!(mv.to_move().unwrap(), Move::parse("f5", "f6").unwrap());
    }

    #[test]
    fn test_parse_forfeit_command() {
        let cmd = InboundCommand::parse(r#"{"type":"FORFEIT"}"#).unwrap();
        assert_eq!(cmd, InboundCommand::Forfeit);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "{}", r#"{"type":"CASTLE"}"#, r#"{"type":"MOVE"}"#, "not json"] {
            let err = InboundCommand::parse(raw).unwrap_err();
            assert!(matches!(err, DuelError::InvalidCommand { .. }), "{raw}");
        }
    }

    #[test]
    fn test_bad_notation_surfaces_on_conversion() {
        let cmd = InboundCommand::parse(r#"{"type":"MOVE","move":{"from":"z1","to":"f6"}}"#).unwrap();
        let InboundCommand::Move { mv } = cmd else {
            panic!("expected a move command");
        };
        assert!(matches!(mv.to_move(), Err(DuelError::InvalidNotation { .. })));
    }

    #[test]
    fn test_snapshot_wire_shape() {
        let value = serde_json::to_value(snapshot()).unwrap();
        assert_eq!(value["whitePlayer"], json!({"id": "p1", "name": "Alice"}));
        assert!(value.get("blackPlayer").is_none());
        assert!(value.get("winner").is_none());
        assert_eq!(value["board"]["turn"], json!(1));
        assert_eq!(value["board"]["pieces"].as_array().unwrap().len(), 11);
        assert_eq!(value["ended"], json!(false));
    }

    #[test]
    fn test_outbound_move_shape() {
        let msg = OutboundMessage::Move {
            mv: Move::parse("f5", "f6").unwrap().into(),
            session: snapshot(),
        };
        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], json!("MOVE"));
        assert_eq!(value["move"], json!({"from": "f5", "to": "f6"}));
        assert_eq!(value["session"]["id"], json!("duel-1"));
    }

    #[test]
    fn test_outbound_error_shape() {
        let json = OutboundMessage::error("not your turn").to_json().unwrap();
        assert_eq!(json, r#"{"type":"ERROR","message":"not your turn"}"#);
    }

    #[test]
    fn test_outbound_roundtrip() {
        let msg = OutboundMessage::Join {
            player: Player::new("p2", "Bob"),
            session: snapshot(),
        };
        let back: OutboundMessage = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(back, msg);
    }
}
