//! JSON wire protocol. One object per frame, discriminated by `type`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Card;
use crate::room::snapshot::GameSnapshot;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMsg {
    Create {
        name: String,
    },
    Join {
        code: String,
        name: String,
    },
    Reconnect {
        session_id: Uuid,
    },
    #[serde(rename = "addAI")]
    AddAi {
        #[serde(default)]
        name: Option<String>,
    },
    StartGame,
    CallTrumps {
        suit: String,
    },
    PlayCard {
        card: String,
    },
    PlayAgain,
}

/// Every state-mutating event embeds a fresh [`GameSnapshot`], personalised
/// per recipient, so clients can stay view-stateless.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMsg {
    GameCreated {
        code: String,
        session_id: Uuid,
        state: GameSnapshot,
    },
    Joined {
        code: String,
        session_id: Uuid,
        state: GameSnapshot,
    },
    GameState {
        state: GameSnapshot,
        #[serde(skip_serializing_if = "Option::is_none")]
        is_spectator: Option<bool>,
    },
    PlayerJoined {
        player: String,
        state: GameSnapshot,
    },
    TrumpSelection {
        chooser: String,
        state: GameSnapshot,
    },
    RoundStart {
        state: GameSnapshot,
    },
    CardPlayed {
        player: String,
        card: Card,
        next_player: String,
        state: GameSnapshot,
    },
    TrickComplete {
        state: GameSnapshot,
    },
    TrickWinner {
        winner: String,
        state: GameSnapshot,
    },
    NextTrick {
        state: GameSnapshot,
    },
    RoundEnd {
        trump_caller: String,
        state: GameSnapshot,
    },
    GameOver {
        winner: Option<String>,
        state: GameSnapshot,
    },
    Eliminated,
    PlayAgainSuccess {
        state: GameSnapshot,
    },
    Error {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_tags_match_the_protocol() {
        let msg: ClientMsg = serde_json::from_str(r#"{"type":"create","name":"Alice"}"#).unwrap();
        assert!(matches!(msg, ClientMsg::Create { ref name } if name == "Alice"));

        let msg: ClientMsg =
            serde_json::from_str(r#"{"type":"join","code":"ABCD","name":"Bob"}"#).unwrap();
        assert!(matches!(msg, ClientMsg::Join { .. }));

        let msg: ClientMsg = serde_json::from_str(r#"{"type":"startGame"}"#).unwrap();
        assert!(matches!(msg, ClientMsg::StartGame));

        let msg: ClientMsg = serde_json::from_str(r#"{"type":"callTrumps","suit":"♠"}"#).unwrap();
        assert!(matches!(msg, ClientMsg::CallTrumps { ref suit } if suit == "♠"));

        let msg: ClientMsg = serde_json::from_str(r#"{"type":"playCard","card":"10♠"}"#).unwrap();
        assert!(matches!(msg, ClientMsg::PlayCard { .. }));

        let msg: ClientMsg = serde_json::from_str(r#"{"type":"addAI"}"#).unwrap();
        assert!(matches!(msg, ClientMsg::AddAi { name: None }));

        let msg: ClientMsg = serde_json::from_str(r#"{"type":"playAgain"}"#).unwrap();
        assert!(matches!(msg, ClientMsg::PlayAgain));
    }

    #[test]
    fn reconnect_takes_a_session_token() {
        let id = Uuid::new_v4();
        let raw = format!(r#"{{"type":"reconnect","sessionId":"{id}"}}"#);
        let msg: ClientMsg = serde_json::from_str(&raw).unwrap();
        assert!(matches!(msg, ClientMsg::Reconnect { session_id } if session_id == id));
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(serde_json::from_str::<ClientMsg>(r#"{"type":"fold"}"#).is_err());
    }

    #[test]
    fn error_reply_serialises_message_only() {
        let msg = ServerMsg::Error {
            message: "Not your turn".into(),
        };
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"type":"error","message":"Not your turn"}"#
        );
    }

    #[test]
    fn eliminated_is_a_bare_event() {
        assert_eq!(
            serde_json::to_string(&ServerMsg::Eliminated).unwrap(),
            r#"{"type":"eliminated"}"#
        );
    }
}
