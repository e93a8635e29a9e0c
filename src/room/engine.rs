//! Per-room game engine.
//!
//! One `Room` is owned by one lane task; every mutation happens inline in
//! [`Room::handle`], including the pacing sleeps, so participants never
//! observe half-applied state and queued messages wait out the pauses.

use std::sync::Arc;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::ai::BasicAi;
use crate::domain::{build_shuffled_deck, check_play, Card, Suit, Trick};
use crate::errors::GameError;
use crate::room::handle::RoomCommand;
use crate::room::pacing::Pacing;
use crate::room::participant::Participant;
use crate::room::snapshot::{GameSnapshot, PlayerSummary};
use crate::server::transport::SocketTable;
use crate::ws::protocol::ServerMsg;

pub const MAX_PLAYERS: usize = 21;
pub const STARTING_ROUND: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Waiting,
    CallingTrumps,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct RoomConfig {
    pub pacing: Pacing,
    /// RNG seed for the room (deck shuffles, random trump/starter, caller
    /// tie-breaks). `None` seeds from entropy.
    pub seed: Option<u64>,
}

/// What the lane should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    Continue,
    Teardown,
}

pub struct Room {
    pub(crate) code: String,
    pub(crate) phase: Phase,
    /// Active seats in turn order. Only round boundaries remove entries, so
    /// seat indices stay valid for the whole round.
    pub(crate) players: Vec<Participant>,
    /// Eliminated humans; they keep receiving broadcasts.
    pub(crate) spectators: Vec<Participant>,
    pub(crate) current_round: u8,
    pub(crate) trump_suit: Option<Suit>,
    pub(crate) current_trick: Trick,
    pub(crate) current_player: Option<usize>,
    pub(crate) trick_starter: Option<usize>,
    pub(crate) trump_caller: Option<usize>,
    /// Count of AI seats ever added, for default naming.
    pub(crate) ai_seats: u32,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) pacing: Pacing,
    pub(crate) sockets: Arc<SocketTable>,
}

impl Room {
    pub fn new(code: String, config: RoomConfig, sockets: Arc<SocketTable>) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            code,
            phase: Phase::Waiting,
            players: Vec::new(),
            spectators: Vec::new(),
            current_round: STARTING_ROUND,
            trump_suit: None,
            current_trick: Trick::new(),
            current_player: None,
            trick_starter: None,
            trump_caller: None,
            ai_seats: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            pacing: config.pacing,
            sockets,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Apply one command from the lane. Rejections go back to the
    /// originating socket only; accepted mutations broadcast to the room,
    /// then any run of consecutive AI turns is driven before returning.
    pub async fn handle(&mut self, cmd: RoomCommand) -> RoomStatus {
        match cmd {
            RoomCommand::Join {
                session_id,
                name,
                created,
                reply,
            } => {
                let result = self.handle_join(session_id, &name, created);
                if reply.send(result).is_err() {
                    warn!(code = %self.code, "join reply receiver dropped");
                }
            }
            RoomCommand::Reconnect { session_id } => self.handle_reconnect(session_id),
            RoomCommand::AddAi { session_id, name } => {
                if let Err(err) = self.handle_add_ai(name) {
                    self.send_error(session_id, &err);
                }
            }
            RoomCommand::StartGame { session_id } => match self.handle_start_game() {
                Ok(()) => self.drive_ai().await,
                Err(err) => self.send_error(session_id, &err),
            },
            RoomCommand::CallTrumps { session_id, suit } => {
                match self.handle_call_trumps(session_id, &suit) {
                    Ok(()) => self.drive_ai().await,
                    Err(err) => self.send_error(session_id, &err),
                }
            }
            RoomCommand::PlayCard { session_id, card } => {
                match self.handle_play_card(session_id, &card).await {
                    Ok(()) => self.drive_ai().await,
                    Err(err) => self.send_error(session_id, &err),
                }
            }
            RoomCommand::PlayAgain { session_id } => {
                if let Err(err) = self.handle_play_again() {
                    self.send_error(session_id, &err);
                }
            }
            RoomCommand::Disconnected { session_id } => {
                return self.handle_disconnected(session_id)
            }
        }
        RoomStatus::Continue
    }

    // ---- joining and seating -------------------------------------------

    fn handle_join(
        &mut self,
        session_id: Uuid,
        name: &str,
        created: bool,
    ) -> Result<(), GameError> {
        if self.phase != Phase::Waiting {
            return Err(GameError::RoomAlreadyStarted);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::RoomFull);
        }

        self.players.push(Participant::human(name, session_id));
        let seat = self.players.len() - 1;
        info!(code = %self.code, player = name, seat, "player joined");

        let msg = if created {
            ServerMsg::GameCreated {
                code: self.code.clone(),
                session_id,
                state: self.snapshot(Some(seat)),
            }
        } else {
            ServerMsg::Joined {
                code: self.code.clone(),
                session_id,
                state: self.snapshot(Some(seat)),
            }
        };
        self.sockets.send(session_id, &msg);

        if !created {
            let player = name.to_string();
            self.broadcast_with(|state| ServerMsg::PlayerJoined {
                player: player.clone(),
                state,
            });
        }
        Ok(())
    }

    fn handle_add_ai(&mut self, name: Option<String>) -> Result<(), GameError> {
        if self.phase != Phase::Waiting {
            return Err(GameError::RoomAlreadyStarted);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::RoomFull);
        }

        self.ai_seats += 1;
        let name = name.unwrap_or_else(|| format!("AI {}", self.ai_seats));
        info!(code = %self.code, player = %name, "AI seat added");
        self.players
            .push(Participant::ai(name.clone(), Box::new(BasicAi)));

        self.broadcast_with(|state| ServerMsg::PlayerJoined {
            player: name.clone(),
            state,
        });
        Ok(())
    }

    fn handle_reconnect(&mut self, session_id: Uuid) {
        if let Some(seat) = self.seat_of(session_id) {
            info!(code = %self.code, session_id = %session_id, seat, "player reconnected");
            self.sockets.send(
                session_id,
                &ServerMsg::GameState {
                    state: self.snapshot(Some(seat)),
                    is_spectator: Some(false),
                },
            );
        } else if self
            .spectators
            .iter()
            .any(|p| p.session_id() == Some(session_id))
        {
            info!(code = %self.code, session_id = %session_id, "spectator reconnected");
            self.sockets.send(
                session_id,
                &ServerMsg::GameState {
                    state: self.snapshot(None),
                    is_spectator: Some(true),
                },
            );
        } else {
            self.send_error(session_id, &GameError::InvalidSession);
        }
    }

    fn handle_disconnected(&mut self, session_id: Uuid) -> RoomStatus {
        info!(code = %self.code, session_id = %session_id, "socket dropped");
        let any_live = self
            .players
            .iter()
            .chain(self.spectators.iter())
            .filter_map(|p| p.session_id())
            .any(|sid| self.sockets.is_connected(sid));
        // Mid-game rooms stay alive for reconnects; only an idle lobby or a
        // finished table with nobody attached is torn down.
        if !any_live && matches!(self.phase, Phase::Waiting | Phase::Finished) {
            info!(code = %self.code, "no humans connected, tearing down");
            return RoomStatus::Teardown;
        }
        RoomStatus::Continue
    }

    // ---- round lifecycle -----------------------------------------------

    fn handle_start_game(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::Waiting {
            return Err(GameError::RoomAlreadyStarted);
        }
        if self.players.len() < 2 {
            return Err(GameError::NotEnoughPlayers);
        }
        info!(code = %self.code, players = self.players.len(), "game started");
        self.start_trump_selection();
        Ok(())
    }

    /// Deal the round and either auto-pick trumps (round 7) or hand the
    /// choice to the designated caller.
    fn start_trump_selection(&mut self) {
        self.phase = Phase::CallingTrumps;
        self.trump_suit = None;
        self.deal_cards();

        if self.current_round == STARTING_ROUND {
            // Opening round: the server picks trump and the opening seat.
            let trump = Suit::ALL[self.rng.random_range(0..Suit::ALL.len())];
            let starter = self.rng.random_range(0..self.players.len());
            self.trump_suit = Some(trump);
            self.trick_starter = Some(starter);
            info!(code = %self.code, trump = %trump, starter, "opening round, trump drawn");
            self.start_round();
            return;
        }

        self.broadcast_with(|state| ServerMsg::GameState {
            state,
            is_spectator: None,
        });

        let Some(chooser) = self
            .trump_caller
            .and_then(|seat| self.players.get(seat))
            .map(|p| p.name().to_string())
        else {
            error!(code = %self.code, "no trump caller at round start");
            return;
        };
        info!(code = %self.code, chooser = %chooser, round = self.current_round, "waiting for trumps");
        self.broadcast_with(|state| ServerMsg::TrumpSelection {
            chooser: chooser.clone(),
            state,
        });
    }

    fn deal_cards(&mut self) {
        let mut deck =
            build_shuffled_deck(self.players.len(), self.current_round, &mut self.rng);
        let n = self.current_round as usize;
        for p in &mut self.players {
            let mut hand = deck.split_off(deck.len() - n);
            // Display order: suits D,C,H,S, ranks ascending.
            hand.sort_by_key(|c| (c.suit.display_order(), c.rank));
            *p.hand_mut() = hand;
            p.reset_tricks();
        }
    }

    fn start_round(&mut self) {
        self.phase = Phase::Playing;
        self.current_trick.clear();
        self.current_player = self.trick_starter;
        self.broadcast_with(|state| ServerMsg::RoundStart { state });
    }

    fn handle_call_trumps(&mut self, session_id: Uuid, suit: &str) -> Result<(), GameError> {
        if self.phase != Phase::CallingTrumps {
            return Err(GameError::NotTimeToCallTrumps);
        }
        let seat = self.seat_of(session_id);
        if seat.is_none() || seat != self.trump_caller {
            return Err(GameError::NotYourTurnToCallTrumps);
        }

        let mut glyphs = suit.chars();
        let suit = match (glyphs.next().and_then(Suit::from_glyph), glyphs.next()) {
            (Some(suit), None) => suit,
            _ => return Err(GameError::InvalidSuit),
        };
        self.apply_trump(suit);
        Ok(())
    }

    fn apply_trump(&mut self, suit: Suit) {
        self.trump_suit = Some(suit);
        info!(code = %self.code, trump = %suit, "trumps called");
        self.start_round();
    }

    // ---- trick play ----------------------------------------------------

    async fn handle_play_card(&mut self, session_id: Uuid, card: &str) -> Result<(), GameError> {
        let card: Card = card.parse()?;
        let seat = self.seat_of(session_id);
        self.play(seat, card).await
    }

    /// Validate and apply one play, then run trick completion if this card
    /// filled the trick.
    async fn play(&mut self, seat: Option<usize>, card: Card) -> Result<(), GameError> {
        if self.phase != Phase::Playing {
            return Err(GameError::NotTimeToPlay);
        }
        let Some(seat) = seat else {
            return Err(GameError::NotYourTurn);
        };
        if self.current_player != Some(seat) {
            return Err(GameError::NotYourTurn);
        }
        if self.current_trick.has_played(seat) {
            return Err(GameError::DuplicatePlay);
        }
        let Some(player) = self.players.get_mut(seat) else {
            return Err(GameError::NotYourTurn);
        };
        check_play(player.hand(), &self.current_trick, card)?;

        let Some(card) = player.take_card(card) else {
            return Err(GameError::NotInHand);
        };
        let player_name = player.name().to_string();
        self.current_trick.add_play(seat, card)?;

        let next = (seat + 1) % self.players.len();
        self.current_player = Some(next);
        let next_player = self
            .players
            .get(next)
            .map(|p| p.name().to_string())
            .unwrap_or_default();

        self.broadcast_with(|state| ServerMsg::CardPlayed {
            player: player_name.clone(),
            card,
            next_player: next_player.clone(),
            state,
        });

        if self.current_trick.is_complete(self.players.len()) {
            self.complete_trick().await;
        }
        Ok(())
    }

    async fn complete_trick(&mut self) {
        self.broadcast_with(|state| ServerMsg::TrickComplete { state });

        let Some(trump) = self.trump_suit else {
            error!(code = %self.code, "trick completed with no trump set");
            return;
        };
        let Some(winner) = self.current_trick.winner(trump) else {
            error!(code = %self.code, "trick completed with no plays");
            return;
        };
        if let Some(p) = self.players.get_mut(winner) {
            p.record_trick();
        }
        let winner_name = self
            .players
            .get(winner)
            .map(|p| p.name().to_string())
            .unwrap_or_default();
        info!(code = %self.code, winner = %winner_name, "trick won");

        // The trick stays on display before and after the announcement; the
        // lane is suspended, so no queued play can land in between.
        self.pause(self.pacing.trick_display).await;
        self.broadcast_with(|state| ServerMsg::TrickWinner {
            winner: winner_name.clone(),
            state,
        });

        self.current_player = Some(winner);
        self.trick_starter = Some(winner);
        self.current_trick.clear();
        self.pause(self.pacing.trick_gap).await;

        if self.players.iter().all(|p| p.hand().is_empty()) {
            self.end_round();
        } else {
            self.broadcast_with(|state| ServerMsg::NextTrick { state });
        }
    }

    // ---- round end and reset -------------------------------------------

    fn end_round(&mut self) {
        // Knockout: every zero-trick seat leaves the table. Humans become
        // spectators, AI seats are dropped.
        let mut eliminated = Vec::new();
        for p in std::mem::take(&mut self.players) {
            if p.tricks_won() > 0 {
                self.players.push(p);
                continue;
            }
            info!(code = %self.code, player = p.name(), "eliminated");
            if let Some(session_id) = p.session_id() {
                self.sockets.send(session_id, &ServerMsg::Eliminated);
                eliminated.push(session_id);
                self.spectators.push(p);
            }
        }
        for session_id in eliminated {
            self.sockets.send(
                session_id,
                &ServerMsg::GameState {
                    state: self.snapshot(None),
                    is_spectator: Some(true),
                },
            );
        }

        if self.players.len() <= 1 || self.current_round <= 1 {
            self.phase = Phase::Finished;
            self.current_player = None;
            self.trick_starter = None;
            self.trump_caller = None;
            let winner = self.players.first().map(|p| p.name().to_string());
            info!(code = %self.code, winner = winner.as_deref().unwrap_or("nobody"), "game over");
            self.broadcast_with(|state| ServerMsg::GameOver {
                winner: winner.clone(),
                state,
            });
            return;
        }

        self.current_round -= 1;

        // Next caller: uniform among the seats tied for most tricks.
        let top = self
            .players
            .iter()
            .map(Participant::tricks_won)
            .max()
            .unwrap_or(0);
        let candidates: Vec<usize> = (0..self.players.len())
            .filter(|&seat| self.players[seat].tricks_won() == top)
            .collect();
        let caller = candidates[self.rng.random_range(0..candidates.len())];
        self.trump_caller = Some(caller);
        self.trump_suit = None;
        self.current_player = Some(caller);
        self.trick_starter = Some(caller);

        let caller_name = self
            .players
            .get(caller)
            .map(|p| p.name().to_string())
            .unwrap_or_default();
        info!(
            code = %self.code,
            round = self.current_round,
            caller = %caller_name,
            "round ended"
        );
        self.broadcast_with(|state| ServerMsg::RoundEnd {
            trump_caller: caller_name.clone(),
            state,
        });

        self.start_trump_selection();
    }

    fn handle_play_again(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::Finished {
            return Err(GameError::RoomAlreadyStarted);
        }

        let mut returning = std::mem::take(&mut self.spectators);
        self.players.append(&mut returning);
        for p in &mut self.players {
            p.reset_for_new_game();
        }

        self.phase = Phase::Waiting;
        self.current_round = STARTING_ROUND;
        self.trump_suit = None;
        self.current_trick.clear();
        self.current_player = None;
        self.trick_starter = None;
        self.trump_caller = None;

        info!(code = %self.code, players = self.players.len(), "room reset for a rematch");
        self.broadcast_with(|state| ServerMsg::PlayAgainSuccess { state });
        Ok(())
    }

    // ---- AI drive loop -------------------------------------------------

    /// Advance every consecutive AI turn. Stops at a human turn, at
    /// `Finished`, or if a policy somehow produces an illegal move.
    pub(crate) async fn drive_ai(&mut self) {
        loop {
            match self.phase {
                Phase::CallingTrumps => {
                    let Some(seat) = self.trump_caller else { break };
                    if self.players.get(seat).map(Participant::is_ai) != Some(true) {
                        break;
                    }
                    self.pause(self.pacing.ai_think).await;
                    let Some(suit) = self.players.get(seat).and_then(|p| {
                        let policy = p.policy()?;
                        Some(policy.choose_trump(p.hand()))
                    }) else {
                        break;
                    };
                    self.apply_trump(suit);
                }
                Phase::Playing => {
                    let Some(seat) = self.current_player else { break };
                    let Some(trump) = self.trump_suit else { break };
                    if self.players.get(seat).map(Participant::is_ai) != Some(true) {
                        break;
                    }
                    self.pause(self.pacing.ai_think).await;
                    let Some(card) = self.players.get(seat).and_then(|p| {
                        let policy = p.policy()?;
                        Some(policy.choose_card(p.hand(), &self.current_trick, trump))
                    }) else {
                        break;
                    };
                    if let Err(err) = self.play(Some(seat), card).await {
                        error!(code = %self.code, seat, error = %err, "AI produced an illegal play");
                        break;
                    }
                }
                Phase::Waiting | Phase::Finished => break,
            }
        }
    }

    // ---- plumbing ------------------------------------------------------

    fn seat_of(&self, session_id: Uuid) -> Option<usize> {
        self.players
            .iter()
            .position(|p| p.session_id() == Some(session_id))
    }

    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }

    fn send_error(&self, session_id: Uuid, err: &GameError) {
        self.sockets.send(
            session_id,
            &ServerMsg::Error {
                message: err.to_string(),
            },
        );
    }

    /// Deliver one event to every connected human, each with a snapshot
    /// carrying their own hand. Spectators get the handless view; AI seats
    /// get nothing.
    fn broadcast_with<F>(&self, build: F)
    where
        F: Fn(GameSnapshot) -> ServerMsg,
    {
        for (seat, p) in self.players.iter().enumerate() {
            if let Some(session_id) = p.session_id() {
                self.sockets.send(session_id, &build(self.snapshot(Some(seat))));
            }
        }
        for p in &self.spectators {
            if let Some(session_id) = p.session_id() {
                self.sockets.send(session_id, &build(self.snapshot(None)));
            }
        }
    }

    pub(crate) fn snapshot(&self, hand_for: Option<usize>) -> GameSnapshot {
        let name_of = |seat: usize| {
            self.players
                .get(seat)
                .map(|p| p.name().to_string())
        };
        GameSnapshot {
            code: self.code.clone(),
            current_round: self.current_round,
            trump_suit: self.trump_suit.map(|s| s.to_string()),
            current_trick: self
                .current_trick
                .plays()
                .iter()
                .map(|(seat, card)| (name_of(*seat).unwrap_or_default(), *card))
                .collect(),
            players: self
                .players
                .iter()
                .map(|p| PlayerSummary {
                    name: p.name().to_string(),
                    trick_count: p.tricks_won(),
                    is_ai: p.is_ai(),
                })
                .collect(),
            spectators: self.spectators.iter().map(|p| p.name().to_string()).collect(),
            state: self.phase,
            current_player: if self.phase == Phase::Playing {
                self.current_player.and_then(|seat| name_of(seat))
            } else {
                None
            },
            trump_caller: self.trump_caller.and_then(|seat| name_of(seat)),
            hand: hand_for.and_then(|seat| self.players.get(seat).map(|p| p.hand().to_vec())),
        }
    }
}
