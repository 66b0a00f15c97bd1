//! Two-player session around a single game
//!
//! One mutex covers the engine, the registrations and every mailbox, so a
//! broadcast is never observed half-applied: either all players' mailboxes
//! hold a notification or none do. Mailboxes are pull-based; players drain
//! them on their own schedule and nothing here ever blocks on a player.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::board::Pos;
use crate::error::{RuleError, SessionError};
use crate::game::{GameSnapshot, GameState, Side};
use crate::notification::Notification;

/// Player id handed out by [`SessionCoordinator::register`]
pub type ParticipantId = u8;

/// Registration slots, in side order
const SIDES: [Side; 2] = [Side::A, Side::B];

/// State guarded by the session lock
#[derive(Debug, Default)]
struct Inner {
    game: GameState,
    /// Registered ids in registration order
    participants: Vec<ParticipantId>,
    /// Pending notifications per registered player
    mailboxes: FxHashMap<ParticipantId, Vec<Notification>>,
}

impl Inner {
    fn side_of(&self, id: ParticipantId) -> Result<Side, SessionError> {
        if !self.participants.contains(&id) {
            return Err(SessionError::UnknownParticipant(id.into()));
        }
        SIDES
            .get(id as usize)
            .copied()
            .ok_or(SessionError::UnknownParticipant(id.into()))
    }

    /// Registered side whose turn it is
    fn acting_side(&self, id: ParticipantId) -> Result<Side, SessionError> {
        let side = self.side_of(id)?;
        if side != self.game.current_side() {
            return Err(RuleError::NotYourTurn.into());
        }
        Ok(side)
    }

    /// Append notifications, in order, to every mailbox
    fn broadcast(&mut self, notifications: &[Notification]) {
        for mailbox in self.mailboxes.values_mut() {
            mailbox.extend_from_slice(notifications);
        }
    }

    fn turn_notification(&self) -> Notification {
        Notification::Turn {
            side: self.game.current_side(),
            phase: self.game.phase(),
        }
    }

    fn game_over_notification(&self) -> Option<Notification> {
        self.game
            .outcome()
            .map(|(winner, reason)| Notification::GameOver { winner, reason })
    }
}

/// Turn-synchronized coordinator for one game between two players
#[derive(Debug, Default)]
pub struct SessionCoordinator {
    inner: Mutex<Inner>,
}

impl SessionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host a game that is already in progress
    pub fn with_game(game: GameState) -> Self {
        Self {
            inner: Mutex::new(Inner {
                game,
                ..Inner::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Every mutation validates before writing, so a poisoned lock still
        // guards a consistent state
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    /// Claim the next free slot: id 0 plays side A, id 1 plays side B
    pub fn register(&self) -> Result<ParticipantId, SessionError> {
        let mut inner = self.lock();
        let next = inner.participants.len();
        if next >= SIDES.len() {
            warn!("Registration rejected: session full");
            return Err(SessionError::SessionFull);
        }

        let id = next as ParticipantId;
        inner.participants.push(id);
        inner.mailboxes.insert(id, Vec::new());
        info!(player_id = id, side = %SIDES[next], "Player registered");
        Ok(id)
    }

    /// Number of registered players
    pub fn participants(&self) -> usize {
        self.lock().participants.len()
    }

    pub fn side_of(&self, id: ParticipantId) -> Result<Side, SessionError> {
        self.lock().side_of(id)
    }

    // ========================================================================
    // GAME ACTIONS
    // ========================================================================

    /// Place a piece for `id`; on success the notifications were broadcast
    pub fn place_piece(&self, id: ParticipantId, pos: Pos) -> Result<Vec<Notification>, SessionError> {
        let mut inner = self.lock();
        let side = inner.acting_side(id).inspect_err(|e| {
            warn!(player_id = id, %pos, error = %e, "Placement rejected");
        })?;

        let outcome = inner.game.place(side, pos).inspect_err(|e| {
            warn!(player_id = id, %pos, error = %e, "Placement rejected");
        })?;
        debug!("Board after placement:\n{}", inner.game.board());

        let mut notifications = vec![
            Notification::Place { pos: outcome.pos, side },
            inner.turn_notification(),
        ];
        notifications.extend(inner.game_over_notification());

        info!(player_id = id, %side, %pos, phase = ?outcome.phase, "Piece placed");
        inner.broadcast(&notifications);
        Ok(notifications)
    }

    /// Move a piece for `id`; captures are reported by diffing the board
    pub fn move_piece(
        &self,
        id: ParticipantId,
        from: Pos,
        to: Pos,
    ) -> Result<Vec<Notification>, SessionError> {
        let mut inner = self.lock();
        let side = inner.acting_side(id).inspect_err(|e| {
            warn!(player_id = id, %from, %to, error = %e, "Move rejected");
        })?;

        let before = *inner.game.board();
        let outcome = inner.game.move_piece(side, from, to).inspect_err(|e| {
            warn!(player_id = id, %from, %to, error = %e, "Move rejected");
        })?;
        let after = *inner.game.board();
        debug!("Board after move:\n{after}");

        let mut notifications = vec![
            Notification::Move { from, to, side },
            inner.turn_notification(),
        ];
        // The origin square is vacated by the move itself
        let captures: Vec<Pos> = before
            .vacated(&after)
            .into_iter()
            .filter(|pos| *pos != from)
            .collect();
        debug_assert_eq!(captures.len(), outcome.captured.len());
        notifications.extend(captures.into_iter().map(|pos| Notification::Capture { pos }));
        notifications.extend(inner.game_over_notification());

        info!(
            player_id = id,
            %side,
            %from,
            %to,
            captured = outcome.captured.len(),
            "Piece moved"
        );
        if let Some(winner) = outcome.winner {
            info!(%winner, "Game over");
        }
        inner.broadcast(&notifications);
        Ok(notifications)
    }

    /// Broadcast a chat line tagged with the sender's side
    pub fn chat(&self, id: ParticipantId, text: &str) -> Result<Vec<Notification>, SessionError> {
        let mut inner = self.lock();
        let side = inner.side_of(id)?;
        let notifications = vec![Notification::Chat {
            side,
            text: text.to_string(),
        }];

        debug!(player_id = id, %side, "Chat message");
        inner.broadcast(&notifications);
        Ok(notifications)
    }

    /// Concede for `id`, ending the game in the opponent's favour
    pub fn resign(&self, id: ParticipantId) -> Result<Vec<Notification>, SessionError> {
        let mut inner = self.lock();
        let side = inner.side_of(id)?;
        let winner = inner.game.resign(side).inspect_err(|e| {
            warn!(player_id = id, error = %e, "Resignation rejected");
        })?;

        let notifications: Vec<Notification> = inner.game_over_notification().into_iter().collect();
        info!(player_id = id, %side, %winner, "Player resigned");
        inner.broadcast(&notifications);
        Ok(notifications)
    }

    // ========================================================================
    // MAILBOXES
    // ========================================================================

    /// Take every pending notification for `id`, oldest first
    ///
    /// Never blocks; unknown ids get an empty list.
    pub fn drain_mailbox(&self, id: ParticipantId) -> Vec<Notification> {
        let mut inner = self.lock();
        inner
            .mailboxes
            .get_mut(&id)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.lock().game.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Phase;

    fn two_players() -> SessionCoordinator {
        let session = SessionCoordinator::new();
        assert_eq!(session.register(), Ok(0));
        assert_eq!(session.register(), Ok(1));
        session
    }

    #[test]
    fn test_register_two_then_full() {
        let session = two_players();
        session.chat(0, "hello").unwrap();
        session.place_piece(0, Pos::new(0, 0)).unwrap();
        let before = session.snapshot();

        assert_eq!(session.register(), Err(SessionError::SessionFull));
        assert_eq!(session.participants(), 2);
        assert_eq!(session.side_of(0), Ok(Side::A));
        assert_eq!(session.side_of(1), Ok(Side::B));
        assert!(session.drain_mailbox(2).is_empty());

        // The rejected seat touches neither the game nor the mailboxes
        assert_eq!(session.snapshot(), before);
        let a = session.drain_mailbox(0);
        assert_eq!(a.len(), 3);
        assert_eq!(a, session.drain_mailbox(1));
    }

    #[test]
    fn test_unregistered_player_rejected() {
        let session = SessionCoordinator::new();
        session.register().unwrap();
        assert_eq!(
            session.place_piece(1, Pos::new(0, 0)),
            Err(SessionError::UnknownParticipant(1))
        );
        assert_eq!(session.chat(5, "hi"), Err(SessionError::UnknownParticipant(5)));
    }

    #[test]
    fn test_place_broadcasts_to_everyone() {
        let session = two_players();
        let sent = session.place_piece(0, Pos::new(0, 0)).unwrap();
        assert_eq!(
            sent,
            vec![
                Notification::Place { pos: Pos::new(0, 0), side: Side::A },
                Notification::Turn { side: Side::A, phase: Phase::Placement },
            ]
        );
        assert_eq!(session.drain_mailbox(0), sent);
        assert_eq!(session.drain_mailbox(1), sent);
        assert!(session.drain_mailbox(0).is_empty());
    }

    #[test]
    fn test_not_your_turn_is_not_broadcast() {
        let session = two_players();
        assert_eq!(
            session.place_piece(1, Pos::new(0, 0)),
            Err(SessionError::Rule(RuleError::NotYourTurn))
        );
        assert!(session.drain_mailbox(0).is_empty());
        assert!(session.drain_mailbox(1).is_empty());
        assert_eq!(session.snapshot().board[0][0], None);
    }

    #[test]
    fn test_chat_and_resign() {
        let session = two_players();
        session.chat(1, "hello").unwrap();
        session.resign(1).unwrap();

        let expected: Vec<String> = vec![
            "CHAT B: hello".to_string(),
            "GAME_OVER Player A wins by resignation.".to_string(),
        ];
        let wire: Vec<String> = session.drain_mailbox(0).iter().map(|n| n.to_string()).collect();
        assert_eq!(wire, expected);

        assert_eq!(
            session.place_piece(0, Pos::new(0, 0)),
            Err(SessionError::Rule(RuleError::GameOver))
        );
        assert_eq!(session.snapshot().winner, Some(Side::A));
    }
}
