//! HTTP route handlers

pub mod game;
pub mod mailbox;
pub mod players;
pub mod status;

use seega_core::{ParticipantId, SessionError};

/// Player id from a request; nothing outside the `u8` range was ever handed out
pub(crate) fn participant(id: i64) -> Result<ParticipantId, SessionError> {
    ParticipantId::try_from(id).map_err(|_| SessionError::UnknownParticipant(id))
}

/// Board coordinate from a request
///
/// Saturates into `i8`, which keeps an oversized value off the board so the
/// engine rejects it as an invalid position in its usual check order.
pub(crate) fn coord(value: i64) -> i8 {
    value.clamp(i8::MIN.into(), i8::MAX.into()) as i8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_out_of_range() {
        assert_eq!(participant(1), Ok(1));
        assert_eq!(participant(300), Err(SessionError::UnknownParticipant(300)));
        assert_eq!(participant(-1), Err(SessionError::UnknownParticipant(-1)));
    }

    #[test]
    fn test_coord_saturates() {
        assert_eq!(coord(3), 3);
        assert_eq!(coord(200), i8::MAX);
        assert_eq!(coord(-1_000), i8::MIN);
    }
}
