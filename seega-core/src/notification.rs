//! State-change notifications broadcast to every player
//!
//! `Display` renders the space-delimited wire format, first token = tag:
//!
//! | Tag | Fields |
//! |---|---|
//! | `MOVE` | `row col side` (placement) |
//! | `MOVE` | `fromRow fromCol toRow toCol side` (movement) |
//! | `TURN` | `side phase` (1=placement, 2=movement) |
//! | `CAPTURE` | `row col` |
//! | `CHAT` | `side: text` |
//! | `GAME_OVER` | free text naming the winner |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::Pos;
use crate::error::ParseNotificationError;
use crate::game::{Phase, Side, WinReason};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    Place { pos: Pos, side: Side },
    Move { from: Pos, to: Pos, side: Side },
    Turn { side: Side, phase: Phase },
    Capture { pos: Pos },
    Chat { side: Side, text: String },
    GameOver { winner: Side, reason: WinReason },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Place { pos, side } => write!(f, "MOVE {pos} {side}"),
            Notification::Move { from, to, side } => write!(f, "MOVE {from} {to} {side}"),
            Notification::Turn { side, phase } => write!(f, "TURN {side} {}", phase.code()),
            Notification::Capture { pos } => write!(f, "CAPTURE {pos}"),
            Notification::Chat { side, text } => write!(f, "CHAT {side}: {text}"),
            Notification::GameOver { winner, reason } => match reason {
                WinReason::Line => write!(f, "GAME_OVER {winner} wins with a full line!"),
                WinReason::Elimination => write!(f, "GAME_OVER {winner} wins by elimination!"),
                WinReason::Resignation => {
                    write!(f, "GAME_OVER Player {winner} wins by resignation.")
                }
            },
        }
    }
}

impl Notification {
    /// Wire tag (first token)
    pub fn tag(&self) -> &'static str {
        match self {
            Notification::Place { .. } | Notification::Move { .. } => "MOVE",
            Notification::Turn { .. } => "TURN",
            Notification::Capture { .. } => "CAPTURE",
            Notification::Chat { .. } => "CHAT",
            Notification::GameOver { .. } => "GAME_OVER",
        }
    }
}

// ============================================================================
// PARSING
// ============================================================================

impl FromStr for Notification {
    type Err = ParseNotificationError;

    /// Decode a wire line, as a polling client does
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (tag, rest) = line.split_once(' ').unwrap_or((line, ""));
        let malformed = |tag: &'static str| ParseNotificationError::Malformed {
            tag,
            line: line.to_string(),
        };

        match tag {
            "" => Err(ParseNotificationError::Empty),
            "MOVE" => {
                let fields: Vec<&str> = rest.split_whitespace().collect();
                match fields.as_slice() {
                    [r, c, side] => Ok(Notification::Place {
                        pos: parse_pos(r, c).ok_or_else(|| malformed("MOVE"))?,
                        side: parse_side(side).ok_or_else(|| malformed("MOVE"))?,
                    }),
                    [r1, c1, r2, c2, side] => Ok(Notification::Move {
                        from: parse_pos(r1, c1).ok_or_else(|| malformed("MOVE"))?,
                        to: parse_pos(r2, c2).ok_or_else(|| malformed("MOVE"))?,
                        side: parse_side(side).ok_or_else(|| malformed("MOVE"))?,
                    }),
                    _ => Err(malformed("MOVE")),
                }
            }
            "TURN" => {
                let fields: Vec<&str> = rest.split_whitespace().collect();
                let [side, phase] = fields.as_slice() else {
                    return Err(malformed("TURN"));
                };
                let phase = match *phase {
                    "1" => Phase::Placement,
                    "2" => Phase::Movement,
                    _ => return Err(malformed("TURN")),
                };
                Ok(Notification::Turn {
                    side: parse_side(side).ok_or_else(|| malformed("TURN"))?,
                    phase,
                })
            }
            "CAPTURE" => {
                let fields: Vec<&str> = rest.split_whitespace().collect();
                let [r, c] = fields.as_slice() else {
                    return Err(malformed("CAPTURE"));
                };
                Ok(Notification::Capture {
                    pos: parse_pos(r, c).ok_or_else(|| malformed("CAPTURE"))?,
                })
            }
            "CHAT" => {
                let (side, text) = rest.split_once(": ").ok_or_else(|| malformed("CHAT"))?;
                Ok(Notification::Chat {
                    side: parse_side(side).ok_or_else(|| malformed("CHAT"))?,
                    text: text.to_string(),
                })
            }
            "GAME_OVER" => {
                let text = rest.strip_prefix("Player ").unwrap_or(rest);
                let winner = text
                    .split_whitespace()
                    .next()
                    .and_then(parse_side)
                    .ok_or_else(|| malformed("GAME_OVER"))?;
                let reason = if text.contains("resignation") {
                    WinReason::Resignation
                } else if text.contains("elimination") {
                    WinReason::Elimination
                } else {
                    WinReason::Line
                };
                Ok(Notification::GameOver { winner, reason })
            }
            other => Err(ParseNotificationError::UnknownTag(other.to_string())),
        }
    }
}

fn parse_side(token: &str) -> Option<Side> {
    match token {
        "A" => Some(Side::A),
        "B" => Some(Side::B),
        _ => None,
    }
}

fn parse_pos(row: &str, col: &str) -> Option<Pos> {
    Some(Pos::new(row.parse().ok()?, col.parse().ok()?))
}
