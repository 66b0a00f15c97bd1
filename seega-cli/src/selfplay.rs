//! Selfplay command - random bots playing through a session
//!
//! Each bot behaves like a remote player: it learns about the game only by
//! draining its mailbox and decoding the wire notifications, keeps its own
//! copy of the board, and acts when a TURN notification names its side.
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_games(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: RandomBot, formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use seega_core::{
    Board, Cell, GameState, Notification, ParticipantId, Phase, Pos, SessionCoordinator, Side,
    WinReason, CENTER,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SelfPlayArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Maximum placements plus moves per game
    #[arg(long, default_value = "300")]
    pub max_moves: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    winner: Option<Side>,
    reason: Option<WinReason>,
    /// Side to move had no legal step
    blocked: bool,
    actions: u32,
    captures: u32,
}

/// Aggregated results
#[derive(Clone, Debug)]
struct SelfPlayResults {
    games: Vec<GameRecord>,
    a_wins: usize,
    b_wins: usize,
    unfinished: usize,
    avg_actions: f32,
    total_captures: u32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run selfplay command
///
/// This function reads like a table of contents:
/// 1. Play the games
/// 2. Report results
pub fn run(args: SelfPlayArgs, seed: Option<u64>) -> Result<()> {
    tracing::info!(
        "Starting selfplay: {} games, max {} actions per game",
        args.games,
        args.max_moves
    );

    let results = play_games(&args, seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games
fn play_games(args: &SelfPlayArgs, seed: Option<u64>) -> Result<SelfPlayResults> {
    let mut rng = create_rng(seed);
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        let record = play_single_game(game_num + 1, args.max_moves, &mut rng)?;

        tracing::info!(
            "Game {}: winner {:?} ({:?}) after {} actions, {} captures",
            record.game_number,
            record.winner,
            record.reason,
            record.actions,
            record.captures
        );

        games.push(record);
    }

    Ok(compute_statistics(games))
}

/// Report results
fn report_results(results: &SelfPlayResults, args: &SelfPlayArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game between two random bots
fn play_single_game(game_number: usize, max_moves: u32, rng: &mut ChaCha8Rng) -> Result<GameRecord> {
    let session = SessionCoordinator::new();
    let mut bots = [
        RandomBot::register(&session)?,
        RandomBot::register(&session)?,
    ];

    let mut actions = 0;
    let mut captures = 0;
    let mut blocked = false;

    loop {
        for bot in bots.iter_mut() {
            let lines: Vec<String> = session
                .drain_mailbox(bot.id)
                .iter()
                .map(ToString::to_string)
                .collect();
            if bot.side == Side::A {
                captures += lines.iter().filter(|l| l.starts_with("CAPTURE")).count() as u32;
            }
            bot.absorb(&lines)?;
        }

        if bots[0].outcome.is_some() || actions >= max_moves {
            break;
        }

        let bot = bots
            .iter()
            .find(|b| b.to_act())
            .context("No bot believes it is their turn")?;

        let Some(action) = bot.choose(rng) else {
            tracing::debug!("Side {} has no legal move", bot.side);
            blocked = true;
            break;
        };

        match action {
            Action::Place(pos) => session
                .place_piece(bot.id, pos)
                .with_context(|| format!("Side {} failed to place at {pos}", bot.side))?,
            Action::Move(from, to) => session
                .move_piece(bot.id, from, to)
                .with_context(|| format!("Side {} failed to move {from} -> {to}", bot.side))?,
        };
        actions += 1;
    }

    verify_mirrors(&session, &bots)?;

    let outcome = bots[0].outcome;
    Ok(GameRecord {
        game_number,
        winner: outcome.map(|(side, _)| side),
        reason: outcome.map(|(_, reason)| reason),
        blocked,
        actions,
        captures,
    })
}

/// Both bots' boards must match the server's
fn verify_mirrors(session: &SessionCoordinator, bots: &[RandomBot]) -> Result<()> {
    let snapshot = session.snapshot();
    for bot in bots {
        let mirror: Vec<Vec<Option<Side>>> = bot
            .board
            .rows()
            .iter()
            .map(|row| row.iter().map(Cell::side).collect())
            .collect();
        anyhow::ensure!(
            mirror == snapshot.board,
            "Side {} board diverged from the session:\n{}",
            bot.side,
            bot.board
        );
    }
    Ok(())
}

/// Compute statistics from game records
fn compute_statistics(games: Vec<GameRecord>) -> SelfPlayResults {
    let a_wins = games.iter().filter(|g| g.winner == Some(Side::A)).count();
    let b_wins = games.iter().filter(|g| g.winner == Some(Side::B)).count();
    let unfinished = games.iter().filter(|g| g.winner.is_none()).count();
    let total_captures = games.iter().map(|g| g.captures).sum();

    let avg_actions = if games.is_empty() {
        0.0
    } else {
        games.iter().map(|g| g.actions as f32).sum::<f32>() / games.len() as f32
    };

    SelfPlayResults {
        games,
        a_wins,
        b_wins,
        unfinished,
        avg_actions,
        total_captures,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Something a bot can do on its turn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Place(Pos),
    Move(Pos, Pos),
}

/// Player that knows only what its mailbox tells it
#[derive(Clone, Debug)]
struct RandomBot {
    id: ParticipantId,
    side: Side,
    board: Board,
    turn: Side,
    phase: Phase,
    outcome: Option<(Side, WinReason)>,
}

impl RandomBot {
    fn register(session: &SessionCoordinator) -> Result<Self> {
        let id = session.register()?;
        let side = session.side_of(id)?;
        Ok(Self::new(id, side))
    }

    fn new(id: ParticipantId, side: Side) -> Self {
        Self {
            id,
            side,
            board: Board::new(),
            turn: Side::A,
            phase: Phase::Placement,
            outcome: None,
        }
    }

    /// Decode and apply wire lines in order
    fn absorb(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            let notification: Notification = line
                .parse()
                .with_context(|| format!("Side {} got an unreadable line", self.side))?;
            self.apply(notification);
        }
        Ok(())
    }

    fn apply(&mut self, notification: Notification) {
        match notification {
            Notification::Place { pos, side } => self.board.set(pos, Cell::Piece(side)),
            Notification::Move { from, to, side } => {
                self.board.set(from, Cell::Empty);
                self.board.set(to, Cell::Piece(side));
            }
            Notification::Turn { side, phase } => {
                self.turn = side;
                self.phase = phase;
            }
            Notification::Capture { pos } => self.board.set(pos, Cell::Empty),
            Notification::Chat { .. } => {}
            Notification::GameOver { winner, reason } => self.outcome = Some((winner, reason)),
        }
    }

    fn to_act(&self) -> bool {
        self.outcome.is_none() && self.turn == self.side
    }

    /// Pick a uniformly random legal action, `None` when blocked
    fn choose(&self, rng: &mut ChaCha8Rng) -> Option<Action> {
        match self.phase {
            Phase::Placement => {
                let cells: Vec<Pos> = self
                    .board
                    .cells()
                    .filter(|(pos, cell)| cell.is_empty() && *pos != CENTER)
                    .map(|(pos, _)| pos)
                    .collect();
                cells.choose(rng).copied().map(Action::Place)
            }
            Phase::Movement => GameState::from_position(self.board, self.side)
                .legal_moves(self.side)
                .choose(rng)
                .map(|&(from, to)| Action::Move(from, to)),
        }
    }
}

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Print results as JSON
fn print_json_results(results: &SelfPlayResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        winner: Option<Side>,
        reason: Option<WinReason>,
        blocked: bool,
        actions: u32,
        captures: u32,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        a_wins: usize,
        b_wins: usize,
        unfinished: usize,
        avg_actions: f32,
        total_captures: u32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        a_wins: results.a_wins,
        b_wins: results.b_wins,
        unfinished: results.unfinished,
        avg_actions: results.avg_actions,
        total_captures: results.total_captures,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                winner: g.winner,
                reason: g.reason,
                blocked: g.blocked,
                actions: g.actions,
                captures: g.captures,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &SelfPlayResults) {
    let total = results.games.len();
    let pct = |n: usize| {
        if total > 0 {
            n as f32 / total as f32 * 100.0
        } else {
            0.0
        }
    };

    println!("\n=== Selfplay Results ===");
    println!("Total games: {}", total);
    println!("A wins:      {} ({:.1}%)", results.a_wins, pct(results.a_wins));
    println!("B wins:      {} ({:.1}%)", results.b_wins, pct(results.b_wins));
    println!("Unfinished:  {} ({:.1}%)", results.unfinished, pct(results.unfinished));
    println!("Avg actions: {:.1}", results.avg_actions);
    println!("Captures:    {}", results.total_captures);

    println!("\nGame details:");
    for game in &results.games {
        match (game.winner, game.reason) {
            (Some(winner), Some(reason)) => println!(
                "  Game {}: {} wins ({:?}) after {} actions",
                game.game_number, winner, reason, game.actions
            ),
            _ if game.blocked => println!(
                "  Game {}: blocked after {} actions",
                game.game_number, game.actions
            ),
            _ => println!(
                "  Game {}: unfinished after {} actions",
                game.game_number, game.actions
            ),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(game_number: usize, winner: Option<Side>, actions: u32) -> GameRecord {
        GameRecord {
            game_number,
            winner,
            reason: winner.map(|_| WinReason::Elimination),
            blocked: false,
            actions,
            captures: 1,
        }
    }

    #[test]
    fn test_compute_statistics_empty() {
        let results = compute_statistics(vec![]);
        assert_eq!(results.a_wins, 0);
        assert_eq!(results.b_wins, 0);
        assert_eq!(results.unfinished, 0);
        assert_eq!(results.avg_actions, 0.0);
    }

    #[test]
    fn test_compute_statistics() {
        let games = vec![
            record(1, Some(Side::A), 30),
            record(2, Some(Side::B), 40),
            record(3, None, 50),
        ];

        let results = compute_statistics(games);
        assert_eq!(results.a_wins, 1);
        assert_eq!(results.b_wins, 1);
        assert_eq!(results.unfinished, 1);
        assert_eq!(results.avg_actions, 40.0);
        assert_eq!(results.total_captures, 3);
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));

        use rand::Rng;
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }

    #[test]
    fn test_bot_tracks_wire_updates() {
        let mut bot = RandomBot::new(1, Side::B);
        let lines: Vec<String> = [
            "MOVE 0 0 A",
            "MOVE 0 1 B",
            "TURN B 2",
            "MOVE 0 1 1 1 B",
            "CAPTURE 0 0",
            "CHAT A: ouch",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        bot.absorb(&lines).unwrap();
        assert_eq!(bot.board.get(Pos::new(0, 0)), Some(Cell::Empty));
        assert_eq!(bot.board.get(Pos::new(0, 1)), Some(Cell::Empty));
        assert_eq!(bot.board.get(Pos::new(1, 1)), Some(Cell::Piece(Side::B)));
        assert_eq!(bot.phase, Phase::Movement);
        assert!(bot.to_act());

        bot.absorb(&["GAME_OVER Player B wins by resignation.".to_string()])
            .unwrap();
        assert_eq!(bot.outcome, Some((Side::B, WinReason::Resignation)));
        assert!(!bot.to_act());
    }

    #[test]
    fn test_bot_rejects_garbage() {
        let mut bot = RandomBot::new(0, Side::A);
        assert!(bot.absorb(&["NOISE".to_string()]).is_err());
    }

    #[test]
    fn test_bot_never_places_on_center() {
        let mut rng = create_rng(Some(7));
        let bot = RandomBot::new(0, Side::A);
        for _ in 0..100 {
            assert_ne!(bot.choose(&mut rng), Some(Action::Place(CENTER)));
        }
    }

    #[test]
    fn test_single_game_runs_clean() {
        let mut rng = create_rng(Some(42));
        let record = play_single_game(1, 300, &mut rng).unwrap();
        // 24 placements always happen before anything can end the game
        assert!(record.actions >= 24);
        assert!(record.actions <= 300);
        if let Some(winner) = record.winner {
            assert!(record.reason.is_some());
            assert!(matches!(winner, Side::A | Side::B));
        }
    }
}
