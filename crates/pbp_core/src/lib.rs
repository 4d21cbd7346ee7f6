//! Baseball play-by-play core
//!
//! Parses scorer's play codes (`S7`, `64(1)3/GDP`, `HR.2-H;1-H`) into a typed
//! AST and replays them through an immutable game-state reducer that keeps
//! the score, the bases, the batting order and per-appearance batting lines.
//!
//! ```text
//! event file ──► event_file::parse_log ──► play::parse_play ──► game::reduce_state
//!                 (records, lineups)        (AST or failure)      (next GameState)
//! ```

pub mod config;
pub mod error;
pub mod event_file;
pub mod game;
pub mod play;

pub use config::{IngestConfig, RecordPolicy};
pub use error::{CoreError, Result, Role};
pub use event_file::{parse_log, read_log, BoxScore, Event, Game, Logs};
pub use game::{reduce_state, Appearance, GameState, StatKind, Statline, Stats, Team};
pub use play::{parse_play, parse_plays, play_is_scoring, ParseFailure, Play};
