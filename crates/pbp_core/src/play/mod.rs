//! Play codes: AST, grammar, classifier and narrative rendering
//!
//! Parsing is stateless, so independent codes can be parsed in any order
//! (and in parallel) before the game-state reducer consumes them.

mod ast;
mod classify;
mod describe;
mod failure;
mod parser;

pub use ast::{
    Advancement, Base, Baserunning, BasicPlay, Contact, Depth, Fielder, Fielders, Fielding,
    FieldingError, Hit, HitLocation, Modifier, ModifierKind, Play, RunAnnotation, Severity, Zone,
};
pub use classify::play_is_scoring;
pub use failure::ParseFailure;
pub use parser::parse_play;

use rayon::prelude::*;
use tracing::debug;

use crate::config::IngestConfig;

/// Parse a batch of play codes, preserving input order.
///
/// Batches larger than `config.parallel_parse_threshold` are spread over the
/// rayon pool.
pub fn parse_plays(codes: &[&str], config: &IngestConfig) -> Vec<Result<Play, ParseFailure>> {
    if codes.len() > config.parallel_parse_threshold {
        debug!(count = codes.len(), "parsing play batch in parallel");
        codes.par_iter().map(|code| parse_play(code)).collect()
    } else {
        codes.iter().map(|code| parse_play(code)).collect()
    }
}
