//! Front-end helpers for the `pbp` tool
//!
//! Loads event files with an optional YAML config and renders games as box
//! scores, play logs, ingest reports or JSON.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use pbp_core::event_file::BoxLine;
use pbp_core::{Game, IngestConfig, Logs, ParseFailure, Team};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

/// Install the stderr log subscriber, e.g. `"info"` or `"pbp_core=debug"`.
pub fn init_tracing(filter: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_new(filter)
        .with_context(|| format!("Invalid log filter: {filter}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to install log subscriber: {err}"))
}

/// Read an event file, with ingest settings from `config` when given.
pub fn load_logs(path: &Path, config: Option<&Path>) -> Result<Logs> {
    let config = match config {
        Some(config_path) => IngestConfig::from_path(config_path)
            .with_context(|| format!("Failed to load config: {}", config_path.display()))?,
        None => IngestConfig::default(),
    };
    let logs = pbp_core::read_log(path, &config)
        .with_context(|| format!("Failed to read event file: {}", path.display()))?;
    info!(path = %path.display(), games = logs.games().len(), "event file loaded");
    Ok(logs)
}

/// Select one game by id, or every game when `id` is `None`.
pub fn select_games<'a>(logs: &'a Logs, id: Option<&str>) -> Result<Vec<&'a Game>> {
    match id {
        Some(id) => logs
            .game(id)
            .map(|game| vec![game])
            .with_context(|| format!("No game with id {id}")),
        None => Ok(logs.games().iter().collect()),
    }
}

// ============================================================================
// Box score
// ============================================================================

const BOX_HEADER: &str = "  AB   H  2B  3B  HR  BB HBP   K  PA";

pub fn render_box_score(game: &Game) -> String {
    let mut out = String::new();
    let Some(box_score) = game.box_score() else {
        let _ = writeln!(out, "{}: no plays", game.id);
        return out;
    };

    let away = game.team_name(Team::Away);
    let home = game.team_name(Team::Home);
    let _ = writeln!(
        out,
        "{}: {away} {}, {home} {}",
        game.id, box_score.runs.away, box_score.runs.home
    );
    for team in [Team::Away, Team::Home] {
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<32}{BOX_HEADER}", game.team_name(team));
        for line in box_score.team(team) {
            let _ = writeln!(out, "{}", box_line(line));
        }
    }
    if let Some(reason) = &game.aborted {
        let _ = writeln!(out);
        let _ = writeln!(out, "incomplete: {reason}");
    }
    out
}

fn box_line(entry: &BoxLine) -> String {
    let line = &entry.line;
    // Pinch appearances are indented under the slot they replaced
    let indent = if entry.key.appearance_number > 0 { "  " } else { "" };
    let label = format!("{indent}{} {}", entry.key.name, line.positions().join("-"));
    format!(
        "{label:<32}{:>4}{:>4}{:>4}{:>4}{:>4}{:>4}{:>4}{:>4}{:>4}",
        line.at_bats(),
        line.hits(),
        line.doubles(),
        line.triples(),
        line.home_runs(),
        line.walks(),
        line.hit_by_pitches(),
        line.strikeouts(),
        line.plate_appearances(),
    )
}

// ============================================================================
// Play log
// ============================================================================

pub fn render_play_log(game: &Game) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {} at {}",
        game.id,
        game.team_name(Team::Away),
        game.team_name(Team::Home)
    );
    for event in &game.events {
        let half = match event.batting_team {
            Team::Away => "top",
            Team::Home => "bot",
        };
        let description = match &event.play {
            Ok(play) => play.to_string(),
            Err(failure) => format!("?? {failure}"),
        };
        let marker = if event.is_scoring() { "*" } else { " " };
        let _ = writeln!(
            out,
            "{marker} {half} {:>2}  {:<9} {:>3}  {description}",
            event.inning, event.batter_id, event.count
        );
        for comment in &event.comments {
            let _ = writeln!(out, "      # {comment}");
        }
        for sub in &event.substitutions {
            let _ = writeln!(out, "      sub {} for {}", sub.to, sub.from);
        }
    }
    out
}

// ============================================================================
// Ingest report
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameCheck {
    pub game_id: String,
    pub events: usize,
    pub parse_failures: Vec<ParseFailure>,
    pub aborted: Option<String>,
}

impl GameCheck {
    fn from_game(game: &Game) -> Self {
        Self {
            game_id: game.id.clone(),
            events: game.events.len(),
            parse_failures: game.parse_failures().map(|(_, f)| f.clone()).collect(),
            aborted: game.aborted.clone(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.parse_failures.is_empty() && self.aborted.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub games: Vec<GameCheck>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.games.iter().all(GameCheck::is_clean)
    }

    pub fn parse_failure_count(&self) -> usize {
        self.games.iter().map(|g| g.parse_failures.len()).sum()
    }

    pub fn aborted_count(&self) -> usize {
        self.games.iter().filter(|g| g.aborted.is_some()).count()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for game in self.games.iter().filter(|g| !g.is_clean()) {
            let _ = writeln!(out, "{}:", game.game_id);
            for failure in &game.parse_failures {
                let _ = writeln!(out, "  {failure}");
            }
            if let Some(reason) = &game.aborted {
                let _ = writeln!(out, "  aborted: {reason}");
            }
        }
        let events: usize = self.games.iter().map(|g| g.events).sum();
        let _ = writeln!(
            out,
            "{} games, {events} plays, {} unparsed, {} aborted",
            self.games.len(),
            self.parse_failure_count(),
            self.aborted_count()
        );
        out
    }
}

pub fn check_report(logs: &Logs) -> CheckReport {
    CheckReport {
        games: logs.games().par_iter().map(GameCheck::from_game).collect(),
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize to JSON")
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = to_json(value)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write JSON: {}", path.display()))
}
