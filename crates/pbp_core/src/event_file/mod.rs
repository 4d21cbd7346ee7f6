//! Event-file ingestion
//!
//! Reads a season event file (one CSV record per line, games delimited by
//! `id` records) into [`Game`]s. Play codes are parsed up front as one batch,
//! then each game's records are replayed in order through the reducer.
//!
//! A fault inside a game aborts that game only: it is kept with
//! [`Game::aborted`] set and the rest of its records are skipped. With
//! `strict_fields` off, a fault confined to one record skips that record.

mod game;
mod record;

pub use game::{BoxLine, BoxScore, Event, Game};
pub use record::{format_count, FieldCursor, PlayRecord, Record};

use std::collections::HashMap;
use std::path::Path;

use csv::StringRecord;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{IngestConfig, RecordPolicy};
use crate::error::{CoreError, Result};
use crate::game::{reduce_state, GameState};
use crate::play::{parse_play, parse_plays, ParseFailure, Play};

/// Every game read from one event file, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Logs {
    games: Vec<Game>,
}

impl Logs {
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn game(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|game| game.id == id)
    }

    pub fn into_games(self) -> Vec<Game> {
        self.games
    }
}

// ============================================================================
// Game builder
// ============================================================================

/// The game being ingested and the event currently receiving comments and
/// substitutions.
struct GameBuilder {
    game: Game,
    current_event: Option<Event>,
    /// `badj` override, applied while this batter stays up
    batter_hand: Option<(String, String)>,
}

impl GameBuilder {
    fn new(id: String) -> Self {
        Self {
            game: Game::new(id),
            current_event: None,
            batter_hand: None,
        }
    }

    fn is_aborted(&self) -> bool {
        self.game.aborted.is_some()
    }

    fn abort(&mut self, err: CoreError) {
        warn!(game = %self.game.id, error = %err, "aborting game");
        self.game.aborted = Some(err.to_string());
    }

    /// The current state, built from the starters on first use.
    fn current_state(&mut self) -> Result<&GameState> {
        let state = match self.game.state.take() {
            Some(state) => state,
            None => GameState::initial(&self.game.starters)?,
        };
        Ok(self.game.state.insert(state))
    }

    fn note(&mut self, text: String) {
        match self.current_event.as_mut() {
            Some(event) => event.comments.push(text),
            None => self.game.comments.push(text),
        }
    }

    fn begin_event(&mut self, event: Event) {
        if let Some(done) = self.current_event.replace(event) {
            self.game.events.push(done);
        }
    }

    fn apply(
        &mut self,
        record: Record,
        line: usize,
        parsed: Option<std::result::Result<Play, ParseFailure>>,
        config: &IngestConfig,
    ) -> Result<()> {
        match record {
            // Games are opened by the caller
            Record::Id(_) => {}
            Record::Version(version) => self.game.version = Some(version),
            Record::Info { key, value } => {
                self.game.info.insert(key, value);
            }
            Record::Start(app) => self.game.starters.push(app),
            Record::Sub(app) => {
                let (next, substitution) = self.current_state()?.with_substitution(app)?;
                debug!(
                    game = %self.game.id,
                    from = %substitution.from.player_id,
                    to = %substitution.to.player_id,
                    "substitution"
                );
                match self.current_event.as_mut() {
                    Some(event) => event.substitutions.push(substitution),
                    None => self.game.lineup_changes.push(substitution),
                }
                self.game.state = Some(next);
            }
            Record::Play(play_record) => self.apply_play(play_record, line, parsed)?,
            Record::Comment(text) => self.note(text),
            Record::Data(fields) => self.game.data.push(fields),
            Record::RunnerAdjustment { player_id, base } => {
                let next = self.current_state()?.with_runner(&player_id, base)?;
                self.game.state = Some(next);
            }
            Record::BatterHand { player_id, hand } => {
                self.batter_hand = Some((player_id, hand));
            }
            Record::Unhandled { kind, fields } => {
                debug!(game = %self.game.id, line, kind = %kind, "unhandled record kept as comment");
                self.note(unhandled_comment(&kind, &fields));
            }
            Record::Unknown { kind, fields } => match config.unknown_records {
                RecordPolicy::Fail => return Err(CoreError::UnknownRecord { line, kind }),
                RecordPolicy::Annotate => {
                    warn!(game = %self.game.id, line, kind = %kind, "unknown record kept as comment");
                    self.note(unhandled_comment(&kind, &fields));
                }
            },
        }
        Ok(())
    }

    fn apply_play(
        &mut self,
        record: PlayRecord,
        line: usize,
        parsed: Option<std::result::Result<Play, ParseFailure>>,
    ) -> Result<()> {
        let play = parsed.unwrap_or_else(|| parse_play(&record.code));
        let preceding = self.current_state()?.clone();

        let reduced = match &play {
            Ok(play) => Some(reduce_state(&preceding, play, &record.batter_id)),
            Err(failure) => {
                warn!(
                    game = %self.game.id,
                    line,
                    column = failure.column,
                    expected = ?failure.expected,
                    "cannot parse play `{}`",
                    failure.input
                );
                None
            }
        };

        self.batter_hand = self
            .batter_hand
            .take()
            .filter(|(player_id, _)| *player_id == record.batter_id);
        let batter_hand = self.batter_hand.as_ref().map(|(_, hand)| hand.clone());

        self.begin_event(Event {
            inning: record.inning,
            batting_team: record.team,
            batter_id: record.batter_id,
            count: record.count,
            pitches: record.pitches,
            play,
            batter_hand,
            comments: Vec::new(),
            substitutions: Vec::new(),
            preceding_state: preceding,
        });

        if let Some(reduced) = reduced {
            self.game.state = Some(reduced?);
        }
        Ok(())
    }

    fn finish(mut self) -> Game {
        if let Some(event) = self.current_event.take() {
            self.game.events.push(event);
        }
        match (&self.game.aborted, self.game.final_state()) {
            (None, Some(state)) => info!(
                game = %self.game.id,
                events = self.game.events.len(),
                away = state.score.away,
                home = state.score.home,
                "game ingested"
            ),
            (None, None) => info!(game = %self.game.id, "game ingested without plays"),
            (Some(reason), _) => warn!(game = %self.game.id, %reason, "game ingested partially"),
        }
        self.game
    }
}

fn unhandled_comment(kind: &str, fields: &[String]) -> String {
    let mut parts = vec!["Unhandled", kind];
    parts.extend(fields.iter().map(String::as_str));
    parts.join(",")
}

fn read_record(row: &StringRecord, line: usize, strict: bool) -> Result<Record> {
    let mut cursor = FieldCursor::new(row, line);
    let record = Record::read(&mut cursor)?;
    let leftovers = cursor.finish(strict)?;
    if !leftovers.is_empty() {
        warn!(line, ?leftovers, "ignoring trailing fields");
    }
    Ok(record)
}

// ============================================================================
// Entry points
// ============================================================================

/// Ingest the text of one event file.
///
/// Fails as a whole only when the CSV itself is unreadable or a record
/// appears before the first `id`.
pub fn parse_log(text: &str, config: &IngestConfig) -> Result<Logs> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let rows = reader
        .records()
        .map(|row| -> Result<(usize, StringRecord)> {
            let row = row?;
            let line = row.position().map_or(0, |pos| pos.line() as usize);
            Ok((line, row))
        })
        .collect::<Result<Vec<_>>>()?;

    // Parsing needs no game state, so every play code goes in one batch.
    let (play_rows, codes): (Vec<usize>, Vec<&str>) = rows
        .iter()
        .enumerate()
        .filter(|(_, (_, row))| row.get(0) == Some("play"))
        .filter_map(|(idx, (_, row))| row.get(6).map(|code| (idx, code)))
        .unzip();
    let mut parsed: HashMap<usize, _> = play_rows
        .into_iter()
        .zip(parse_plays(&codes, config))
        .collect();
    debug!(rows = rows.len(), plays = codes.len(), "event file tokenised");

    let mut games = Vec::new();
    let mut current: Option<GameBuilder> = None;

    for (idx, (line, row)) in rows.iter().enumerate() {
        let record = read_record(row, *line, config.strict_fields);
        if let Ok(Record::Id(id)) = &record {
            if let Some(done) = current.take() {
                games.push(done.finish());
            }
            debug!(game = %id, line, "game started");
            current = Some(GameBuilder::new(id.clone()));
            continue;
        }

        let Some(builder) = current.as_mut() else {
            return Err(record.err().unwrap_or_else(|| CoreError::RecordOutsideGame {
                line: *line,
                kind: row.get(0).unwrap_or("").to_string(),
            }));
        };
        if builder.is_aborted() {
            continue;
        }
        let outcome = record.and_then(|record| builder.apply(record, *line, parsed.remove(&idx), config));
        match outcome {
            Ok(()) => {}
            Err(err) if !config.strict_fields && !err.is_fatal_to_game() => {
                warn!(game = %builder.game.id, line = *line, error = %err, "skipping record");
            }
            Err(err) => builder.abort(err),
        }
    }

    if let Some(done) = current.take() {
        games.push(done.finish());
    }
    Ok(Logs { games })
}

/// Ingest an event file from disk.
pub fn read_log(path: impl AsRef<Path>, config: &IngestConfig) -> Result<Logs> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_log(&text, config)
}
