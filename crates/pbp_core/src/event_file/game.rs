use std::collections::BTreeMap;

use serde::Serialize;

use crate::game::{Appearance, GameState, PerTeam, StatKey, Statline, Substitution, Team};
use crate::play::{ParseFailure, Play};

/// A `play` record with everything attached to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub inning: u32,
    pub batting_team: Team,
    pub batter_id: String,
    pub count: String,
    pub pitches: String,
    /// The parsed code, or why it could not be parsed
    pub play: Result<Play, ParseFailure>,
    pub batter_hand: Option<String>,
    pub comments: Vec<String>,
    /// Lineup changes recorded after this play
    pub substitutions: Vec<Substitution>,
    /// State the play was applied to
    #[serde(skip)]
    pub preceding_state: GameState,
}

impl Event {
    pub fn is_scoring(&self) -> bool {
        self.play.as_ref().is_ok_and(Play::is_scoring)
    }

    pub fn parse_failure(&self) -> Option<&ParseFailure> {
        self.play.as_ref().err()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    pub id: String,
    pub version: Option<String>,
    pub info: BTreeMap<String, String>,
    pub starters: Vec<Appearance>,
    /// Substitutions made before the first play
    pub lineup_changes: Vec<Substitution>,
    pub events: Vec<Event>,
    pub data: Vec<Vec<String>>,
    /// Comments that precede the first play
    pub comments: Vec<String>,
    #[serde(skip)]
    pub(crate) state: Option<GameState>,
    /// Why ingestion of this game stopped early
    pub aborted: Option<String>,
}

impl Game {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
            info: BTreeMap::new(),
            starters: Vec::new(),
            lineup_changes: Vec::new(),
            events: Vec::new(),
            data: Vec::new(),
            comments: Vec::new(),
            state: None,
            aborted: None,
        }
    }

    /// State after the last reduced play; `None` until the first play.
    pub fn final_state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn info(&self, key: &str) -> Option<&str> {
        self.info.get(key).map(String::as_str)
    }

    pub fn team_name(&self, team: Team) -> &str {
        let key = match team {
            Team::Away => "visteam",
            Team::Home => "hometeam",
        };
        self.info(key).unwrap_or(match team {
            Team::Away => "Away",
            Team::Home => "Home",
        })
    }

    pub fn parse_failures(&self) -> impl Iterator<Item = (usize, &ParseFailure)> {
        self.events
            .iter()
            .enumerate()
            .filter_map(|(idx, event)| event.parse_failure().map(|failure| (idx, failure)))
    }

    pub fn box_score(&self) -> Option<BoxScore> {
        let state = self.final_state()?;
        let team_lines = |team: Team| -> Vec<BoxLine> {
            state
                .stats
                .team_lines(team)
                .into_iter()
                .map(|(key, line)| BoxLine {
                    key: key.clone(),
                    line: line.clone(),
                })
                .collect()
        };
        Some(BoxScore {
            lines: PerTeam {
                away: team_lines(Team::Away),
                home: team_lines(Team::Home),
            },
            runs: state.score,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoxLine {
    pub key: StatKey,
    pub line: Statline,
}

/// Per-team batting lines in lineup order plus the final runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoxScore {
    pub lines: PerTeam<Vec<BoxLine>>,
    pub runs: PerTeam<u32>,
}

impl BoxScore {
    pub fn team(&self, team: Team) -> &[BoxLine] {
        self.lines.get(team)
    }
}
