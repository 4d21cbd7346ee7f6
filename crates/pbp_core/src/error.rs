use thiserror::Error;

use crate::game::Team;

/// Which derived pointer of a game state could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Pitcher,
    Batter,
    OnDeck,
    InTheHole,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Role::Pitcher => "pitcher",
            Role::Batter => "batter",
            Role::OnDeck => "on-deck batter",
            Role::InTheHole => "in-the-hole batter",
        })
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("expected {expected} to be up, instead it is {actual}")]
    BatterMismatch { expected: String, actual: String },

    #[error("no active player for substitution of {player_id} at {team} slot {slot}")]
    MissingSubstitutionSlot {
        team: Team,
        slot: u8,
        player_id: String,
    },

    #[error("no active {role} for the {team} team")]
    MissingAppearance { role: Role, team: Team },

    #[error("runner adjustment names {player_id}, who is not in the game")]
    MissingRunner { player_id: String },

    #[error("line {line}: unknown record type `{kind}`")]
    UnknownRecord { line: usize, kind: String },

    #[error("line {line}: malformed `{kind}` record: {reason}")]
    MalformedRecord {
        line: usize,
        kind: String,
        reason: String,
    },

    #[error("line {line}: remaining fields {fields:?} in `{kind}` record")]
    TrailingFields {
        line: usize,
        kind: String,
        fields: Vec<String>,
    },

    #[error("line {line}: `{kind}` record before any game id")]
    RecordOutsideGame { line: usize, kind: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl CoreError {
    /// The log and the simulated state have diverged, or the config asked
    /// for unknown records to fail. The game being ingested cannot continue,
    /// but other games can. Anything else is a fault in a single record.
    pub fn is_fatal_to_game(&self) -> bool {
        matches!(
            self,
            CoreError::BatterMismatch { .. }
                | CoreError::MissingSubstitutionSlot { .. }
                | CoreError::MissingAppearance { .. }
                | CoreError::MissingRunner { .. }
                | CoreError::UnknownRecord { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batter_mismatch_names_both_players() {
        let err = CoreError::BatterMismatch {
            expected: "judga001".into(),
            actual: "stanm004".into(),
        };
        let text = err.to_string();
        assert!(text.contains("judga001"));
        assert!(text.contains("stanm004"));
        assert!(err.is_fatal_to_game());
    }

    #[test]
    fn test_missing_slot_message() {
        let err = CoreError::MissingSubstitutionSlot {
            team: Team::Home,
            slot: 4,
            player_id: "x".into(),
        };
        assert_eq!(
            err.to_string(),
            "no active player for substitution of x at home slot 4"
        );
    }

    #[test]
    fn test_record_outside_game_is_not_game_scoped() {
        let err = CoreError::RecordOutsideGame {
            line: 1,
            kind: "play".into(),
        };
        assert!(!err.is_fatal_to_game());
    }

    #[test]
    fn test_record_faults_are_not_fatal_to_game() {
        let malformed = CoreError::MalformedRecord {
            line: 12,
            kind: "play".into(),
            reason: "inning is not a number".into(),
        };
        assert!(!malformed.is_fatal_to_game());

        let unknown = CoreError::UnknownRecord {
            line: 12,
            kind: "bogus".into(),
        };
        assert!(unknown.is_fatal_to_game());
    }
}
