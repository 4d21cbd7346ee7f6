use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the game; `0` is the visiting team in event files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Away,
    Home,
}

impl Team {
    pub fn opponent(self) -> Self {
        match self {
            Team::Away => Team::Home,
            Team::Home => Team::Away,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Team::Away),
            "1" => Some(Team::Home),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Team::Away => "0",
            Team::Home => "1",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Team::Away => "away",
            Team::Home => "home",
        })
    }
}

/// Position code names. `10`-`12` are lineup-only roles.
pub fn position_name(code: &str) -> Option<&'static str> {
    Some(match code {
        "1" => "P",
        "2" => "C",
        "3" => "1B",
        "4" => "2B",
        "5" => "3B",
        "6" => "SS",
        "7" => "LF",
        "8" => "CF",
        "9" => "RF",
        "10" => "DH",
        "11" => "PH",
        "12" => "PR",
        _ => return None,
    })
}

/// A player's stint in one roster slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub player_id: String,
    pub name: String,
    pub team: Team,
    /// Batting order slot 1-9; 0 for a pitcher who does not bat
    pub slot: u8,
    /// Bumped each time a different player takes over this slot
    pub appearance_number: u32,
    /// Position code as written in the log (`1`-`12`)
    pub position: String,
}

impl Appearance {
    pub fn new(
        player_id: impl Into<String>,
        name: impl Into<String>,
        team: Team,
        slot: u8,
        position: impl Into<String>,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            team,
            slot,
            appearance_number: 0,
            position: position.into(),
        }
    }

    pub fn is_pitcher(&self) -> bool {
        self.position == "1"
    }

    /// Short position label, falling back to the raw code.
    pub fn position_name(&self) -> &str {
        position_name(&self.position).unwrap_or(&self.position)
    }

    /// Same player in the same stint, whatever position they now play.
    pub fn is_same_stint(&self, other: &Appearance) -> bool {
        self.player_id == other.player_id
            && self.team == other.team
            && self.appearance_number == other.appearance_number
    }

    /// The incoming appearance when `incoming` replaces `self` in the same slot.
    pub fn succeeded_by(&self, mut incoming: Appearance) -> Appearance {
        incoming.appearance_number = if incoming.player_id == self.player_id {
            self.appearance_number
        } else {
            self.appearance_number + 1
        };
        incoming
    }
}

impl fmt::Display for Appearance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({}, {} #{})", self.name, self.player_id, self.team, self.slot)
    }
}
