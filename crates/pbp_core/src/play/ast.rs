//! Play code AST
//!
//! Closed set of node kinds produced by the play grammar ([`super::parser`]).
//! Every node is plain data: nothing in this module knows about game state.
//!
//! ```text
//! Play
//!  ├── BasicPlay        what happened to the batter (or the runners)
//!  ├── Vec<Modifier>    descriptive annotations, never change state
//!  └── Vec<Advancement> runner movement clauses, applied in order
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Fielders
// ============================================================================

/// Defensive position, numbered 1-9 by the official scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fielder {
    Pitcher,
    Catcher,
    FirstBaseman,
    SecondBaseman,
    ThirdBaseman,
    Shortstop,
    LeftFielder,
    CenterFielder,
    RightFielder,
}

impl Fielder {
    /// All fielders in scorer's number order (index 0 = position 1)
    pub const ALL: [Fielder; 9] = [
        Fielder::Pitcher,
        Fielder::Catcher,
        Fielder::FirstBaseman,
        Fielder::SecondBaseman,
        Fielder::ThirdBaseman,
        Fielder::Shortstop,
        Fielder::LeftFielder,
        Fielder::CenterFielder,
        Fielder::RightFielder,
    ];

    /// Resolve a scorer's digit. `0` is not a fielder.
    pub fn from_digit(digit: char) -> Option<Self> {
        let number = digit.to_digit(10)? as usize;
        if number == 0 {
            return None;
        }
        Self::ALL.get(number - 1).copied()
    }

    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Fielder::Pitcher => "pitcher",
            Fielder::Catcher => "catcher",
            Fielder::FirstBaseman => "first baseman",
            Fielder::SecondBaseman => "second baseman",
            Fielder::ThirdBaseman => "third baseman",
            Fielder::Shortstop => "shortstop",
            Fielder::LeftFielder => "left fielder",
            Fielder::CenterFielder => "center fielder",
            Fielder::RightFielder => "right fielder",
        }
    }
}

/// Ordered, non-empty chain of fielders who handled the ball
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fielders(pub(crate) Vec<Fielder>);

impl Fielders {
    pub fn as_slice(&self) -> &[Fielder] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Fielder> + '_ {
        self.0.iter().copied()
    }
}

/// `[thrower]E<fielder>[/TH]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldingError {
    /// Fielder whose throw was mishandled, when the error is on a receiver
    pub thrower: Option<Fielder>,
    /// Fielder charged with the error
    pub fielder: Fielder,
    /// Throwing error (`/TH`)
    pub throwing: bool,
}

/// Result of a fielding attempt: either the putout chain or the error that negated it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fielding {
    Error(FieldingError),
    Assists(Fielders),
}

impl Fielding {
    pub fn is_error(&self) -> bool {
        matches!(self, Fielding::Error(_))
    }
}

// ============================================================================
// Bases
// ============================================================================

/// Parenthetical note on a run scoring at home. Descriptive only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunAnnotation {
    Error(FieldingError),
    TeamUnearnedRun,
    UnearnedRun,
    RbiCredited,
    NoRbiCredited,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Base {
    First,
    Second,
    Third,
    /// Home plate; also the batter's starting point (`B`)
    Home { annotations: Vec<RunAnnotation> },
}

impl Base {
    pub fn home() -> Self {
        Base::Home {
            annotations: Vec::new(),
        }
    }

    pub fn is_home(&self) -> bool {
        matches!(self, Base::Home { .. })
    }

    /// Index into the three stored base slots; home is never stored.
    pub fn slot(&self) -> Option<usize> {
        match self {
            Base::First => Some(0),
            Base::Second => Some(1),
            Base::Third => Some(2),
            Base::Home { .. } => None,
        }
    }

    /// Base a runner leaves when trying to take this one.
    pub fn preceding(&self) -> Option<Base> {
        match self {
            Base::First => None,
            Base::Second => Some(Base::First),
            Base::Third => Some(Base::Second),
            Base::Home { .. } => Some(Base::Third),
        }
    }

    pub fn annotations(&self) -> &[RunAnnotation] {
        match self {
            Base::Home { annotations } => annotations,
            _ => &[],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Base::First => "1B",
            Base::Second => "2B",
            Base::Third => "3B",
            Base::Home { .. } => "Home",
        }
    }
}

// ============================================================================
// Basic plays
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hit {
    Single { fielders: Fielders },
    Double { fielders: Fielders },
    Triple { fielders: Fielders },
    InsideTheParkHomeRun { fielders: Fielders },
    HomeRun,
    GroundRuleDouble,
}

impl Hit {
    pub fn is_home_run(&self) -> bool {
        matches!(self, Hit::HomeRun | Hit::InsideTheParkHomeRun { .. })
    }
}

/// Runner events that can stand alone or ride along on `K`/`W`/`IW` via `+`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Baserunning {
    Balk,
    CaughtStealing { base: Base, fielders: Fielders },
    PickOff { base: Base, fielding: Fielding },
    DoubleSteal { bases: Vec<Base> },
    StolenBase { base: Base },
    PassedBall,
    DefensiveIndifference,
    WildPitch,
}

impl Baserunning {
    /// Caught stealing and pick offs retire a runner when attached to a plate appearance.
    pub fn retires_runner(&self) -> bool {
        matches!(
            self,
            Baserunning::CaughtStealing { .. } | Baserunning::PickOff { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicPlay {
    ErrorOnFoulFly { fielder: Fielder },
    NoPlay,
    Baserunning(Baserunning),
    FieldersChoice { fielders: Option<Fielders> },
    Error(FieldingError),
    DoublePlay {
        first: Fielders,
        base: Base,
        second: Fielders,
    },
    Out {
        fielders: Fielders,
        base: Option<Base>,
    },
    Walk { baserunning: Vec<Baserunning> },
    HitByPitch,
    Hit(Hit),
    Strikeout { baserunning: Vec<Baserunning> },
    IntentionalWalk { baserunning: Vec<Baserunning> },
    Interference { fielder: Fielder },
}

// ============================================================================
// Modifiers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Fielder(Fielder),
    /// `0` in a location descriptor
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Medium,
    Extra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Depth {
    Deep,
    Shallow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contact {
    Hard,
    Soft,
}

/// Where the ball went, e.g. `78XD` or `9LSF`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitLocation {
    /// One or two zones
    pub zones: Vec<Zone>,
    pub toward_line: bool,
    pub severity: Option<Severity>,
    pub depth: Option<Depth>,
    pub foul: bool,
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    AppealPlay,
    BuntGroundedIntoDoublePlay,
    GroundBallBunt,
    BatterInterference,
    LineDriveBunt,
    BattingOutOfTurn,
    BuntPoppedIntoDoublePlay,
    BuntPopUp,
    RunnerHitByBattedBall,
    CourtesyBatter,
    CourtesyFielder,
    CourtesyRunner,
    CalledThirdStrike,
    DoublePlay,
    Error(Fielder),
    FlyBallDoublePlay,
    FanInterference,
    Foul,
    ForceOut,
    Fly,
    GroundBallDoublePlay,
    GroundBallTriplePlay,
    GroundBall,
    InfieldFly,
    Interference,
    InsideTheParkHomeRun,
    LinedIntoDoublePlay,
    LinedIntoTriplePlay,
    LineDrive,
    ManagerReview,
    NoDoublePlay,
    Obstruction,
    RunnerPassed,
    PopFly,
    RunnerInterference,
    Relay(Fielder),
    SacrificeFly,
    SacrificeHit,
    ThrowTo(Base),
    Throw,
    TriplePlay,
    UmpireInterference,
    UmpireReview,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub location: Option<HitLocation>,
}

// ============================================================================
// Advancements and the root node
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advancement {
    /// `from-to[(error)]`
    Successful {
        from: Base,
        to: Base,
        error: Option<FieldingError>,
    },
    /// `fromXto[(fielders|error)]`
    Failed {
        from: Base,
        to: Base,
        fielding: Option<Fielding>,
    },
}

impl Advancement {
    pub fn from(&self) -> &Base {
        match self {
            Advancement::Successful { from, .. } | Advancement::Failed { from, .. } => from,
        }
    }

    pub fn to(&self) -> &Base {
        match self {
            Advancement::Successful { to, .. } | Advancement::Failed { to, .. } => to,
        }
    }

    /// A failed advancement negated by an error or carrying run annotations
    /// is not charged as an out.
    pub fn is_charged_out(&self) -> bool {
        match self {
            Advancement::Successful { .. } => false,
            Advancement::Failed { to, fielding, .. } => {
                let negated = fielding.as_ref().is_some_and(Fielding::is_error);
                !negated && to.annotations().is_empty()
            }
        }
    }
}

/// Root of a parsed play code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub basic: BasicPlay,
    pub modifiers: Vec<Modifier>,
    pub advancements: Vec<Advancement>,
}
