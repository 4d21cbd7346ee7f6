//! Narrative rendering of play ASTs for the play log.
//!
//! `64(1)3/GDP.3-H` renders as
//! "Double Play, shortstop, second baseman out at 1B, first baseman (ground ball double play); 3B scores"

use std::fmt;

use super::ast::{
    Advancement, Base, Baserunning, BasicPlay, Contact, Depth, Fielder, Fielders, Fielding,
    FieldingError, Hit, HitLocation, Modifier, ModifierKind, Play, RunAnnotation, Severity, Zone,
};

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter,
    items: impl IntoIterator<Item = T>,
    separator: &str,
) -> fmt::Result {
    for (idx, item) in items.into_iter().enumerate() {
        if idx > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Fielder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Fielders {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_joined(f, self.iter(), ", ")
    }
}

impl fmt::Display for FieldingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "error by {}", self.fielder)?;
        if let Some(thrower) = self.thrower {
            write!(f, " on throw from {thrower}")?;
        }
        if self.throwing {
            f.write_str(" (throwing)")?;
        }
        Ok(())
    }
}

impl fmt::Display for Fielding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Fielding::Error(error) => write!(f, "{error}"),
            Fielding::Assists(fielders) => write!(f, "{fielders}"),
        }
    }
}

impl fmt::Display for RunAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunAnnotation::Error(error) => write!(f, "{error}"),
            RunAnnotation::TeamUnearnedRun => f.write_str("Team Unearned Run"),
            RunAnnotation::UnearnedRun => f.write_str("Unearned Run"),
            RunAnnotation::RbiCredited => f.write_str("RBI credited"),
            RunAnnotation::NoRbiCredited => f.write_str("No RBI credited"),
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())?;
        let annotations = self.annotations();
        if !annotations.is_empty() {
            f.write_str(" (")?;
            write_joined(f, annotations, ", ")?;
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Hit::Single { fielders } => write!(f, "Single to {fielders}"),
            Hit::Double { fielders } => write!(f, "Double to {fielders}"),
            Hit::Triple { fielders } => write!(f, "Triple to {fielders}"),
            Hit::InsideTheParkHomeRun { fielders } => {
                write!(f, "Inside The Park Home Run to {fielders}")
            }
            Hit::HomeRun => f.write_str("Home Run"),
            Hit::GroundRuleDouble => f.write_str("Ground Rule Double"),
        }
    }
}

impl fmt::Display for Baserunning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Baserunning::Balk => f.write_str("Balk"),
            Baserunning::CaughtStealing { base, fielders } => {
                write!(f, "Caught Stealing at {base}, {fielders}")
            }
            Baserunning::PickOff { base, fielding } => {
                write!(f, "Pick Off at {base}, {fielding}")
            }
            Baserunning::DoubleSteal { bases } => {
                f.write_str("Double Steal of ")?;
                write_joined(f, bases, " and ")
            }
            Baserunning::StolenBase { base } => write!(f, "Stolen Base {base}"),
            Baserunning::PassedBall => f.write_str("Passed Ball"),
            Baserunning::DefensiveIndifference => f.write_str("Defensive Indifference"),
            Baserunning::WildPitch => f.write_str("Wild Pitch"),
        }
    }
}

fn write_add_ons(f: &mut fmt::Formatter, add_ons: &[Baserunning]) -> fmt::Result {
    for add_on in add_ons {
        write!(f, " + {add_on}")?;
    }
    Ok(())
}

impl fmt::Display for BasicPlay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BasicPlay::ErrorOnFoulFly { fielder } => {
                write!(f, "Error on foul fly ball by {fielder}")
            }
            BasicPlay::NoPlay => f.write_str("No Play"),
            BasicPlay::Baserunning(event) => write!(f, "{event}"),
            BasicPlay::FieldersChoice { fielders } => {
                f.write_str("Fielders Choice")?;
                match fielders {
                    Some(fielders) => write!(f, ", {fielders}"),
                    None => Ok(()),
                }
            }
            BasicPlay::Error(error) => write!(f, "Error, {}", error.fielder),
            BasicPlay::DoublePlay {
                first,
                base,
                second,
            } => write!(f, "Double Play, {first} out at {base}, {second}"),
            BasicPlay::Out { fielders, base } => {
                write!(f, "Out, {fielders}")?;
                match base {
                    Some(base) => write!(f, " at {base}"),
                    None => Ok(()),
                }
            }
            BasicPlay::Walk { baserunning } => {
                f.write_str("Walk")?;
                write_add_ons(f, baserunning)
            }
            BasicPlay::HitByPitch => f.write_str("Hit By Pitch"),
            BasicPlay::Hit(hit) => write!(f, "{hit}"),
            BasicPlay::Strikeout { baserunning } => {
                f.write_str("Strikeout")?;
                write_add_ons(f, baserunning)
            }
            BasicPlay::IntentionalWalk { baserunning } => {
                f.write_str("Intentional Walk")?;
                write_add_ons(f, baserunning)
            }
            BasicPlay::Interference { fielder } => {
                write!(f, "Interference by {fielder}")
            }
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Zone::Fielder(fielder) => write!(f, "{fielder}"),
            Zone::Unknown => f.write_str("unknown location"),
        }
    }
}

impl fmt::Display for HitLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut words: Vec<String> = Vec::new();
        match self.contact {
            Some(Contact::Hard) => words.push("hard".into()),
            Some(Contact::Soft) => words.push("soft".into()),
            None => {}
        }
        match self.severity {
            Some(Severity::Medium) => words.push("medium".into()),
            Some(Severity::Extra) => words.push("extra".into()),
            None => {}
        }
        match self.depth {
            Some(Depth::Deep) => words.push("deep".into()),
            Some(Depth::Shallow) => words.push("shallow".into()),
            None => {}
        }
        words.push(
            self.zones
                .iter()
                .map(Zone::to_string)
                .collect::<Vec<_>>()
                .join("-"),
        );
        if self.toward_line {
            words.push("down the line".into());
        }
        if self.foul {
            words.push("(foul)".into());
        }
        f.write_str(&words.join(" "))
    }
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            ModifierKind::AppealPlay => "Appeal Play",
            ModifierKind::BuntGroundedIntoDoublePlay => "bunt grounded into double play",
            ModifierKind::GroundBallBunt => "ground ball bunt",
            ModifierKind::BatterInterference => "batter interference",
            ModifierKind::LineDriveBunt => "line drive bunt",
            ModifierKind::BattingOutOfTurn => "batting out of turn",
            ModifierKind::BuntPoppedIntoDoublePlay => "bunt popped into double play",
            ModifierKind::BuntPopUp => "bunt pop up",
            ModifierKind::RunnerHitByBattedBall => "runner hit by batted ball",
            ModifierKind::CourtesyBatter => "courtesy batter",
            ModifierKind::CourtesyFielder => "courtesy fielder",
            ModifierKind::CourtesyRunner => "courtesy runner",
            ModifierKind::CalledThirdStrike => "called third strike",
            ModifierKind::DoublePlay => "Double play",
            ModifierKind::Error(fielder) => return write!(f, "error by {fielder}"),
            ModifierKind::FlyBallDoublePlay => "fly ball double play",
            ModifierKind::FanInterference => "fan interference",
            ModifierKind::Foul => "foul",
            ModifierKind::ForceOut => "force out",
            ModifierKind::Fly => "fly",
            ModifierKind::GroundBallDoublePlay => "ground ball double play",
            ModifierKind::GroundBallTriplePlay => "ground ball triple play",
            ModifierKind::GroundBall => "ground ball",
            ModifierKind::InfieldFly => "infield fly rule",
            ModifierKind::Interference => "interference",
            ModifierKind::InsideTheParkHomeRun => "inside the park home run",
            ModifierKind::LinedIntoDoublePlay => "lined into double play",
            ModifierKind::LinedIntoTriplePlay => "lined into triple play",
            ModifierKind::LineDrive => "line drive",
            ModifierKind::ManagerReview => "manager challenge of call on the field",
            ModifierKind::NoDoublePlay => "no double play credited for this play",
            ModifierKind::Obstruction => "obstruction (fielder obstructing a runner)",
            ModifierKind::RunnerPassed => "a runner passed another runner and was called out",
            ModifierKind::PopFly => "pop fly",
            ModifierKind::RunnerInterference => "runner interference",
            ModifierKind::Relay(fielder) => {
                return write!(f, "relay throw from the initial fielder to {fielder} with no out made")
            }
            ModifierKind::SacrificeFly => "sacrifice fly",
            ModifierKind::SacrificeHit => "sacrifice hit (bunt)",
            ModifierKind::ThrowTo(base) => return write!(f, "throw to base {base}"),
            ModifierKind::Throw => "throw",
            ModifierKind::TriplePlay => "Triple play",
            ModifierKind::UmpireInterference => "umpire interference",
            ModifierKind::UmpireReview => "umpire review of call on the field",
        };
        f.write_str(text)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(location) = &self.location {
            write!(f, " ({location})")?;
        }
        Ok(())
    }
}

impl fmt::Display for Advancement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Advancement::Successful { from, to, error } => {
                if to.is_home() {
                    write!(f, "{} scores", from.label())?;
                    let annotations = to.annotations();
                    if !annotations.is_empty() {
                        f.write_str(" (")?;
                        write_joined(f, annotations, ", ")?;
                        f.write_str(")")?;
                    }
                } else {
                    write!(f, "{} to {to}", from.label())?;
                }
                match error {
                    Some(error) => write!(f, " on {error}"),
                    None => Ok(()),
                }
            }
            Advancement::Failed { from, to, fielding } => {
                if !self.is_charged_out() {
                    write!(f, "{} safe at {to}", from.label())?;
                    return match fielding {
                        Some(fielding) => write!(f, " on {fielding}"),
                        None => Ok(()),
                    };
                }
                write!(f, "{} out at {to}", from.label())?;
                match fielding {
                    Some(fielding) => write!(f, ", {fielding}"),
                    None => Ok(()),
                }
            }
        }
    }
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.basic)?;
        if !self.modifiers.is_empty() {
            f.write_str(" (")?;
            write_joined(f, &self.modifiers, "; ")?;
            f.write_str(")")?;
        }
        for advancement in &self.advancements {
            write!(f, "; {advancement}")?;
        }
        Ok(())
    }
}
