//! Applies one parsed play to a game state

use tracing::{debug, trace, warn};

use super::appearance::Appearance;
use super::state::GameState;
use super::stats::StatKind;
use crate::error::{CoreError, Result};
use crate::play::{Advancement, Base, Baserunning, BasicPlay, Hit, Play};

/// Scratch space for one reduction: the untouched input, the state being
/// built and a signed out counter (strikeout corrections may dip below the
/// starting value before settling).
struct Reduction<'a> {
    before: &'a GameState,
    next: GameState,
    outs: i32,
}

impl<'a> Reduction<'a> {
    fn new(before: &'a GameState) -> Self {
        Self {
            before,
            next: before.clone(),
            outs: i32::from(before.outs),
        }
    }

    fn batter(&self) -> &'a Appearance {
        &self.before.batting
    }

    fn out(&mut self, count: i32) {
        self.outs += count;
    }

    fn score(&mut self, runs: u32) {
        let team = self.before.batting_team;
        *self.next.score.get_mut(team) += runs;
    }

    fn advance_batter(&mut self) {
        let team = self.before.batting_team;
        *self.next.next_up.get_mut(team) = self.before.slots_away(team, 1);
    }

    fn record(&mut self, kind: StatKind) {
        self.next.stats.stat(&self.before.batting).record(kind);
    }

    fn place(&mut self, base: &Base, runner: Appearance) {
        if let Some(slot) = base.slot() {
            self.next.bases[slot] = Some(runner);
        }
    }

    fn place_batter(&mut self, base: Base) {
        let batter = self.batter().clone();
        self.place(&base, batter);
    }

    fn clear(&mut self, base: &Base) {
        if let Some(slot) = base.slot() {
            self.next.bases[slot] = None;
        }
    }

    /// Take `runner` off whichever base they occupy in the state being built.
    fn lift(&mut self, runner: &Appearance) {
        for occupant in self.next.bases.iter_mut() {
            if occupant.as_ref().is_some_and(|o| o.is_same_stint(runner)) {
                *occupant = None;
            }
        }
    }

    /// Caught stealing or pick off riding on a strikeout or walk.
    fn retire_add_on(&mut self, event: &Baserunning) {
        match event {
            Baserunning::CaughtStealing { base, .. } => {
                self.out(1);
                if let Some(from) = base.preceding() {
                    self.clear(&from);
                }
            }
            Baserunning::PickOff { base, .. } => {
                self.out(1);
                self.clear(base);
            }
            _ => {}
        }
    }

    fn apply_basic(&mut self, basic: &BasicPlay, advancements: &[Advancement]) {
        match basic {
            BasicPlay::Out { .. } => {
                self.out(1);
                self.advance_batter();
                self.record(StatKind::AtBats);
            }
            BasicPlay::Strikeout { baserunning } => {
                self.out(1);
                self.advance_batter();
                self.record(StatKind::Strikeouts);
                for event in baserunning.iter().filter(|e| e.retires_runner()) {
                    self.retire_add_on(event);
                }
                // Batter reached anyway (dropped third strike, error on the throw)
                for advancement in advancements.iter().filter(|a| a.from().is_home()) {
                    trace!(%advancement, "strikeout out corrected");
                    self.out(-1);
                }
            }
            BasicPlay::Walk { baserunning } | BasicPlay::IntentionalWalk { baserunning } => {
                self.record(StatKind::Walks);
                for event in baserunning.iter().filter(|e| e.retires_runner()) {
                    self.retire_add_on(event);
                }
                self.place_batter(Base::First);
                self.advance_batter();
            }
            BasicPlay::HitByPitch => {
                self.record(StatKind::HitByPitches);
                self.place_batter(Base::First);
                self.advance_batter();
            }
            BasicPlay::Baserunning(Baserunning::PickOff { base, fielding }) => {
                if !fielding.is_error() {
                    self.out(1);
                }
                self.clear(base);
            }
            BasicPlay::Baserunning(Baserunning::CaughtStealing { base, .. }) => {
                self.out(1);
                if let Some(from) = base.preceding() {
                    self.clear(&from);
                }
            }
            BasicPlay::DoublePlay { .. } => {
                self.out(2);
                self.advance_batter();
            }
            BasicPlay::Hit(hit) => {
                self.advance_batter();
                match hit {
                    Hit::HomeRun | Hit::InsideTheParkHomeRun { .. } => {
                        self.score(1);
                        self.record(StatKind::HomeRuns);
                    }
                    Hit::Single { .. } => {
                        self.place_batter(Base::First);
                        self.record(StatKind::Singles);
                    }
                    Hit::Double { .. } | Hit::GroundRuleDouble => {
                        self.place_batter(Base::Second);
                        self.record(StatKind::Doubles);
                    }
                    Hit::Triple { .. } => {
                        self.place_batter(Base::Third);
                        self.record(StatKind::Triples);
                    }
                }
            }
            BasicPlay::Error(_)
            | BasicPlay::FieldersChoice { .. }
            | BasicPlay::Interference { .. } => self.advance_batter(),
            BasicPlay::Baserunning(_) | BasicPlay::NoPlay | BasicPlay::ErrorOnFoulFly { .. } => {}
        }
    }

    fn apply_advancement(&mut self, advancement: &Advancement) {
        let from = advancement.from();
        let runner = if from.is_home() {
            Some(self.batter().clone())
        } else {
            from.slot().and_then(|slot| self.before.bases[slot].clone())
        };

        if let Some(runner) = &runner {
            self.lift(runner);
        }

        let Advancement::Successful { to, .. } = advancement else {
            // A failed clause only moves the out count; the runner is off the bases either way
            let charged = advancement.is_charged_out();
            if charged {
                self.out(1);
            }
            trace!(%advancement, charged, runner = ?runner.as_ref().map(|r| &r.player_id), "failed advancement");
            return;
        };
        trace!(%advancement, runner = ?runner.as_ref().map(|r| &r.player_id), "advancement");

        if to.is_home() {
            self.score(1);
        } else {
            match runner {
                Some(runner) => self.place(to, runner),
                None => warn!(%advancement, "no runner on {} to advance", from.label()),
            }
        }
    }

    fn finish(mut self) -> Result<GameState> {
        self.next.outs = u8::try_from(self.outs.max(0)).unwrap_or(u8::MAX);
        self.next.settle()?;
        Ok(self.next)
    }
}

/// Apply `play` by `batter_id` to `state`, returning the next state.
///
/// Fails when `batter_id` is not the batter `state` expects; the log and the
/// simulation have diverged and the game cannot continue.
pub fn reduce_state(state: &GameState, play: &Play, batter_id: &str) -> Result<GameState> {
    if state.batting.player_id != batter_id {
        return Err(CoreError::BatterMismatch {
            expected: state.batting.to_string(),
            actual: batter_id.to_string(),
        });
    }

    let mut reduction = Reduction::new(state);
    reduction.apply_basic(&play.basic, &play.advancements);
    for advancement in &play.advancements {
        reduction.apply_advancement(advancement);
    }

    let next = reduction.finish()?;
    debug!(
        batter = batter_id,
        play = %play,
        outs = next.outs,
        away = next.score.away,
        home = next.score.home,
        "reduced play"
    );
    Ok(next)
}
