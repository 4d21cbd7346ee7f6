//! Immutable game snapshot
//!
//! Every change produces a new [`GameState`] through [`GameState::transition`].
//! A settled snapshot never shows three outs, and its pitcher and batter
//! pointers always name active appearances.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::appearance::{Appearance, Team};
use super::stats::Stats;
use crate::error::{CoreError, Result, Role};

/// A value kept for each side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerTeam<T> {
    pub away: T,
    pub home: T,
}

impl<T> PerTeam<T> {
    pub fn get(&self, team: Team) -> &T {
        match team {
            Team::Away => &self.away,
            Team::Home => &self.home,
        }
    }

    pub fn get_mut(&mut self, team: Team) -> &mut T {
        match team {
            Team::Away => &mut self.away,
            Team::Home => &mut self.home,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    /// Active appearances, one per occupied (team, slot)
    pub players: Vec<Appearance>,
    /// 1B, 2B, 3B
    pub bases: [Option<Appearance>; 3],
    pub outs: u8,
    pub score: PerTeam<u32>,
    pub batting_team: Team,
    pub inning: u32,
    pub pitching: Appearance,
    pub batting: Appearance,
    pub on_deck: Appearance,
    pub in_the_hole: Appearance,
    /// Batting slot (1-9) due up next for each team
    pub next_up: PerTeam<u8>,
    pub stats: Stats,
}

/// One lineup change: who left the slot and who took it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub from: Appearance,
    pub to: Appearance,
}

struct Pointers {
    pitching: Appearance,
    batting: Appearance,
    on_deck: Appearance,
    in_the_hole: Appearance,
}

fn slots_away(next_up: u8, slots: u8) -> u8 {
    ((next_up - 1 + slots % 9) % 9) + 1
}

fn resolve_pointers(players: &[Appearance], batting_team: Team, next_up: u8) -> Result<Pointers> {
    let pitching = players
        .iter()
        .find(|p| p.is_pitcher() && p.team == batting_team.opponent())
        .ok_or(CoreError::MissingAppearance {
            role: Role::Pitcher,
            team: batting_team.opponent(),
        })?;

    let in_slot = |slots: u8, role: Role| {
        let slot = slots_away(next_up, slots);
        players
            .iter()
            .find(|p| p.team == batting_team && p.slot == slot)
            .cloned()
            .ok_or(CoreError::MissingAppearance {
                role,
                team: batting_team,
            })
    };

    Ok(Pointers {
        pitching: pitching.clone(),
        batting: in_slot(0, Role::Batter)?,
        on_deck: in_slot(1, Role::OnDeck)?,
        in_the_hole: in_slot(2, Role::InTheHole)?,
    })
}

impl GameState {
    /// Top of the first, away team up, leadoff hitters due for both sides.
    pub fn initial(starters: &[Appearance]) -> Result<Self> {
        let next_up = PerTeam { away: 1, home: 1 };
        let pointers = resolve_pointers(starters, Team::Away, next_up.away)?;

        let mut state = Self {
            players: starters.to_vec(),
            bases: [None, None, None],
            outs: 0,
            score: PerTeam::default(),
            batting_team: Team::Away,
            inning: 1,
            pitching: pointers.pitching,
            batting: pointers.batting,
            on_deck: pointers.on_deck,
            in_the_hole: pointers.in_the_hole,
            next_up,
            stats: Stats::new(),
        };
        state.settle()?;
        Ok(state)
    }

    /// Slot `slots` places after the one due up for `team`, wrapping 9 -> 1.
    pub fn slots_away(&self, team: Team, slots: u8) -> u8 {
        slots_away(*self.next_up.get(team), slots)
    }

    /// Copy this state, apply `change`, then settle the copy.
    pub fn transition(&self, change: impl FnOnce(&mut GameState)) -> Result<GameState> {
        let mut next = self.clone();
        change(&mut next);
        next.settle()?;
        Ok(next)
    }

    /// Roll over a finished half-inning, keep every active appearance in the
    /// statistics and re-resolve the derived pointers.
    pub(crate) fn settle(&mut self) -> Result<()> {
        if self.outs >= 3 {
            if self.batting_team == Team::Home {
                self.inning += 1;
            }
            self.batting_team = self.batting_team.opponent();
            self.bases = [None, None, None];
            self.outs = 0;
            debug!(
                inning = self.inning,
                batting = %self.batting_team,
                "half-inning over"
            );
        }

        for app in &self.players {
            self.stats.touch(app);
        }

        let pointers = resolve_pointers(
            &self.players,
            self.batting_team,
            *self.next_up.get(self.batting_team),
        )?;
        self.pitching = pointers.pitching;
        self.batting = pointers.batting;
        self.on_deck = pointers.on_deck;
        self.in_the_hole = pointers.in_the_hole;
        Ok(())
    }

    /// Replace whoever holds `incoming`'s (team, slot).
    pub fn with_substitution(&self, incoming: Appearance) -> Result<(GameState, Substitution)> {
        let idx = self
            .players
            .iter()
            .position(|p| p.team == incoming.team && p.slot == incoming.slot)
            .ok_or_else(|| CoreError::MissingSubstitutionSlot {
                team: incoming.team,
                slot: incoming.slot,
                player_id: incoming.player_id.clone(),
            })?;

        let outgoing = self.players[idx].clone();
        let incoming = outgoing.succeeded_by(incoming);

        let next = self.transition(|state| {
            for runner in state.bases.iter_mut().flatten() {
                if runner.is_same_stint(&outgoing) {
                    *runner = incoming.clone();
                }
            }
            state.players[idx] = incoming.clone();
        })?;
        Ok((
            next,
            Substitution {
                from: outgoing,
                to: incoming,
            },
        ))
    }

    /// Put an active player on a base (0 = 1B), as a runner adjustment does.
    pub fn with_runner(&self, player_id: &str, base: usize) -> Result<GameState> {
        let runner = self
            .players
            .iter()
            .find(|p| p.player_id == player_id)
            .cloned()
            .ok_or_else(|| CoreError::MissingRunner {
                player_id: player_id.to_string(),
            })?;
        self.transition(|state| {
            if let Some(slot) = state.bases.get_mut(base) {
                *slot = Some(runner);
            }
        })
    }

    pub fn runner_count(&self) -> usize {
        self.bases.iter().flatten().count()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{initial, starters};
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_initial_state() {
        let state = initial();
        assert_eq!(state.inning, 1);
        assert_eq!(state.batting_team, Team::Away);
        assert_eq!(state.outs, 0);
        assert_eq!(state.runner_count(), 0);
        assert_eq!(state.batting.player_id, "a1");
        assert_eq!(state.on_deck.player_id, "a2");
        assert_eq!(state.in_the_hole.player_id, "a3");
        assert_eq!(state.pitching.player_id, "h9");
        assert_eq!(state.stats.len(), 18);
    }

    #[test]
    fn test_initial_state_needs_a_pitcher() {
        let players: Vec<_> = starters().into_iter().filter(|p| p.player_id != "h9").collect();
        let err = GameState::initial(&players).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MissingAppearance {
                role: Role::Pitcher,
                team: Team::Home
            }
        ));
    }

    #[test]
    fn test_third_out_rolls_half_inning() {
        let state = initial();
        let top_done = state
            .transition(|s| {
                s.outs = 3;
                s.bases[1] = Some(s.batting.clone());
            })
            .unwrap();
        assert_eq!(top_done.batting_team, Team::Home);
        assert_eq!(top_done.inning, 1);
        assert_eq!(top_done.outs, 0);
        assert_eq!(top_done.runner_count(), 0);
        assert_eq!(top_done.pitching.player_id, "a9");

        let bottom_done = top_done.transition(|s| s.outs = 3).unwrap();
        assert_eq!(bottom_done.batting_team, Team::Away);
        assert_eq!(bottom_done.inning, 2);
    }

    #[test]
    fn test_transition_leaves_input_untouched() {
        let state = initial();
        let next = state.transition(|s| s.outs = 2).unwrap();
        assert_eq!(state.outs, 0);
        assert_eq!(next.outs, 2);
    }

    #[test]
    fn test_substitution_bumps_stint_and_replaces_runner() {
        let state = initial()
            .transition(|s| s.bases[0] = Some(s.batting.clone()))
            .unwrap();
        let runner = Appearance::new("pr", "Pinch Runner", Team::Away, 1, "12");
        let (next, sub) = state.with_substitution(runner).unwrap();

        assert_eq!(sub.from.player_id, "a1");
        assert_eq!(sub.to.appearance_number, 1);
        let on_first = next.bases[0].as_ref().unwrap();
        assert_eq!(on_first.player_id, "pr");
        assert_eq!(on_first.appearance_number, 1);
        assert_eq!(next.batting.player_id, "pr");
        assert_eq!(next.stats.len(), 19);
    }

    #[test]
    fn test_substitution_without_slot_fails() {
        let ghost = Appearance::new("x", "Ghost", Team::Home, 0, "1");
        let err = initial().with_substitution(ghost).unwrap_err();
        assert!(matches!(err, CoreError::MissingSubstitutionSlot { slot: 0, .. }));
    }

    #[test]
    fn test_runner_adjustment() {
        let state = initial().with_runner("a9", 1).unwrap();
        assert_eq!(state.bases[1].as_ref().unwrap().player_id, "a9");
        assert!(matches!(
            initial().with_runner("nobody", 1),
            Err(CoreError::MissingRunner { .. })
        ));
    }

    proptest! {
        #[test]
        fn test_batting_order_cycles_through_nine(start in 1u8..=9, times in 0u8..30) {
            let state = initial().transition(|s| s.next_up.away = start).unwrap();
            let slot = state.slots_away(Team::Away, times);
            prop_assert!((1..=9).contains(&slot));
            prop_assert_eq!(slot as u32, ((start as u32 - 1 + times as u32) % 9) + 1);
        }
    }
}
