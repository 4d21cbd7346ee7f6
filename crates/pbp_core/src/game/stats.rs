//! Per-appearance batting statistics
//!
//! [`Stats`] is copied once per state transition, so entries are shared
//! behind `Arc` and only cloned when a transition actually writes to them.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use super::appearance::{Appearance, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    AtBats,
    Singles,
    Doubles,
    Triples,
    HomeRuns,
    Walks,
    HitByPitches,
    Strikeouts,
    /// Derived, never recorded directly
    Hits,
    /// Derived, never recorded directly
    PlateAppearances,
}

impl StatKind {
    pub fn is_derived(self) -> bool {
        matches!(self, StatKind::Hits | StatKind::PlateAppearances)
    }

    /// Counting kinds that also charge an at-bat
    fn charges_at_bat(self) -> bool {
        matches!(
            self,
            StatKind::Singles
                | StatKind::Doubles
                | StatKind::Triples
                | StatKind::HomeRuns
                | StatKind::Strikeouts
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statline {
    positions: Vec<String>,
    at_bats: u32,
    plate_appearances: u32,
    hit_by_pitches: u32,
    singles: u32,
    doubles: u32,
    triples: u32,
    home_runs: u32,
    hits: u32,
    walks: u32,
    strikeouts: u32,
}

impl Statline {
    pub fn record(&mut self, kind: StatKind) {
        self.record_n(kind, 1);
    }

    /// # Panics
    /// When `kind` is derived; hits and plate appearances are always recomputed.
    pub fn record_n(&mut self, kind: StatKind, count: u32) {
        let field = match kind {
            StatKind::AtBats => &mut self.at_bats,
            StatKind::Singles => &mut self.singles,
            StatKind::Doubles => &mut self.doubles,
            StatKind::Triples => &mut self.triples,
            StatKind::HomeRuns => &mut self.home_runs,
            StatKind::Walks => &mut self.walks,
            StatKind::HitByPitches => &mut self.hit_by_pitches,
            StatKind::Strikeouts => &mut self.strikeouts,
            StatKind::Hits | StatKind::PlateAppearances => {
                panic!("do not record {kind:?} directly")
            }
        };
        *field += count;

        if kind.charges_at_bat() {
            self.at_bats += count;
        }

        self.hits = self.singles + self.doubles + self.triples + self.home_runs;
        self.plate_appearances = self.at_bats + self.walks + self.hit_by_pitches;
    }

    /// Append `position` unless it repeats the last one.
    fn note_position(&mut self, position: &str) {
        if self.needs_position(position) {
            self.positions.push(position.to_string());
        }
    }

    fn needs_position(&self, position: &str) -> bool {
        self.positions.last().map(String::as_str) != Some(position)
    }

    pub fn positions(&self) -> &[String] {
        &self.positions
    }

    pub fn at_bats(&self) -> u32 {
        self.at_bats
    }

    pub fn plate_appearances(&self) -> u32 {
        self.plate_appearances
    }

    pub fn hit_by_pitches(&self) -> u32 {
        self.hit_by_pitches
    }

    pub fn singles(&self) -> u32 {
        self.singles
    }

    pub fn doubles(&self) -> u32 {
        self.doubles
    }

    pub fn triples(&self) -> u32 {
        self.triples
    }

    pub fn home_runs(&self) -> u32 {
        self.home_runs
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn walks(&self) -> u32 {
        self.walks
    }

    pub fn strikeouts(&self) -> u32 {
        self.strikeouts
    }
}

/// Identity of a stint: everything about an appearance except its position
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatKey {
    pub team: Team,
    pub slot: u8,
    pub appearance_number: u32,
    pub player_id: String,
    pub name: String,
}

impl From<&Appearance> for StatKey {
    fn from(app: &Appearance) -> Self {
        Self {
            team: app.team,
            slot: app.slot,
            appearance_number: app.appearance_number,
            player_id: app.player_id.clone(),
            name: app.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    lines: BTreeMap<StatKey, Arc<Statline>>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get-or-create the statline for `app` and note its current position.
    pub fn stat(&mut self, app: &Appearance) -> &mut Statline {
        let line = Arc::make_mut(self.lines.entry(StatKey::from(app)).or_default());
        line.note_position(&app.position);
        line
    }

    /// Like [`Stats::stat`] but leaves a shared entry shared when nothing changes.
    pub fn touch(&mut self, app: &Appearance) {
        let entry = self.lines.entry(StatKey::from(app)).or_default();
        if entry.needs_position(&app.position) {
            Arc::make_mut(entry).note_position(&app.position);
        }
    }

    pub fn get(&self, app: &Appearance) -> Option<&Statline> {
        self.lines.get(&StatKey::from(app)).map(Arc::as_ref)
    }

    /// Snapshot sharing every entry with `self` until one side writes to it.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn all(&self) -> impl Iterator<Item = (&StatKey, &Statline)> {
        self.lines.iter().map(|(key, line)| (key, line.as_ref()))
    }

    /// One team's lines in batting order, stints in order, non-batting slot 0 last.
    pub fn team_lines(&self, team: Team) -> Vec<(&StatKey, &Statline)> {
        let mut lines: Vec<_> = self.all().filter(|(key, _)| key.team == team).collect();
        lines.sort_by_key(|(key, _)| (key.slot == 0, key.slot, key.appearance_number));
        lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[cfg(test)]
    fn shares_entry_with(&self, other: &Stats, app: &Appearance) -> bool {
        let key = StatKey::from(app);
        match (self.lines.get(&key), other.lines.get(&key)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[derive(Serialize)]
struct StatEntry<'a> {
    #[serde(flatten)]
    key: &'a StatKey,
    #[serde(flatten)]
    line: &'a Statline,
}

impl Serialize for Stats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.all().map(|(key, line)| StatEntry { key, line }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn batter() -> Appearance {
        Appearance::new("judga001", "Aaron Judge", Team::Home, 2, "9")
    }

    #[test]
    fn test_hits_charge_at_bats() {
        let mut line = Statline::default();
        line.record(StatKind::Singles);
        line.record(StatKind::HomeRuns);
        line.record(StatKind::Walks);
        assert_eq!(line.at_bats(), 2);
        assert_eq!(line.hits(), 2);
        assert_eq!(line.plate_appearances(), 3);
    }

    #[test]
    fn test_strikeout_charges_at_bat() {
        let mut line = Statline::default();
        line.record(StatKind::Strikeouts);
        assert_eq!(line.strikeouts(), 1);
        assert_eq!(line.at_bats(), 1);
        assert_eq!(line.hits(), 0);
    }

    #[test]
    #[should_panic(expected = "do not record")]
    fn test_recording_hits_directly_panics() {
        Statline::default().record(StatKind::Hits);
    }

    #[test]
    #[should_panic(expected = "do not record")]
    fn test_recording_plate_appearances_directly_panics() {
        Statline::default().record_n(StatKind::PlateAppearances, 2);
    }

    #[test]
    fn test_positions_dedup_only_consecutive() {
        let mut stats = Stats::new();
        let mut app = batter();
        stats.stat(&app);
        stats.stat(&app);
        app.position = "3".into();
        stats.stat(&app);
        app.position = "9".into();
        stats.touch(&app);

        let line = stats.get(&app).unwrap();
        assert_eq!(line.positions(), ["9", "3", "9"]);
        assert_eq!(stats.len(), 1);
    }

    #[test]
    fn test_key_ignores_position_but_not_stint() {
        let mut stats = Stats::new();
        let app = batter();
        stats.stat(&app).record(StatKind::Walks);

        let mut moved = app.clone();
        moved.position = "3".into();
        assert_eq!(stats.get(&moved).unwrap().walks(), 1);

        let mut next_stint = app.clone();
        next_stint.appearance_number = 1;
        assert!(stats.get(&next_stint).is_none());
    }

    #[test]
    fn test_copy_does_not_leak_writes_back() {
        let mut before = Stats::new();
        let app = batter();
        before.stat(&app).record(StatKind::Singles);

        let mut after = before.copy();
        assert!(after.shares_entry_with(&before, &app));
        after.touch(&app);
        assert!(after.shares_entry_with(&before, &app));

        after.stat(&app).record(StatKind::Doubles);
        assert!(!after.shares_entry_with(&before, &app));
        assert_eq!(before.get(&app).unwrap().hits(), 1);
        assert_eq!(after.get(&app).unwrap().hits(), 2);
    }

    #[test]
    fn test_team_lines_put_pitcher_slot_last() {
        let mut stats = Stats::new();
        stats.touch(&Appearance::new("p", "Pitcher", Team::Away, 0, "1"));
        stats.touch(&Appearance::new("b", "Second", Team::Away, 2, "4"));
        stats.touch(&Appearance::new("a", "First", Team::Away, 1, "8"));
        stats.touch(&Appearance::new("h", "Home", Team::Home, 1, "8"));

        let ids: Vec<_> = stats
            .team_lines(Team::Away)
            .iter()
            .map(|(key, _)| key.player_id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b", "p"]);
    }

    fn counting_kind() -> impl Strategy<Value = StatKind> {
        prop_oneof![
            Just(StatKind::AtBats),
            Just(StatKind::Singles),
            Just(StatKind::Doubles),
            Just(StatKind::Triples),
            Just(StatKind::HomeRuns),
            Just(StatKind::Walks),
            Just(StatKind::HitByPitches),
            Just(StatKind::Strikeouts),
        ]
    }

    proptest! {
        #[test]
        fn test_derived_totals_hold_after_every_record(
            records in prop::collection::vec((counting_kind(), 1u32..4), 0..64)
        ) {
            let mut line = Statline::default();
            for (kind, count) in records {
                line.record_n(kind, count);
                prop_assert_eq!(
                    line.hits(),
                    line.singles() + line.doubles() + line.triples() + line.home_runs()
                );
                prop_assert_eq!(
                    line.plate_appearances(),
                    line.at_bats() + line.walks() + line.hit_by_pitches()
                );
            }
        }
    }
}
