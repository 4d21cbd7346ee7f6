//! Typed event-file records
//!
//! Each CSV row is read through a [`FieldCursor`], which walks the row's
//! fields by index and reports the first missing or malformed one.

use std::str::FromStr;

use csv::StringRecord;

use crate::error::{CoreError, Result};
use crate::game::{Appearance, Team};

// ============================================================================
// Cursor
// ============================================================================

pub struct FieldCursor<'r> {
    record: &'r StringRecord,
    index: usize,
    line: usize,
}

impl<'r> FieldCursor<'r> {
    /// Positioned after the record type in field 0.
    pub fn new(record: &'r StringRecord, line: usize) -> Self {
        Self {
            record,
            index: 1,
            line,
        }
    }

    pub fn kind(&self) -> &'r str {
        self.record.get(0).unwrap_or("")
    }

    pub fn line(&self) -> usize {
        self.line
    }

    fn malformed(&self, reason: String) -> CoreError {
        CoreError::MalformedRecord {
            line: self.line,
            kind: self.kind().to_string(),
            reason,
        }
    }

    pub fn next(&mut self, what: &str) -> Result<&'r str> {
        let field = self
            .record
            .get(self.index)
            .ok_or_else(|| self.malformed(format!("missing {what}")))?;
        self.index += 1;
        Ok(field)
    }

    pub fn next_parsed<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let field = self.next(what)?;
        field
            .trim()
            .parse()
            .map_err(|_| self.malformed(format!("invalid {what} `{field}`")))
    }

    pub fn next_team(&mut self) -> Result<Team> {
        let field = self.next("team")?;
        Team::from_code(field).ok_or_else(|| self.malformed(format!("invalid team `{field}`")))
    }

    /// Every field not yet consumed.
    pub fn rest(&mut self) -> Vec<String> {
        let rest = self
            .record
            .iter()
            .skip(self.index)
            .map(str::to_string)
            .collect();
        self.index = self.record.len();
        rest
    }

    /// Check nothing is left over. Leftovers are only an error when `strict`.
    pub fn finish(mut self, strict: bool) -> Result<Vec<String>> {
        let kind = self.kind().to_string();
        let line = self.line;
        let fields = self.rest();
        if strict && !fields.is_empty() {
            return Err(CoreError::TrailingFields { line, kind, fields });
        }
        Ok(fields)
    }
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRecord {
    pub inning: u32,
    pub team: Team,
    pub batter_id: String,
    /// `balls-strikes` when known, as written otherwise
    pub count: String,
    pub pitches: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Id(String),
    Version(String),
    Info { key: String, value: String },
    Start(Appearance),
    Sub(Appearance),
    Play(PlayRecord),
    Comment(String),
    Data(Vec<String>),
    /// Runner placed on a base before play starts (0 = 1B)
    RunnerAdjustment { player_id: String, base: usize },
    /// Batter hitting from the unusual side
    BatterHand { player_id: String, hand: String },
    /// Known record type this ingestor keeps only as a comment
    Unhandled { kind: String, fields: Vec<String> },
    Unknown { kind: String, fields: Vec<String> },
}

/// `12` -> `1-2`; anything else is kept as written.
pub fn format_count(count: &str) -> String {
    let bytes = count.as_bytes();
    if bytes.len() == 2 && bytes.iter().all(u8::is_ascii_digit) {
        format!("{}-{}", &count[..1], &count[1..])
    } else {
        count.to_string()
    }
}

fn read_appearance(cursor: &mut FieldCursor) -> Result<Appearance> {
    let player_id = cursor.next("player id")?;
    let name = cursor.next("name")?;
    let team = cursor.next_team()?;
    let slot: u8 = cursor.next_parsed("batting slot")?;
    if slot > 9 {
        return Err(cursor.malformed(format!("batting slot {slot} out of range")));
    }
    let position = cursor.next("position")?;
    Ok(Appearance::new(player_id, name, team, slot, position.trim()))
}

impl Record {
    /// Read one row's known fields; leftovers are checked by [`FieldCursor::finish`].
    pub fn read(cursor: &mut FieldCursor) -> Result<Record> {
        let record = match cursor.kind() {
            "id" => Record::Id(cursor.next("game id")?.to_string()),
            "version" => Record::Version(cursor.next("version")?.to_string()),
            "info" => Record::Info {
                key: cursor.next("key")?.to_string(),
                value: cursor.next("value").unwrap_or("").to_string(),
            },
            "start" => Record::Start(read_appearance(cursor)?),
            "sub" => Record::Sub(read_appearance(cursor)?),
            "play" => Record::Play(PlayRecord {
                inning: cursor.next_parsed("inning")?,
                team: cursor.next_team()?,
                batter_id: cursor.next("batter id")?.to_string(),
                count: format_count(cursor.next("count")?),
                pitches: cursor.next("pitches")?.to_string(),
                code: cursor.next("play code")?.to_string(),
            }),
            "com" => Record::Comment(cursor.next("comment")?.to_string()),
            "data" => Record::Data(cursor.rest()),
            "radj" => {
                let player_id = cursor.next("player id")?.to_string();
                let base: usize = cursor.next_parsed("base")?;
                if !(1..=3).contains(&base) {
                    return Err(cursor.malformed(format!("base {base} out of range")));
                }
                Record::RunnerAdjustment {
                    player_id,
                    base: base - 1,
                }
            }
            "badj" => Record::BatterHand {
                player_id: cursor.next("player id")?.to_string(),
                hand: cursor.next("hand")?.to_string(),
            },
            kind @ ("stat" | "event" | "line" | "padj" | "ladj" | "presadj") => Record::Unhandled {
                kind: kind.to_string(),
                fields: cursor.rest(),
            },
            kind => Record::Unknown {
                kind: kind.to_string(),
                fields: cursor.rest(),
            },
        };
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    fn read(fields: &[&str]) -> Result<Record> {
        let record = row(fields);
        let mut cursor = FieldCursor::new(&record, 7);
        let parsed = Record::read(&mut cursor)?;
        cursor.finish(true)?;
        Ok(parsed)
    }

    #[test]
    fn test_count_formatting() {
        assert_eq!(format_count("12"), "1-2");
        assert_eq!(format_count("??"), "??");
        assert_eq!(format_count(""), "");
    }

    #[test]
    fn test_play_record() {
        let parsed = read(&["play", "3", "1", "judga001", "32", "BCFBBX", "S9.1-3"]).unwrap();
        assert_eq!(
            parsed,
            Record::Play(PlayRecord {
                inning: 3,
                team: Team::Home,
                batter_id: "judga001".into(),
                count: "3-2".into(),
                pitches: "BCFBBX".into(),
                code: "S9.1-3".into(),
            })
        );
    }

    #[test]
    fn test_start_record() {
        let parsed = read(&["start", "colea001", "Gerrit Cole", "1", "0", "1"]).unwrap();
        let Record::Start(app) = parsed else {
            panic!("expected start");
        };
        assert_eq!(app.slot, 0);
        assert!(app.is_pitcher());
        assert_eq!(app.team, Team::Home);
    }

    #[test]
    fn test_missing_field_names_it() {
        let err = read(&["play", "3", "1"]).unwrap_err();
        match err {
            CoreError::MalformedRecord { line, kind, reason } => {
                assert_eq!(line, 7);
                assert_eq!(kind, "play");
                assert_eq!(reason, "missing batter id");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_bad_team_and_slot() {
        assert!(read(&["start", "x", "X", "2", "1", "6"]).is_err());
        assert!(read(&["sub", "x", "X", "0", "10", "6"]).is_err());
    }

    #[test]
    fn test_trailing_fields() {
        let err = read(&["com", "hello", "extra"]).unwrap_err();
        assert!(matches!(err, CoreError::TrailingFields { ref fields, .. } if fields == &["extra"]));

        let record = row(&["com", "hello", "extra"]);
        let mut cursor = FieldCursor::new(&record, 1);
        Record::read(&mut cursor).unwrap();
        assert_eq!(cursor.finish(false).unwrap(), vec!["extra".to_string()]);
    }

    #[test]
    fn test_runner_adjustment_base_is_zero_based() {
        assert_eq!(
            read(&["radj", "judga001", "2"]).unwrap(),
            Record::RunnerAdjustment {
                player_id: "judga001".into(),
                base: 1
            }
        );
        assert!(read(&["radj", "judga001", "4"]).is_err());
    }

    #[test]
    fn test_data_and_unknown_consume_everything() {
        assert_eq!(
            read(&["data", "er", "colea001", "2"]).unwrap(),
            Record::Data(vec!["er".into(), "colea001".into(), "2".into()])
        );
        assert!(matches!(
            read(&["bogus", "1"]).unwrap(),
            Record::Unknown { ref kind, .. } if kind == "bogus"
        ));
        assert!(matches!(
            read(&["padj", "x", "L"]).unwrap(),
            Record::Unhandled { ref kind, .. } if kind == "padj"
        ));
    }
}
