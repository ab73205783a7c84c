use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// --- Team Schedule (GET /teams/{id}/schedule) ---

/// TeamRef
///
/// Minimal team identity embedded in schedule rows. Any field may be missing when
/// the backend has no team assigned yet ("TBD").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct TeamRef {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub logo_url: Option<String>,
}

/// DivisionInfo
///
/// The division the team plays in for the requested season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct DivisionInfo {
    pub code: String,
    pub name: Option<String>,
    pub season: Option<String>,
}

/// ScheduleMatch
///
/// One fixture of a team schedule, seen from the requested team's side
/// (`is_home`, `opponent`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct ScheduleMatch {
    pub id: i64,
    pub round_no: Option<i64>,
    pub stage: Option<String>,
    /// Display status: normalized by the server unless `use_raw=1` was requested.
    pub status: String,
    #[serde(default)]
    pub raw_status: String,
    /// ISO date (`YYYY-MM-DD`).
    pub date: Option<String>,
    /// Local kick-off time (`HH:MM:SS`).
    pub time: Option<String>,
    #[ts(type = "string | number | null")]
    #[serde(default)]
    pub court_no: Option<serde_json::Value>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub home_score: i64,
    #[serde(default)]
    pub away_score: i64,
    #[serde(default)]
    pub home_team: TeamRef,
    #[serde(default)]
    pub away_team: TeamRef,
    #[serde(default)]
    pub is_home: bool,
    #[serde(default)]
    pub opponent: TeamRef,
}

impl ScheduleMatch {
    /// Parses `date` + `time` into a local timestamp. A missing time means midnight.
    pub fn kickoff(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(self.date.as_deref()?, "%Y-%m-%d").ok()?;
        let time = match self.time.as_deref() {
            Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
                .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
                .ok()?,
            None => NaiveTime::MIN,
        };
        Some(date.and_time(time))
    }
}

/// TeamSchedule
///
/// Payload of the team schedule endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct TeamSchedule {
    pub team: Option<TeamRef>,
    pub division: Option<DivisionInfo>,
    #[serde(default)]
    pub matches: Vec<ScheduleMatch>,
}

/// ScheduleOptions
///
/// Optional knobs for the schedule request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleOptions {
    pub season: Option<String>,
    /// Ask the server for the raw database status instead of the computed one.
    pub use_raw: bool,
}

// --- Boxscore & stat entry (GET /matches/{id}/boxscore, POST /matches/{id}/stat) ---

/// PlayerRow
///
/// One player's line in a match boxscore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct PlayerRow {
    pub player_id: i64,
    pub team_id: i64,
    pub one: i64,
    pub two: i64,
    pub three: i64,
    pub foul: i64,
    pub points: i64,
    // Jersey number, when the roster has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct SideTotals {
    pub pts: i64,
    pub fouls: i64,
}

/// Totals
///
/// Team totals keyed by bib colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct Totals {
    pub light: SideTotals,
    pub dark: SideTotals,
}

/// Boxscore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct Boxscore {
    pub players: Vec<PlayerRow>,
    pub totals: Totals,
    pub home_team_id: i64,
    pub away_team_id: i64,
}

/// StatField
///
/// Counters the scorer's table can bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum StatField {
    One,
    Two,
    Three,
    Foul,
}

impl StatField {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatField::One => "one",
            StatField::Two => "two",
            StatField::Three => "three",
            StatField::Foul => "foul",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "one" => Some(StatField::One),
            "two" => Some(StatField::Two),
            "three" => Some(StatField::Three),
            "foul" => Some(StatField::Foul),
            _ => None,
        }
    }
}

/// StatDelta
///
/// A single +1 / -1 correction. Serialized as the bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum StatDelta {
    Increment,
    Decrement,
}

impl From<StatDelta> for i8 {
    fn from(delta: StatDelta) -> i8 {
        match delta {
            StatDelta::Increment => 1,
            StatDelta::Decrement => -1,
        }
    }
}

impl TryFrom<i8> for StatDelta {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(StatDelta::Increment),
            -1 => Ok(StatDelta::Decrement),
            other => Err(format!("stat delta must be 1 or -1, got {other}")),
        }
    }
}

/// StatUpdateRequest
///
/// Body of `POST /matches/{id}/stat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatUpdateRequest {
    pub player_id: i64,
    pub field: StatField,
    #[ts(type = "1 | -1")]
    pub delta: StatDelta,
}

/// The player row after the increment, plus the field touched and its new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdatedStat {
    #[serde(flatten)]
    pub row: PlayerRow,
    pub field: StatField,
    pub value: i64,
}

/// StatUpdateResponse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatUpdateResponse {
    pub updated: UpdatedStat,
    pub totals: Totals,
}

// --- Deployment version (version.json) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VersionInfo {
    pub version: String,
}
