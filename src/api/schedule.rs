use super::{ApiClient, ApiError};
use crate::models::{ScheduleOptions, TeamSchedule};

pub const DEFAULT_FROM_ROUND: u32 = 1;
pub const DEFAULT_TO_ROUND: u32 = 11;

pub const CHAMPION_DIVISION: &str = "champion";

/// Query pairs for `GET /teams/{id}/schedule`. Absent options are left out.
pub fn schedule_query(
    from: u32,
    to: u32,
    division: Option<&str>,
    opts: &ScheduleOptions,
) -> Vec<(&'static str, String)> {
    let mut query = vec![("from", from.to_string()), ("to", to.to_string())];
    if let Some(division) = division.filter(|division| !division.is_empty()) {
        query.push(("division", division.to_string()));
    }
    if let Some(season) = opts.season.as_deref().filter(|season| !season.is_empty()) {
        query.push(("season", season.to_string()));
    }
    if opts.use_raw {
        query.push(("use_raw", "1".to_string()));
    }
    query
}

impl ApiClient {
    /// fetch_team_schedule
    ///
    /// A team's fixtures between rounds `from` and `to` (inclusive). `division` is one of
    /// `d1`, `d2`, `champion`.
    pub async fn fetch_team_schedule(
        &self,
        team_id: i64,
        from: u32,
        to: u32,
        division: Option<&str>,
        opts: &ScheduleOptions,
    ) -> Result<TeamSchedule, ApiError> {
        let query = schedule_query(from, to, division, opts);
        self.get(&format!("/teams/{team_id}/schedule"), &query).await
    }

    /// Championship schedule; always asks for the raw database status.
    pub async fn fetch_champion_team_schedule(
        &self,
        team_id: i64,
        from: u32,
        to: u32,
        opts: &ScheduleOptions,
    ) -> Result<TeamSchedule, ApiError> {
        let opts = ScheduleOptions {
            use_raw: true,
            ..opts.clone()
        };
        self.fetch_team_schedule(team_id, from, to, Some(CHAMPION_DIVISION), &opts)
            .await
    }
}
