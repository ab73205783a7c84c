use super::{RouteEntry, View, names};

/// Admin Route Table
///
/// Everything under `/admin-panel`. Each entry carries `requires_admin`, either directly
/// or through the `/admin-panel` layout it is nested in, so the guard prompts for the
/// admin password before mounting any of them.
///
/// The first three entries are admin entry points onto read-only pages. They sit
/// outside the layout and the guard downgrades them to their public equivalents
/// when the session is not authenticated.
pub fn admin_routes() -> Vec<RouteEntry> {
    vec![
        RouteEntry::new(
            "/admin-panel/teams/:id/schedule",
            names::TEAM_SCHEDULE_ADMIN_ALIAS,
            View::TeamSchedule,
        )
        .requires_admin(),
        RouteEntry::new(
            "/admin-panel/teams/:id/champion-schedule",
            names::ADMIN_CHAMPION_TEAM_SCHEDULE,
            View::ChampionTeamSchedule,
        )
        .requires_admin(),
        RouteEntry::new(
            "/admin-panel/matches/:id",
            names::CHAMPION_MATCH_DETAIL,
            View::ChampionMatchDetail,
        )
        .requires_admin(),
        // Admin layout with its editing pages.
        RouteEntry::layout(
            "/admin-panel",
            View::AdminPage,
            vec![
                RouteEntry::new("", names::ADMIN_HOME, View::AdminOverview),
                RouteEntry::new("teams", "manageTeams", View::ManageTeams),
                RouteEntry::new("teams/:id/players", "playersManage", View::PlayersManage),
                RouteEntry::new("teams/:id", "manageTeam", View::PlayersManage),
                RouteEntry::new("matches", names::MATCHES_MANAGE, View::ScheduleManage)
                    .alias("schedule"),
                RouteEntry::new("matches/round/:no", "roundDetail", View::RoundDetail),
                RouteEntry::new("matches/:id/edit", names::MATCH_EDIT, View::MatchEdit),
                RouteEntry::new("ladder", "ladder", View::Ladder),
            ],
        )
        .requires_admin()
        .with_layout("admin"),
    ]
}
