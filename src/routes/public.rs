use super::{RouteEntry, View, names};

/// Public Route Table
///
/// Pages reachable without the admin password. Routes tagged `public()` are admitted by
/// the guard unconditionally; the untagged landing pages fall through the rule chain
/// and are admitted at the end of it.
///
/// Order matters: `matchDetailWithDiv` only accepts `champion|d1|d2`, so other
/// prefixes fall through to the generic routes below it, and the Division 2 round page
/// is declared before the catch-all `/:division/round/:no`.
pub fn public_routes() -> Vec<RouteEntry> {
    vec![
        // Landing and enrolment pages.
        RouteEntry::new("/", names::HOME, View::Home),
        RouteEntry::new("/champ-d1", "champD1", View::ChampD1),
        RouteEntry::new("/division-2", "division2", View::Division2),
        RouteEntry::new("/enrolment/individual", "enrolIndividual", View::EnrolIndividual),
        RouteEntry::new("/enrolment/team", "enrolTeam", View::EnrolTeam),
        RouteEntry::new("/about", "about", View::AboutUs).public(),
        RouteEntry::new("/hall-of-fame", "hallOfFame", View::HallOfFame).public(),
        RouteEntry::new("/policy", "policy", View::Policy).public(),
        // Team schedule and roster (read-only).
        RouteEntry::new("/teams/:id/schedule", names::TEAM_SCHEDULE, View::TeamSchedule).public(),
        RouteEntry::new("/teams/:id/players", names::TEAM_ROSTER_PUBLIC, View::TeamRoster)
            .public()
            .hide_nav(),
        // Player ranking; the bare path lands on the championship table.
        RouteEntry::redirect("/s8/ranking", "/s8/ranking/champ").public(),
        RouteEntry::new("/s8/ranking/champ", "PlayerRankingChampion", View::PlayerRankingChampion)
            .public(),
        RouteEntry::new("/s8/ranking/div1", "PlayerRankingD1", View::PlayerRankingD1).public(),
        RouteEntry::new("/s8/ranking/div2", "PlayerRankingD2", View::PlayerRankingD2).public(),
        // Match detail: division-qualified form first, legacy addresses after.
        RouteEntry::new(
            "/:division(champion|d1|d2)/matches/:id",
            names::MATCH_DETAIL_WITH_DIV,
            View::MatchDetail,
        )
        .public(),
        RouteEntry::new("/matches/:id", names::MATCH_DETAIL, View::MatchDetail).public(),
        RouteEntry::new("/games/:id", "gameDetail", View::MatchDetail).public(),
        RouteEntry::new(
            "/s8/champ/matches/:id",
            "championMatchPublic",
            View::ChampionMatchPublic,
        )
        .public(),
        // Round pages.
        RouteEntry::new("/division-2/round/:no", names::PUBLIC_ROUND_D2, View::PublicRoundD2)
            .public(),
        RouteEntry::new("/:division/round/:no", names::PUBLIC_ROUND, View::PublicRound).public(),
        // Ladder and team list.
        RouteEntry::new("/s8/ladder", "ladderPublic", View::LadderPublic).public(),
        RouteEntry::new("/s8/teams", "teamsPage", View::Teams).public(),
    ]
}
