use league_portal::{
    AppState, NavigationError, NavigationOutcome, Navigator,
    auth::{MemorySessionStore, ScriptedPrompt},
    config::AppConfig,
    create_navigator,
    guard::DenyReason,
    navigation::{NavigationTarget, split_url},
    notify::RecordingNotifier,
    routes::{View, names},
};
use std::sync::Arc;

// --- Helper Functions ---

fn navigator_with(answers: Vec<Option<&str>>) -> (Navigator, ScriptedPrompt, AppState) {
    let prompt = ScriptedPrompt::new(answers);
    let state = AppState {
        config: AppConfig::default(),
        session: Arc::new(MemorySessionStore::new()),
        prompt: Arc::new(prompt.clone()),
        notifier: Arc::new(RecordingNotifier::new()),
    };
    let navigator = create_navigator(&state).expect("route table is valid");
    (navigator, prompt, state)
}

fn navigator() -> Navigator {
    navigator_with(vec![]).0
}

fn committed(outcome: Result<NavigationOutcome, NavigationError>) -> String {
    match outcome {
        Ok(NavigationOutcome::Committed(location)) => location.full_path(),
        other => panic!("expected a committed navigation, got {other:?}"),
    }
}

fn paths(navigator: &Navigator) -> Vec<String> {
    navigator
        .history()
        .iter()
        .map(|location| location.full_path())
        .collect()
}

// --- Tests ---

#[test]
fn test_split_url_decodes_query_and_drops_fragment() {
    let (path, query) = split_url("/teams/3/schedule?division=champ&season=s%208#top");
    assert_eq!(path, "/teams/3/schedule");
    assert_eq!(query["division"], "champ");
    assert_eq!(query["season"], "s 8");

    let (path, query) = split_url("?a=1&a=2");
    assert_eq!(path, "/");
    assert_eq!(query["a"], "2");
}

#[tokio::test]
async fn test_push_adds_entries_and_back_forward_move_cursor() {
    let mut nav = navigator();
    committed(nav.push("/").await);
    committed(nav.push("/about").await);
    committed(nav.push("/teams/5/schedule?division=d1").await);
    assert_eq!(nav.history().len(), 3);
    assert_eq!(nav.cursor(), Some(2));

    assert_eq!(committed(nav.back().await), "/about");
    assert_eq!(nav.cursor(), Some(1));
    assert_eq!(committed(nav.forward().await), "/teams/5/schedule?division=d1");
    assert_eq!(nav.forward().await.unwrap(), NavigationOutcome::NoHistory);

    // Pushing from the middle drops the forward entries.
    nav.back().await.unwrap();
    nav.back().await.unwrap();
    committed(nav.push("/policy").await);
    assert_eq!(paths(&nav), vec!["/", "/policy"]);
    assert_eq!(committed(nav.back().await), "/");
    assert_eq!(nav.back().await.unwrap(), NavigationOutcome::NoHistory);
}

#[tokio::test]
async fn test_back_on_empty_history_is_a_no_op() {
    let mut nav = navigator();
    assert_eq!(nav.back().await.unwrap(), NavigationOutcome::NoHistory);
    assert!(nav.current().is_none());
}

#[tokio::test]
async fn test_replace_overwrites_current_entry() {
    let mut nav = navigator();
    committed(nav.push("/").await);
    committed(nav.push("/about").await);
    committed(nav.replace("/policy").await);
    assert_eq!(paths(&nav), vec!["/", "/policy"]);
}

#[tokio::test]
async fn test_guard_redirect_replaces_history_entry() {
    let mut nav = navigator();
    committed(nav.push("/").await);

    let path = committed(nav.push("/admin-panel/matches/12?tab=stats").await);
    assert_eq!(path, "/matches/12?tab=stats");

    let current = nav.current().unwrap();
    assert_eq!(current.name, names::MATCH_DETAIL);
    assert_eq!(current.view, Some(View::MatchDetail));
    // The redirect replaces the entry the link was followed from.
    assert_eq!(paths(&nav), vec!["/matches/12?tab=stats"]);
    assert_eq!(nav.back().await.unwrap(), NavigationOutcome::NoHistory);
}

#[tokio::test]
async fn test_schedule_alias_lands_on_public_schedule() {
    let mut nav = navigator();
    let path = committed(nav.push("/admin-panel/teams/4/schedule?division=d2").await);
    assert_eq!(path, "/teams/4/schedule?division=d2");
    assert_eq!(nav.history().len(), 1);
}

#[tokio::test]
async fn test_denied_navigation_leaves_history_untouched() {
    let (mut nav, prompt, _) = navigator_with(vec![None, Some("wrong")]);
    committed(nav.push("/about").await);

    assert_eq!(
        nav.push("/admin-panel").await.unwrap(),
        NavigationOutcome::Denied(DenyReason::PromptDismissed)
    );
    assert_eq!(
        nav.push("/admin-panel/ladder").await.unwrap(),
        NavigationOutcome::Denied(DenyReason::WrongPassword)
    );
    assert_eq!(paths(&nav), vec!["/about"]);
    assert_eq!(prompt.times_asked(), 2);
}

#[tokio::test]
async fn test_password_unlocks_admin_pages_for_the_session() {
    let (mut nav, prompt, state) = navigator_with(vec![Some("123456")]);
    let path = committed(nav.push("/admin-panel/schedule").await);
    assert_eq!(path, "/admin-panel/matches");
    committed(nav.push("/admin-panel/matches/3/edit").await);
    assert_eq!(prompt.times_asked(), 1);

    // A rebuilt navigator shares the session and stays unlocked.
    let mut rebuilt = create_navigator(&state).unwrap();
    let path = committed(rebuilt.push("/admin-panel/matches/12").await);
    assert_eq!(path, "/admin-panel/matches/12");
    assert_eq!(prompt.times_asked(), 1);
}

#[tokio::test]
async fn test_static_redirect_is_followed() {
    let mut nav = navigator();
    committed(nav.push("/").await);
    let path = committed(nav.push("/s8/ranking").await);
    assert_eq!(path, "/s8/ranking/champ");
    assert_eq!(nav.current().unwrap().name, "PlayerRankingChampion");
    assert_eq!(nav.history().len(), 2);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let mut nav = navigator();
    let err = nav.push("/definitely/not/a/page/anywhere").await.unwrap_err();
    assert!(matches!(err, NavigationError::NotFound(_)));
    assert!(nav.history().is_empty());
}

#[tokio::test]
async fn test_push_named_builds_path_from_params() {
    let mut nav = navigator();
    let target = NavigationTarget::new(names::TEAM_SCHEDULE)
        .param("id", "8")
        .query("season", "s8");
    assert_eq!(
        committed(nav.push_named(target).await),
        "/teams/8/schedule?season=s8"
    );

    let missing = NavigationTarget::new(names::TEAM_SCHEDULE);
    assert!(matches!(
        nav.push_named(missing).await,
        Err(NavigationError::Route(_))
    ));
}

#[tokio::test]
async fn test_static_redirect_keeps_incoming_query() {
    let mut nav = navigator();
    let path = committed(nav.push("/s8/ranking?season=s8&page=2").await);
    assert_eq!(path, "/s8/ranking/champ?page=2&season=s8");

    let (target, hops) = nav.resolve("/s8/ranking?season=s8").unwrap();
    assert_eq!(target.name, "PlayerRankingChampion");
    assert_eq!(target.query["season"], "s8");
    assert_eq!(hops, 1);
}

#[tokio::test]
async fn test_unbuildable_target_fails_before_password_prompt() {
    let (mut nav, prompt, _) = navigator_with(vec![Some("123456")]);

    let result = nav.push_named(NavigationTarget::new(names::MATCH_EDIT)).await;

    assert!(matches!(result, Err(NavigationError::Route(_))));
    assert_eq!(prompt.times_asked(), 0);
    assert!(!nav.guard().auth().is_admin());
    assert!(nav.history().is_empty());
}

#[tokio::test]
async fn test_mixed_case_and_encoded_paths_resolve() {
    let mut nav = navigator();
    assert_eq!(committed(nav.push("/About").await), "/about");

    let path = committed(nav.push("/D1/matches/5").await);
    assert_eq!(nav.current().unwrap().name, names::MATCH_DETAIL_WITH_DIV);
    assert_eq!(nav.current().unwrap().params["division"], "D1");
    assert_eq!(path, "/D1/matches/5");

    committed(nav.push("/teams/a%20b/schedule").await);
    assert_eq!(nav.current().unwrap().params["id"], "a b");
    assert_eq!(nav.current().unwrap().path, "/teams/a%20b/schedule");
}
