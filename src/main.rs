use league_portal::{
    AppState, MemorySessionStore, NavigationError, NavigationOutcome, Navigator,
    api::{
        ApiClient,
        schedule::{DEFAULT_FROM_ROUND, DEFAULT_TO_ROUND},
    },
    auth::{SharedLines, StdinPrompt, stdin_lines},
    config::{AppConfig, Env},
    create_api_client, create_navigator,
    guard::is_championship,
    models::{ScheduleOptions, StatDelta, StatField},
    notify::TracingNotifier,
    version::{FlagReloader, VersionChecker},
};
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
commands:
  go <path>                      navigate (adds a history entry)
  replace <path>                 navigate (replaces the current entry)
  back | forward                 move through history
  where                          show the current location and history
  schedule <team> [division]     fetch a team schedule
  boxscore <match>               fetch a match boxscore
  stat <match> <player> <one|two|three|foul> <+1|-1>
  help | quit";

/// main
///
/// Loads configuration, sets up logging, then runs a line-oriented shell over the
/// navigator and the API client until stdin closes.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast in production).
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging. Logs go to stderr so they never interleave with command output.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "league_portal=debug,reqwest=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }

    tracing::info!("League portal starting in {:?} mode", config.env);

    // 3. Shared services. The session store outlives navigator rebuilds.
    let lines = stdin_lines();
    let state = AppState {
        config: config.clone(),
        session: Arc::new(MemorySessionStore::new()),
        prompt: Arc::new(StdinPrompt::new(lines.clone())),
        notifier: Arc::new(TracingNotifier),
    };

    let api = create_api_client(&state).expect("FATAL: Failed to build the HTTP client.");
    let mut navigator =
        create_navigator(&state).expect("FATAL: The built-in route table is invalid.");

    // 4. Deployment polling.
    let reloader = FlagReloader::new();
    let version_task = VersionChecker::new(&config, Arc::new(reloader.clone()))
        .expect("FATAL: Failed to build the version checker.")
        .spawn();

    report(navigator.push("/").await);
    println!("{HELP}");

    // 5. Command loop.
    loop {
        let Some(line) = read_command(&lines).await else {
            break;
        };

        if reloader.take() {
            navigator = reload(&state, &navigator).await;
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["help"] => println!("{HELP}"),
            ["go", path] => report(navigator.push(path).await),
            ["replace", path] => report(navigator.replace(path).await),
            ["back"] => report(navigator.back().await),
            ["forward"] => report(navigator.forward().await),
            ["where"] => print_history(&navigator),
            ["schedule", team, rest @ ..] => schedule(&api, team, rest.first().copied()).await,
            ["boxscore", match_id] => boxscore(&api, match_id).await,
            ["stat", match_id, player_id, field, delta] => {
                stat(&api, match_id, player_id, field, delta).await
            }
            _ => println!("unrecognised command; type `help`"),
        }
    }

    version_task.abort();
    tracing::info!("League portal stopped");
}

async fn read_command(lines: &SharedLines) -> Option<String> {
    print!("> ");
    std::io::stdout().flush().ok();
    let mut lines = lines.lock().await;
    match lines.next_line().await {
        Ok(line) => line,
        Err(e) => {
            tracing::error!(error = %e, "failed to read stdin");
            None
        }
    }
}

/// Rebuilds the navigator and re-enters the current location.
async fn reload(state: &AppState, old: &Navigator) -> Navigator {
    let current = old.current().map(|location| location.full_path());
    let mut navigator =
        create_navigator(state).expect("FATAL: The built-in route table is invalid.");
    if let Some(path) = current {
        report(navigator.replace(&path).await);
    }
    navigator
}

fn report(result: Result<NavigationOutcome, NavigationError>) {
    match result {
        Ok(NavigationOutcome::Committed(location)) => {
            println!("@ {} ({:?})", location.full_path(), location.view);
        }
        Ok(NavigationOutcome::Denied(reason)) => println!("navigation cancelled ({reason:?})"),
        Ok(NavigationOutcome::NoHistory) => println!("no history in that direction"),
        Err(e) => println!("navigation failed: {e}"),
    }
}

fn print_history(navigator: &Navigator) {
    for (index, location) in navigator.history().iter().enumerate() {
        let marker = if navigator.cursor() == Some(index) { "*" } else { " " };
        println!("{marker} {index}: {} [{}]", location.full_path(), location.name);
    }
}

async fn schedule(api: &ApiClient, team: &str, division: Option<&str>) {
    let Ok(team_id) = team.parse::<i64>() else {
        println!("team id must be a number");
        return;
    };

    let opts = ScheduleOptions::default();
    let result = if is_championship(division) {
        api.fetch_champion_team_schedule(team_id, DEFAULT_FROM_ROUND, DEFAULT_TO_ROUND, &opts)
            .await
    } else {
        api.fetch_team_schedule(team_id, DEFAULT_FROM_ROUND, DEFAULT_TO_ROUND, division, &opts)
            .await
    };

    // Failures were already surfaced by the client's notifier.
    let Ok(schedule) = result else { return };

    if let Some(team) = &schedule.team {
        println!("{}", team.name.as_deref().unwrap_or("(unnamed team)"));
    }
    for fixture in &schedule.matches {
        let kickoff = fixture
            .kickoff()
            .map(|at| at.format("%a %Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "date TBD".to_string());
        println!(
            "R{:<3} {:<20} vs {:<24} {:>3}-{:<3} [{}]",
            fixture.round_no.unwrap_or_default(),
            kickoff,
            fixture.opponent.name.as_deref().unwrap_or("TBD"),
            fixture.home_score,
            fixture.away_score,
            fixture.status,
        );
    }
}

async fn boxscore(api: &ApiClient, match_id: &str) {
    let Ok(match_id) = match_id.parse::<i64>() else {
        println!("match id must be a number");
        return;
    };
    let Ok(boxscore) = api.fetch_boxscore(match_id).await else {
        return;
    };

    for row in &boxscore.players {
        println!(
            "#{:<3} {:<20} team {:<4} 1P {:<2} 2P {:<2} 3P {:<2} F {:<2} = {}",
            row.number.map(|n| n.to_string()).unwrap_or_default(),
            row.name.as_deref().unwrap_or("-"),
            row.team_id,
            row.one,
            row.two,
            row.three,
            row.foul,
            row.points,
        );
    }
    println!(
        "light {} pts / {} fouls, dark {} pts / {} fouls",
        boxscore.totals.light.pts,
        boxscore.totals.light.fouls,
        boxscore.totals.dark.pts,
        boxscore.totals.dark.fouls,
    );
}

async fn stat(api: &ApiClient, match_id: &str, player_id: &str, field: &str, delta: &str) {
    let (Ok(match_id), Ok(player_id)) = (match_id.parse::<i64>(), player_id.parse::<i64>())
    else {
        println!("match and player ids must be numbers");
        return;
    };
    let Some(field) = StatField::parse(field) else {
        println!("field must be one of one, two, three, foul");
        return;
    };
    let delta = match delta {
        "+1" | "1" => StatDelta::Increment,
        "-1" => StatDelta::Decrement,
        _ => {
            println!("delta must be +1 or -1");
            return;
        }
    };

    if let Ok(response) = api.post_delta(match_id, player_id, field, delta).await {
        println!(
            "player {} {} = {} (light {} / dark {})",
            response.updated.row.player_id,
            response.updated.field.as_str(),
            response.updated.value,
            response.totals.light.pts,
            response.totals.dark.pts,
        );
    }
}
