use std::sync::Arc;

use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    guard::{DenyReason, GuardDecision, NavigationGuard},
    navigation::{Location, NavigationTarget, split_url},
    routes::{RouteError, RouteMatch, RouteTable},
};

/// Upper bound on redirects (static or guard-issued) within one navigation.
pub const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("no route matches `{0}`")]
    NotFound(String),
    #[error("navigation to `{0}` redirected more than {MAX_REDIRECTS} times")]
    RedirectLoop(String),
    #[error(transparent)]
    Route(#[from] RouteError),
}

/// NavigationOutcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The (possibly redirected) target is now the current location.
    Committed(Location),
    /// The guard cancelled the navigation; the current location is unchanged.
    Denied(DenyReason),
    /// Back/forward past either end of history.
    NoHistory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitMode {
    Push,
    Replace,
    Traverse(usize),
    ReplaceAt(usize),
}

impl CommitMode {
    /// Guard redirects replace instead of adding an entry.
    fn redirected(self) -> Self {
        match self {
            CommitMode::Push | CommitMode::Replace => CommitMode::Replace,
            CommitMode::Traverse(index) | CommitMode::ReplaceAt(index) => {
                CommitMode::ReplaceAt(index)
            }
        }
    }
}

/// Navigator
///
/// Owns the history stack and drives every navigation (link, programmatic, back and
/// forward) through the guard before committing it. `&mut self` on every navigation
/// keeps attempts strictly sequential.
pub struct Navigator {
    table: Arc<RouteTable>,
    guard: NavigationGuard,
    entries: Vec<Location>,
    cursor: Option<usize>,
}

impl Navigator {
    pub fn new(table: Arc<RouteTable>, guard: NavigationGuard) -> Self {
        Self {
            table,
            guard,
            entries: Vec::new(),
            cursor: None,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn current(&self) -> Option<&Location> {
        self.cursor.map(|index| &self.entries[index])
    }

    pub fn history(&self) -> &[Location] {
        &self.entries
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Navigates to a URL (`/teams/3/schedule?division=d1`), adding a history entry.
    pub async fn push(&mut self, url: &str) -> Result<NavigationOutcome, NavigationError> {
        self.navigate_url(url, CommitMode::Push).await
    }

    /// Navigates to a URL, overwriting the current history entry.
    pub async fn replace(&mut self, url: &str) -> Result<NavigationOutcome, NavigationError> {
        self.navigate_url(url, CommitMode::Replace).await
    }

    pub async fn push_named(
        &mut self,
        target: NavigationTarget,
    ) -> Result<NavigationOutcome, NavigationError> {
        self.run(target, CommitMode::Push, 0).await
    }

    pub async fn back(&mut self) -> Result<NavigationOutcome, NavigationError> {
        self.go(-1).await
    }

    pub async fn forward(&mut self) -> Result<NavigationOutcome, NavigationError> {
        self.go(1).await
    }

    /// Resolves a URL to a target, following static redirect routes.
    pub fn resolve(&self, url: &str) -> Result<(NavigationTarget, usize), NavigationError> {
        let (mut path, mut query) = split_url(url);
        for hops in 0..=MAX_REDIRECTS {
            match self.table.resolve(&path) {
                None => return Err(NavigationError::NotFound(path)),
                Some(RouteMatch::Redirect { to }) => {
                    tracing::debug!(from = %path, to, "static redirect");
                    // The incoming query survives unless the redirect brings its own.
                    let (next_path, next_query) = split_url(to);
                    if to.contains('?') {
                        query = next_query;
                    }
                    path = next_path;
                }
                Some(RouteMatch::Found { record, params }) => {
                    let record = self.table.record(record);
                    let name = record.name.ok_or_else(|| {
                        RouteError::UnnamedRoute(record.pattern.as_str().to_string())
                    })?;
                    return Ok((
                        NavigationTarget {
                            name: name.to_string(),
                            params,
                            query,
                        },
                        hops,
                    ));
                }
            }
        }
        Err(NavigationError::RedirectLoop(url.to_string()))
    }

    async fn navigate_url(
        &mut self,
        url: &str,
        mode: CommitMode,
    ) -> Result<NavigationOutcome, NavigationError> {
        // Static redirects keep the navigation's own history mode.
        let (target, hops) = self.resolve(url)?;
        self.run(target, mode, hops).await
    }

    async fn go(&mut self, delta: isize) -> Result<NavigationOutcome, NavigationError> {
        let Some(cursor) = self.cursor else {
            return Ok(NavigationOutcome::NoHistory);
        };
        let Some(index) = cursor
            .checked_add_signed(delta)
            .filter(|index| *index < self.entries.len())
        else {
            return Ok(NavigationOutcome::NoHistory);
        };

        let entry = &self.entries[index];
        let target = NavigationTarget {
            name: entry.name.clone(),
            params: entry.params.clone(),
            query: entry.query.clone(),
        };
        self.run(target, CommitMode::Traverse(index), 0).await
    }

    async fn run(
        &mut self,
        target: NavigationTarget,
        mode: CommitMode,
        hops: usize,
    ) -> Result<NavigationOutcome, NavigationError> {
        let span = tracing::info_span!(
            "navigation",
            nav_id = %Uuid::new_v4(),
            from = %self.current().map(Location::full_path).unwrap_or_default(),
            to = %target.name,
        );
        self.run_guarded(target, mode, hops).instrument(span).await
    }

    async fn run_guarded(
        &mut self,
        mut target: NavigationTarget,
        mut mode: CommitMode,
        mut hops: usize,
    ) -> Result<NavigationOutcome, NavigationError> {
        let table = Arc::clone(&self.table);
        loop {
            let index = table
                .find_by_name(&target.name)
                .ok_or_else(|| RouteError::UnknownRoute(target.name.clone()))?;
            let matched = table.matched_chain(index);
            let record = table.record(index);
            // An unbuildable target fails before the guard can prompt.
            let path = record.pattern.build(&target.params)?;

            match self.guard.evaluate(&target, &matched).await {
                GuardDecision::Admit => {
                    let location = Location {
                        path,
                        name: target.name,
                        params: target.params,
                        query: target.query,
                        view: record.view,
                    };
                    tracing::info!(path = %location.full_path(), "navigation committed");
                    self.commit(location.clone(), mode);
                    return Ok(NavigationOutcome::Committed(location));
                }
                GuardDecision::Redirect(next) => {
                    hops += 1;
                    if hops > MAX_REDIRECTS {
                        return Err(NavigationError::RedirectLoop(next.name));
                    }
                    tracing::info!(from = %target.name, to = %next.name, "guard redirect");
                    target = next;
                    mode = mode.redirected();
                }
                GuardDecision::Deny(reason) => {
                    tracing::info!(?reason, "navigation denied");
                    return Ok(NavigationOutcome::Denied(reason));
                }
            }
        }
    }

    fn commit(&mut self, location: Location, mode: CommitMode) {
        match (mode, self.cursor) {
            (CommitMode::Push, cursor) => {
                if let Some(cursor) = cursor {
                    self.entries.truncate(cursor + 1);
                }
                self.entries.push(location);
                self.cursor = Some(self.entries.len() - 1);
            }
            (CommitMode::Replace, Some(cursor)) => {
                self.entries[cursor] = location;
            }
            (CommitMode::Replace, None) => {
                self.entries.push(location);
                self.cursor = Some(self.entries.len() - 1);
            }
            (CommitMode::Traverse(index), _) => {
                self.cursor = Some(index);
            }
            (CommitMode::ReplaceAt(index), _) => {
                self.entries[index] = location;
                self.cursor = Some(index);
            }
        }
    }
}
