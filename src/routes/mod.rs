//! Route Table
//!
//! The static list of path → view bindings the navigator resolves against, split by
//! audience the same way the pages are: `public` (anyone) and `admin` (behind the
//! password gate). Entries are matched in declaration order.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

/// Routes visible to every visitor.
pub mod public;

/// Routes under `/admin-panel`, carrying `requires_admin` metadata.
pub mod admin;

pub mod pattern;

use pattern::{PathPattern, join_paths};

/// Route names referenced from code (guard rules, redirects, the binary).
pub mod names {
    pub const HOME: &str = "home";
    pub const TEAM_SCHEDULE: &str = "teamSchedule";
    pub const TEAM_ROSTER_PUBLIC: &str = "teamRosterPublic";
    pub const MATCH_DETAIL: &str = "matchDetail";
    pub const MATCH_DETAIL_WITH_DIV: &str = "matchDetailWithDiv";
    pub const PUBLIC_ROUND: &str = "PublicRound";
    pub const PUBLIC_ROUND_D2: &str = "PublicRoundD2";

    pub const TEAM_SCHEDULE_ADMIN_ALIAS: &str = "teamScheduleAdminAlias";
    pub const ADMIN_CHAMPION_TEAM_SCHEDULE: &str = "adminChampionTeamSchedule";
    pub const CHAMPION_MATCH_DETAIL: &str = "championMatchDetail";
    pub const ADMIN_HOME: &str = "adminHome";
    pub const MATCHES_MANAGE: &str = "matchesManage";
    pub const MATCH_EDIT: &str = "matchEdit";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid route pattern `{0}`")]
    InvalidPattern(String),
    #[error("route `{0}` renders a view but has no name")]
    UnnamedRoute(String),
    #[error("route name `{0}` is declared more than once")]
    DuplicateName(String),
    #[error("no route named `{0}`")]
    UnknownRoute(String),
    #[error("route `{pattern}` needs param `{param}`")]
    MissingParam { pattern: String, param: String },
    #[error("param `{param}`=`{value}` is not accepted by `{pattern}`")]
    ParamOutOfRange {
        pattern: String,
        param: String,
        value: String,
    },
}

/// View
///
/// Opaque identifier of the page component a route mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    ChampD1,
    Division2,
    EnrolIndividual,
    EnrolTeam,
    AboutUs,
    HallOfFame,
    Policy,
    TeamSchedule,
    TeamRoster,
    PlayerRankingChampion,
    PlayerRankingD1,
    PlayerRankingD2,
    MatchDetail,
    ChampionMatchPublic,
    PublicRound,
    PublicRoundD2,
    LadderPublic,
    Teams,
    ChampionTeamSchedule,
    ChampionMatchDetail,
    AdminPage,
    AdminOverview,
    ManageTeams,
    PlayersManage,
    ScheduleManage,
    RoundDetail,
    MatchEdit,
    Ladder,
}

/// RouteMeta
///
/// Visibility metadata consulted by the navigation guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteMeta {
    pub public: bool,
    pub requires_admin: bool,
    pub hide_nav: bool,
    pub layout: Option<&'static str>,
}

/// RouteEntry
///
/// One declaration in the table, as written by hand in `public.rs` / `admin.rs`.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub path: &'static str,
    pub name: Option<&'static str>,
    pub view: Option<View>,
    pub meta: RouteMeta,
    pub children: Vec<RouteEntry>,
    pub aliases: Vec<&'static str>,
    pub redirect: Option<&'static str>,
}

impl RouteEntry {
    pub fn new(path: &'static str, name: &'static str, view: View) -> Self {
        Self {
            path,
            name: Some(name),
            view: Some(view),
            meta: RouteMeta::default(),
            children: Vec::new(),
            aliases: Vec::new(),
            redirect: None,
        }
    }

    /// An unnamed layout route wrapping `children`.
    pub fn layout(path: &'static str, view: View, children: Vec<RouteEntry>) -> Self {
        Self {
            path,
            name: None,
            view: Some(view),
            meta: RouteMeta::default(),
            children,
            aliases: Vec::new(),
            redirect: None,
        }
    }

    /// A path that immediately forwards to another path.
    pub fn redirect(path: &'static str, to: &'static str) -> Self {
        Self {
            path,
            name: None,
            view: None,
            meta: RouteMeta::default(),
            children: Vec::new(),
            aliases: Vec::new(),
            redirect: Some(to),
        }
    }

    pub fn public(mut self) -> Self {
        self.meta.public = true;
        self
    }

    pub fn requires_admin(mut self) -> Self {
        self.meta.requires_admin = true;
        self
    }

    pub fn hide_nav(mut self) -> Self {
        self.meta.hide_nav = true;
        self
    }

    pub fn with_layout(mut self, layout: &'static str) -> Self {
        self.meta.layout = Some(layout);
        self
    }

    pub fn alias(mut self, alias: &'static str) -> Self {
        self.aliases.push(alias);
        self
    }
}

/// RouteRecord
///
/// A flattened entry: child paths joined onto their parent, patterns compiled.
#[derive(Debug, Clone)]
pub struct RouteRecord {
    pub name: Option<&'static str>,
    pub view: Option<View>,
    pub meta: RouteMeta,
    pub pattern: PathPattern,
    pub aliases: Vec<PathPattern>,
    pub redirect: Option<&'static str>,
    /// Index of the enclosing layout record.
    pub parent: Option<usize>,
    /// Layout records only contribute metadata; they never match on their own.
    pub is_layout: bool,
}

/// RouteMatch
///
/// Outcome of resolving a path against the table.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteMatch {
    Found {
        record: usize,
        params: BTreeMap<String, String>,
    },
    Redirect {
        to: &'static str,
    },
}

/// RouteTable
///
/// Immutable after construction. Construction enforces unique route names across
/// the flattened table (children included).
#[derive(Debug, Clone)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
}

impl RouteTable {
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, RouteError> {
        let mut records = Vec::new();
        for entry in &entries {
            flatten(entry, None, "", &mut records)?;
        }

        if let Some(record) = records
            .iter()
            .find(|record| record.name.is_none() && !record.is_layout && record.redirect.is_none())
        {
            return Err(RouteError::UnnamedRoute(record.pattern.as_str().to_string()));
        }

        let mut seen = HashSet::new();
        for name in records.iter().filter_map(|record| record.name) {
            if !seen.insert(name) {
                return Err(RouteError::DuplicateName(name.to_string()));
            }
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> &RouteRecord {
        &self.records[index]
    }

    /// Every route name in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.records.iter().filter_map(|record| record.name).collect()
    }

    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.name == Some(name))
    }

    /// First record (main pattern, then aliases) matching `path`, in declaration order.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        for (index, record) in self.records.iter().enumerate() {
            if record.is_layout {
                continue;
            }
            let hit = std::iter::once(&record.pattern)
                .chain(record.aliases.iter())
                .find_map(|pattern| pattern.matches(path));
            if let Some(params) = hit {
                return Some(match record.redirect {
                    Some(to) => RouteMatch::Redirect { to },
                    None => RouteMatch::Found {
                        record: index,
                        params,
                    },
                });
            }
        }
        None
    }

    /// The record and all its layout ancestors, outermost first.
    pub fn matched_chain(&self, index: usize) -> Vec<&RouteRecord> {
        let mut chain = Vec::new();
        let mut cursor = Some(index);
        while let Some(current) = cursor {
            let record = &self.records[current];
            chain.push(record);
            cursor = record.parent;
        }
        chain.reverse();
        chain
    }

    /// Builds the canonical path of a named route.
    pub fn href(&self, name: &str, params: &BTreeMap<String, String>) -> Result<String, RouteError> {
        let index = self
            .find_by_name(name)
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;
        self.records[index].pattern.build(params)
    }
}

fn flatten(
    entry: &RouteEntry,
    parent: Option<usize>,
    parent_path: &str,
    records: &mut Vec<RouteRecord>,
) -> Result<(), RouteError> {
    let full_path = if parent.is_some() {
        join_paths(parent_path, entry.path)
    } else {
        entry.path.to_string()
    };

    let aliases = entry
        .aliases
        .iter()
        .map(|alias| PathPattern::parse(&join_paths(parent_path, alias)))
        .collect::<Result<Vec<_>, _>>()?;

    let index = records.len();
    records.push(RouteRecord {
        name: entry.name,
        view: entry.view,
        meta: entry.meta,
        pattern: PathPattern::parse(&full_path)?,
        aliases,
        redirect: entry.redirect,
        parent,
        is_layout: !entry.children.is_empty(),
    });

    for child in &entry.children {
        flatten(child, Some(index), &full_path, records)?;
    }
    Ok(())
}

/// route_table
///
/// Assembles the application's full table: public routes first, then admin.
pub fn route_table() -> Result<RouteTable, RouteError> {
    let mut entries = public::public_routes();
    entries.extend(admin::admin_routes());
    RouteTable::new(entries)
}
