//! Navigation Guard
//!
//! Decides, before every navigation, whether to admit it, redirect it to another named
//! route (history is replaced), or deny it (the current view stays).
//!
//! The decision is an ordered list of named rules, each a predicate plus an action.
//! [`NavigationGuard::decide`] returns the first rule whose predicate holds; it is pure
//! and synchronous. [`NavigationGuard::evaluate`] additionally runs the password
//! challenge when the winning action is [`RuleAction::Authenticate`].

use crate::{
    auth::{AuthContext, ChallengeOutcome, PasswordGate},
    navigation::NavigationTarget,
    notify::{Notification, NotificationKind, NotifierState},
    routes::{RouteRecord, names},
};

/// Case-insensitive synonyms of the championship division.
pub const CHAMPIONSHIP_SYNONYMS: [&str; 4] = ["champion", "champ", "c", "championship"];

/// Admin read-only aliases and the public page each one falls back to without a session.
pub const READ_ALIAS_DOWNGRADES: [(&str, &str); 2] = [
    (names::TEAM_SCHEDULE_ADMIN_ALIAS, names::TEAM_SCHEDULE),
    (names::ADMIN_CHAMPION_TEAM_SCHEDULE, names::TEAM_SCHEDULE),
];

/// The admin editable match page and its public read-only counterpart.
pub const MATCH_DETAIL_DOWNGRADE: (&str, &str) =
    (names::CHAMPION_MATCH_DETAIL, names::MATCH_DETAIL);

pub const WRONG_PASSWORD_MESSAGE: &str = "Incorrect password";

/// GuardInput
///
/// Everything a rule may look at. `matched` is the target's record chain, outermost
/// layout first; `is_admin` is read once per navigation.
pub struct GuardInput<'a> {
    pub target: &'a NavigationTarget,
    pub matched: &'a [&'a RouteRecord],
    pub is_admin: bool,
}

impl GuardInput<'_> {
    /// Metadata of the target record itself.
    pub fn is_public(&self) -> bool {
        self.matched.last().is_some_and(|record| record.meta.public)
    }

    /// True when the target or any ancestor layout requires admin.
    pub fn requires_admin(&self) -> bool {
        self.matched.iter().any(|record| record.meta.requires_admin)
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.target.name == name
    }
}

/// RuleAction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    Admit,
    /// Redirect to the named route, carrying params and query over unchanged.
    RedirectTo(&'static str),
    /// Admit only after a successful password challenge.
    Authenticate,
}

type Predicate = Box<dyn Fn(&GuardInput<'_>) -> bool + Send + Sync>;

/// Rule
pub struct Rule {
    pub name: &'static str,
    predicate: Predicate,
    pub action: RuleAction,
}

impl Rule {
    pub fn new(
        name: &'static str,
        predicate: impl Fn(&GuardInput<'_>) -> bool + Send + Sync + 'static,
        action: RuleAction,
    ) -> Self {
        Self {
            name,
            predicate: Box::new(predicate),
            action,
        }
    }

    pub fn applies(&self, input: &GuardInput<'_>) -> bool {
        (self.predicate)(input)
    }
}

/// DenyReason
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    PromptDismissed,
    WrongPassword,
    PromptTimedOut,
}

/// GuardDecision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Admit,
    Redirect(NavigationTarget),
    Deny(DenyReason),
}

/// True when `division` names the championship division, ignoring case.
pub fn is_championship(division: Option<&str>) -> bool {
    let Some(division) = division else {
        return false;
    };
    let lowered = division.to_lowercase();
    CHAMPIONSHIP_SYNONYMS.contains(&lowered.as_str())
}

/// default_rules
///
/// The precedence chain, in evaluation order:
/// 1. public routes are admitted;
/// 2. the admin schedule alias outside the championship goes to the public schedule;
/// 3. without a session, admin read aliases and the admin match page are downgraded;
/// 4. admin routes are admitted with a session, otherwise challenged;
/// 5. anything else is admitted.
pub fn default_rules() -> Vec<Rule> {
    let mut rules = vec![
        Rule::new("public-route", |input| input.is_public(), RuleAction::Admit),
        Rule::new(
            "schedule-alias-outside-championship",
            |input| {
                input.is_named(names::TEAM_SCHEDULE_ADMIN_ALIAS)
                    && !is_championship(input.target.query.get("division").map(String::as_str))
            },
            RuleAction::RedirectTo(names::TEAM_SCHEDULE),
        ),
    ];

    for (alias, public) in READ_ALIAS_DOWNGRADES {
        rules.push(Rule::new(
            "read-alias-without-session",
            move |input| !input.is_admin && input.is_named(alias),
            RuleAction::RedirectTo(public),
        ));
    }

    let (editable, read_only) = MATCH_DETAIL_DOWNGRADE;
    rules.push(Rule::new(
        "match-editor-without-session",
        move |input| !input.is_admin && input.is_named(editable),
        RuleAction::RedirectTo(read_only),
    ));

    rules.extend([
        Rule::new(
            "admin-route-with-session",
            |input| input.is_admin && input.requires_admin(),
            RuleAction::Admit,
        ),
        Rule::new(
            "admin-route-password-gate",
            |input| input.requires_admin(),
            RuleAction::Authenticate,
        ),
        Rule::new("fallthrough", |_| true, RuleAction::Admit),
    ]);

    rules
}

/// NavigationGuard
#[derive(Clone)]
pub struct NavigationGuard {
    rules: std::sync::Arc<Vec<Rule>>,
    auth: AuthContext,
    gate: PasswordGate,
    notifier: NotifierState,
}

impl NavigationGuard {
    pub fn new(auth: AuthContext, gate: PasswordGate, notifier: NotifierState) -> Self {
        Self::with_rules(default_rules(), auth, gate, notifier)
    }

    pub fn with_rules(
        rules: Vec<Rule>,
        auth: AuthContext,
        gate: PasswordGate,
        notifier: NotifierState,
    ) -> Self {
        Self {
            rules: std::sync::Arc::new(rules),
            auth,
            gate,
            notifier,
        }
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First applicable rule. `None` only for a custom rule list without a fallthrough.
    pub fn decide(&self, input: &GuardInput<'_>) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.applies(input))
    }

    /// Full decision for `target`, including the password challenge.
    pub async fn evaluate(
        &self,
        target: &NavigationTarget,
        matched: &[&RouteRecord],
    ) -> GuardDecision {
        let input = GuardInput {
            target,
            matched,
            is_admin: self.auth.is_admin(),
        };

        let Some(rule) = self.decide(&input) else {
            return GuardDecision::Admit;
        };
        tracing::debug!(rule = rule.name, route = %target.name, "guard rule matched");

        match rule.action {
            RuleAction::Admit => GuardDecision::Admit,
            RuleAction::RedirectTo(name) => GuardDecision::Redirect(target.renamed(name)),
            RuleAction::Authenticate => self.authenticate(target).await,
        }
    }

    async fn authenticate(&self, target: &NavigationTarget) -> GuardDecision {
        match self.gate.challenge(&self.auth).await {
            ChallengeOutcome::Granted => {
                tracing::info!(route = %target.name, "admin session unlocked");
                GuardDecision::Admit
            }
            ChallengeOutcome::Dismissed => GuardDecision::Deny(DenyReason::PromptDismissed),
            ChallengeOutcome::TimedOut => {
                tracing::warn!(route = %target.name, "password prompt timed out");
                GuardDecision::Deny(DenyReason::PromptTimedOut)
            }
            ChallengeOutcome::Rejected => {
                tracing::warn!(route = %target.name, "wrong admin password");
                self.notifier
                    .alert(Notification::new(
                        NotificationKind::Authentication,
                        WRONG_PASSWORD_MESSAGE,
                    ))
                    .await;
                GuardDecision::Deny(DenyReason::WrongPassword)
            }
        }
    }
}
