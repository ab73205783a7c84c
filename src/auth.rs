use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Session storage key holding the admin flag.
pub const ADMIN_OK_KEY: &str = "ADMIN_OK";
/// Value stored under [`ADMIN_OK_KEY`] once the password was accepted.
pub const ADMIN_OK_VALUE: &str = "1";

pub const PASSWORD_PROMPT: &str = "Enter the admin access password:";

/// SessionStore
///
/// Tab-lifetime key/value storage. The admin flag is the only key this crate writes.
pub trait SessionStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// MemorySessionStore
///
/// Process-lifetime store. Outlives navigator rebuilds (version reloads), matching
/// how session storage survives a page reload.
#[derive(Default)]
pub struct MemorySessionStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        match self.items.read() {
            Ok(items) => items.get(key).cloned(),
            Err(_) => {
                tracing::error!(key, "session store lock poisoned, read failed");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) {
        match self.items.write() {
            Ok(mut items) => {
                items.insert(key.to_string(), value.to_string());
            }
            Err(_) => tracing::error!(key, "session store lock poisoned, write dropped"),
        }
    }

    fn remove_item(&self, key: &str) {
        match self.items.write() {
            Ok(mut items) => {
                items.remove(key);
            }
            Err(_) => tracing::error!(key, "session store lock poisoned, remove dropped"),
        }
    }
}

pub type SessionState = Arc<dyn SessionStore>;

/// AuthContext
///
/// Explicit handle on the session admin flag. The guard reads it once per navigation
/// and sets it after a successful password challenge. Nothing resets it automatically.
#[derive(Clone)]
pub struct AuthContext {
    store: SessionState,
}

impl AuthContext {
    pub fn new(store: SessionState) -> Self {
        Self { store }
    }

    /// Fresh, unauthenticated context backed by memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    pub fn is_admin(&self) -> bool {
        self.store.get_item(ADMIN_OK_KEY).as_deref() == Some(ADMIN_OK_VALUE)
    }

    pub fn set_admin(&self, admin: bool) {
        if admin {
            self.store.set_item(ADMIN_OK_KEY, ADMIN_OK_VALUE);
        } else {
            self.store.remove_item(ADMIN_OK_KEY);
        }
    }
}

// --- Password prompt ---

/// PasswordPrompt
///
/// Asks the user for the admin password. `None` means the prompt was dismissed.
#[async_trait]
pub trait PasswordPrompt: Send + Sync {
    async fn request_password(&self, message: &str) -> Option<String>;
}

pub type PromptState = Arc<dyn PasswordPrompt>;

pub type SharedLines = Arc<tokio::sync::Mutex<Lines<BufReader<Stdin>>>>;

/// Opens stdin as a line source shared between the command loop and the prompt.
pub fn stdin_lines() -> SharedLines {
    Arc::new(tokio::sync::Mutex::new(
        BufReader::new(tokio::io::stdin()).lines(),
    ))
}

/// StdinPrompt
///
/// Prints the prompt and reads the next line. EOF or a read error dismisses it.
#[derive(Clone)]
pub struct StdinPrompt {
    lines: SharedLines,
}

impl StdinPrompt {
    pub fn new(lines: SharedLines) -> Self {
        Self { lines }
    }
}

#[async_trait]
impl PasswordPrompt for StdinPrompt {
    async fn request_password(&self, message: &str) -> Option<String> {
        eprintln!("{message}");
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Ok(None) => None,
            Err(e) => {
                tracing::error!(error = %e, "failed to read password from stdin");
                None
            }
        }
    }
}

/// ScriptedPrompt
///
/// Replays queued answers and counts how often it was asked. An empty queue answers
/// like a dismissed prompt.
#[derive(Clone, Default)]
pub struct ScriptedPrompt {
    answers: Arc<Mutex<VecDeque<Option<String>>>>,
    asked: Arc<Mutex<usize>>,
    delay: Option<Duration>,
}

impl ScriptedPrompt {
    pub fn new(answers: Vec<Option<&str>>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(
                answers
                    .into_iter()
                    .map(|answer| answer.map(str::to_string))
                    .collect(),
            )),
            ..Self::default()
        }
    }

    /// Every answer arrives only after `delay`.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn times_asked(&self) -> usize {
        self.asked.lock().map(|asked| *asked).unwrap_or_default()
    }
}

#[async_trait]
impl PasswordPrompt for ScriptedPrompt {
    async fn request_password(&self, _message: &str) -> Option<String> {
        if let Ok(mut asked) = self.asked.lock() {
            *asked += 1;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answers.lock().ok()?.pop_front().flatten()
    }
}

// --- Password challenge ---

/// ChallengeOutcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    Granted,
    Dismissed,
    Rejected,
    TimedOut,
}

/// PasswordGate
///
/// Runs one password challenge: prompt, compare literally against the shared secret,
/// and set the admin flag on a match. No retry, lockout or attempt counter.
#[derive(Clone)]
pub struct PasswordGate {
    prompt: PromptState,
    secret: String,
    timeout: Duration,
}

impl PasswordGate {
    pub fn new(prompt: PromptState, secret: impl Into<String>, timeout: Duration) -> Self {
        Self {
            prompt,
            secret: secret.into(),
            timeout,
        }
    }

    pub async fn challenge(&self, auth: &AuthContext) -> ChallengeOutcome {
        let answer =
            tokio::time::timeout(self.timeout, self.prompt.request_password(PASSWORD_PROMPT))
                .await;

        match answer {
            Err(_) => ChallengeOutcome::TimedOut,
            Ok(None) => ChallengeOutcome::Dismissed,
            Ok(Some(entered)) if entered == self.secret => {
                auth.set_admin(true);
                ChallengeOutcome::Granted
            }
            Ok(Some(_)) => ChallengeOutcome::Rejected,
        }
    }
}
