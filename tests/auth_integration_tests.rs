use async_trait::async_trait;
use league_portal::auth::{
    ADMIN_OK_KEY, ADMIN_OK_VALUE, AuthContext, ChallengeOutcome, MemorySessionStore,
    PASSWORD_PROMPT, PasswordGate, PasswordPrompt, ScriptedPrompt, SessionStore,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// --- Mock Prompt ---

/// Remembers the message it was shown and answers with a fixed value.
#[derive(Default)]
struct EchoPrompt {
    answer: Option<String>,
    shown: Mutex<Vec<String>>,
}

#[async_trait]
impl PasswordPrompt for EchoPrompt {
    async fn request_password(&self, message: &str) -> Option<String> {
        self.shown.lock().unwrap().push(message.to_string());
        self.answer.clone()
    }
}

fn gate(answers: Vec<Option<&str>>) -> (PasswordGate, ScriptedPrompt) {
    let prompt = ScriptedPrompt::new(answers);
    let gate = PasswordGate::new(Arc::new(prompt.clone()), "123456", Duration::from_secs(5));
    (gate, prompt)
}

// --- Tests ---

#[test]
fn test_memory_session_store_round_trip() {
    let store = MemorySessionStore::new();
    assert_eq!(store.get_item("missing"), None);

    store.set_item("k", "v1");
    store.set_item("k", "v2");
    assert_eq!(store.get_item("k").as_deref(), Some("v2"));

    store.remove_item("k");
    assert_eq!(store.get_item("k"), None);
}

#[test]
fn test_admin_flag_requires_exact_value() {
    let store = Arc::new(MemorySessionStore::new());
    let auth = AuthContext::new(store.clone());
    assert!(!auth.is_admin());

    // Only the literal marker value counts.
    store.set_item(ADMIN_OK_KEY, "true");
    assert!(!auth.is_admin());
    store.set_item(ADMIN_OK_KEY, ADMIN_OK_VALUE);
    assert!(auth.is_admin());

    auth.set_admin(false);
    assert_eq!(store.get_item(ADMIN_OK_KEY), None);
}

#[test]
fn test_auth_contexts_share_the_store() {
    let store = Arc::new(MemorySessionStore::new());
    let first = AuthContext::new(store.clone());
    let second = AuthContext::new(store);

    first.set_admin(true);
    assert!(second.is_admin());

    // A fresh in-memory context is independent.
    assert!(!AuthContext::in_memory().is_admin());
}

#[tokio::test]
async fn test_gate_grants_on_exact_match_only() {
    let (gate, prompt) = gate(vec![Some("123456 "), Some("123456")]);
    let auth = AuthContext::in_memory();

    // No trimming: a trailing space is a different password.
    assert_eq!(gate.challenge(&auth).await, ChallengeOutcome::Rejected);
    assert!(!auth.is_admin());

    assert_eq!(gate.challenge(&auth).await, ChallengeOutcome::Granted);
    assert!(auth.is_admin());
    assert_eq!(prompt.times_asked(), 2);
}

#[tokio::test]
async fn test_gate_dismissed_and_exhausted_prompts() {
    let (gate, _) = gate(vec![None]);
    let auth = AuthContext::in_memory();

    assert_eq!(gate.challenge(&auth).await, ChallengeOutcome::Dismissed);
    // Nothing queued: behaves like another dismissal.
    assert_eq!(gate.challenge(&auth).await, ChallengeOutcome::Dismissed);
    assert!(!auth.is_admin());
}

#[tokio::test]
async fn test_gate_times_out_slow_prompt() {
    let prompt = ScriptedPrompt::new(vec![Some("123456")]).delayed(Duration::from_millis(500));
    let gate = PasswordGate::new(Arc::new(prompt), "123456", Duration::from_millis(20));
    let auth = AuthContext::in_memory();

    assert_eq!(gate.challenge(&auth).await, ChallengeOutcome::TimedOut);
    assert!(!auth.is_admin());
}

#[tokio::test]
async fn test_gate_shows_the_password_prompt() {
    let prompt = Arc::new(EchoPrompt {
        answer: Some("hunter2".to_string()),
        ..EchoPrompt::default()
    });
    let gate = PasswordGate::new(prompt.clone(), "hunter2", Duration::from_secs(1));

    assert_eq!(
        gate.challenge(&AuthContext::in_memory()).await,
        ChallengeOutcome::Granted
    );
    assert_eq!(*prompt.shown.lock().unwrap(), vec![PASSWORD_PROMPT.to_string()]);
}
