use std::env;
use std::time::Duration;

/// AppConfig
///
/// Holds the client's entire configuration state. Loaded once at start-up and shared
/// (by clone) with the API client, the navigation guard and the version checker.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Base URL every REST call is joined onto (e.g. `http://127.0.0.1:3001/api`).
    pub api_base: String,
    // Prefix for static file links served by the backend (`/static/...`).
    pub file_base: String,
    // Per-request timeout for the shared HTTP client.
    pub request_timeout: Duration,
    // Shared secret compared literally against the admin password prompt.
    pub admin_secret: String,
    // How long the guard waits on the password prompt before denying.
    pub prompt_timeout: Duration,
    // Absolute URL of the deployed `version.json`.
    pub version_url: String,
    // Interval between version checks.
    pub version_poll_interval: Duration,
    // Runtime environment marker.
    pub env: Env,
}

/// Env
///
/// Local runs get working defaults for every setting; Production refuses to start
/// without an explicit API base and admin secret.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const LOCAL_API_BASE: &str = "http://127.0.0.1:3001/api";
const LOCAL_VERSION_URL: &str = "http://127.0.0.1:5173/version.json";
const LOCAL_ADMIN_SECRET: &str = "123456";

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_PROMPT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_VERSION_POLL_SECS: u64 = 60;

impl Default for AppConfig {
    /// Non-panicking configuration for tests and local scaffolding.
    fn default() -> Self {
        Self {
            api_base: LOCAL_API_BASE.to_string(),
            file_base: String::new(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            admin_secret: LOCAL_ADMIN_SECRET.to_string(),
            prompt_timeout: Duration::from_secs(DEFAULT_PROMPT_TIMEOUT_SECS),
            version_url: LOCAL_VERSION_URL.to_string(),
            version_poll_interval: Duration::from_secs(DEFAULT_VERSION_POLL_SECS),
            env: Env::Local,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads every setting from the environment and fails fast.
    ///
    /// # Panics
    /// Panics in `Env::Production` when `API_BASE` or `ADMIN_PASSWORD` is missing, or
    /// when a numeric setting cannot be parsed.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let request_timeout = Duration::from_millis(numeric_var(
            "REQUEST_TIMEOUT_MS",
            DEFAULT_REQUEST_TIMEOUT_MS,
        ));
        let prompt_timeout =
            Duration::from_secs(numeric_var("PROMPT_TIMEOUT_SECS", DEFAULT_PROMPT_TIMEOUT_SECS));
        let version_poll_interval =
            Duration::from_secs(numeric_var("VERSION_POLL_SECS", DEFAULT_VERSION_POLL_SECS));
        let file_base = env::var("FILE_BASE").unwrap_or_default();

        match env {
            Env::Local => Self {
                env: Env::Local,
                api_base: env::var("API_BASE").unwrap_or_else(|_| LOCAL_API_BASE.to_string()),
                file_base,
                request_timeout,
                admin_secret: env::var("ADMIN_PASSWORD")
                    .unwrap_or_else(|_| LOCAL_ADMIN_SECRET.to_string()),
                prompt_timeout,
                version_url: env::var("VERSION_URL")
                    .unwrap_or_else(|_| LOCAL_VERSION_URL.to_string()),
                version_poll_interval,
            },
            Env::Production => {
                let api_base = env::var("API_BASE").expect("FATAL: API_BASE required in prod");
                // version.json is deployed next to the app; derive it from the API origin
                // unless overridden.
                let version_url = env::var("VERSION_URL")
                    .unwrap_or_else(|_| sibling_version_url(&api_base));

                Self {
                    env: Env::Production,
                    api_base,
                    file_base,
                    request_timeout,
                    admin_secret: env::var("ADMIN_PASSWORD")
                        .expect("FATAL: ADMIN_PASSWORD required in prod"),
                    prompt_timeout,
                    version_url,
                    version_poll_interval,
                }
            }
        }
    }

    /// Builds a link to a static file served by the backend.
    pub fn file_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.file_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn numeric_var(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("FATAL: {key} must be a non-negative integer, got {raw:?}")),
        Err(_) => default,
    }
}

fn sibling_version_url(api_base: &str) -> String {
    match url::Url::parse(api_base).and_then(|base| base.join("/version.json")) {
        Ok(url) => url.to_string(),
        Err(_) => "/version.json".to_string(),
    }
}
