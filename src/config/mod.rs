//! Typed configuration from environment variables.
//!
//! Loads once at startup, fails fast on malformed values and, in production,
//! on missing required secrets. Sensitive values wrapped in
//! secrecy::SecretString to prevent log leaks.
//!
//! | Variable (aliases) | Field | Required in production |
//! |---|---|---|
//! | `API_URL` (`REACT_APP_API_URL`) | `api_url` | no, defaults to `https://api.toast.com` |
//! | `APP_ENV` (`NODE_ENV`) | `environment` | no, defaults to `development` |
//! | `DATABASE_URL` | `database_url` | yes |
//! | `API_KEY` | `api_key` | yes |
//! | `CLOUD_ACCESS_KEY` (`AWS_ACCESS_KEY`) | `cloud_access_key` | yes |
//! | `VCS_TOKEN` (`GITHUB_TOKEN`) | `vcs_token` | no |
//! | `WEBHOOK_URL` (`SLACK_WEBHOOK`) | `webhook_url` | no |
//! | `ENABLE_RESERVATIONS` | `enable_reservations` | no, defaults to `true` |
//! | `ENABLE_WAITLIST` | `enable_waitlist` | no, defaults to `true` |

pub mod environment;
pub mod features;
pub mod secrets;

pub use environment::Environment;
pub use features::Features;

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::path::Path;

use secrecy::SecretString;
use serde::Serialize;
use url::Url;

use crate::error::{ConfigError, Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.toast.com";

const API_URL_VARS: &[&str] = &["API_URL", "REACT_APP_API_URL"];
const ENVIRONMENT_VARS: &[&str] = &["APP_ENV", "NODE_ENV"];
const ENABLE_RESERVATIONS_VAR: &str = "ENABLE_RESERVATIONS";
const ENABLE_WAITLIST_VAR: &str = "ENABLE_WAITLIST";

/// Structural check applied to a present value.
#[derive(Clone, Copy)]
enum Shape {
    Opaque,
    /// Absolute hierarchical URL, any scheme. Host may be empty
    /// (`sqlite:///path`, `postgresql:///db?host=/socket`).
    Url,
    /// Absolute http(s) URL with a host.
    HttpUrl,
}

/// Schema entry for a secret field.
struct SecretVar {
    key: &'static str,
    /// Variable names in precedence order. The first is the canonical one.
    vars: &'static [&'static str],
    required_in_production: bool,
    shape: Shape,
}

const DATABASE_URL: SecretVar = SecretVar {
    key: "database_url",
    vars: &["DATABASE_URL"],
    required_in_production: true,
    shape: Shape::Url,
};

const API_KEY: SecretVar = SecretVar {
    key: "api_key",
    vars: &["API_KEY"],
    required_in_production: true,
    shape: Shape::Opaque,
};

const CLOUD_ACCESS_KEY: SecretVar = SecretVar {
    key: "cloud_access_key",
    vars: &["CLOUD_ACCESS_KEY", "AWS_ACCESS_KEY"],
    required_in_production: true,
    shape: Shape::Opaque,
};

const VCS_TOKEN: SecretVar = SecretVar {
    key: "vcs_token",
    vars: &["VCS_TOKEN", "GITHUB_TOKEN"],
    required_in_production: false,
    shape: Shape::Opaque,
};

const WEBHOOK_URL: SecretVar = SecretVar {
    key: "webhook_url",
    vars: &["WEBHOOK_URL", "SLACK_WEBHOOK"],
    required_in_production: false,
    shape: Shape::HttpUrl,
};

/// Immutable snapshot of runtime configuration.
///
/// Build it once at process entry with [`Config::load`] (or one of the
/// `from_env*` helpers) and pass it to consumers by reference or `Arc`.
/// There are no setters.
#[derive(Debug)]
pub struct Config {
    api_url: Url,
    environment: Environment,
    database_url: SecretString,
    api_key: SecretString,
    cloud_access_key: SecretString,
    vcs_token: SecretString,
    webhook_url: SecretString,
    features: Features,
}

impl Config {
    /// Build the configuration from a variable mapping.
    ///
    /// Absent secrets are an error in production and an empty value plus a
    /// warning otherwise. Present values are shape-checked in every
    /// environment. A variable set to an empty or all-whitespace string
    /// counts as absent. Secret values are kept exactly as set, surrounding
    /// whitespace included.
    pub fn load(env: &HashMap<String, String>) -> Result<Self> {
        let environment = match lookup(env, ENVIRONMENT_VARS) {
            Some((var, raw)) => {
                raw.parse::<Environment>()
                    .map_err(|e| ConfigError::InvalidValue {
                        key: "environment",
                        var,
                        reason: e.to_string(),
                    })?
            }
            None => Environment::default(),
        };

        let (api_url_var, api_url_raw) =
            lookup(env, API_URL_VARS).unwrap_or((API_URL_VARS[0], DEFAULT_API_URL));
        let api_url = check_url("api_url", api_url_var, api_url_raw, true)?;

        let defaults = Features::default();
        let config = Self {
            api_url,
            environment,
            database_url: load_secret(env, environment, &DATABASE_URL)?,
            api_key: load_secret(env, environment, &API_KEY)?,
            cloud_access_key: load_secret(env, environment, &CLOUD_ACCESS_KEY)?,
            vcs_token: load_secret(env, environment, &VCS_TOKEN)?,
            webhook_url: load_secret(env, environment, &WEBHOOK_URL)?,
            features: Features::new(
                load_flag(
                    env,
                    Features::RESERVATIONS,
                    ENABLE_RESERVATIONS_VAR,
                    defaults.enable_reservations(),
                )?,
                load_flag(
                    env,
                    Features::WAITLIST,
                    ENABLE_WAITLIST_VAR,
                    defaults.enable_waitlist(),
                )?,
            ),
        };

        tracing::debug!(%environment, api_url = %config.api_url, "configuration loaded");
        Ok(config)
    }

    /// Load configuration from the process environment.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this, or use
    /// [`Config::from_env_file`].
    pub fn from_env() -> Result<Self> {
        Self::load(&process_env()?)
    }

    /// Load configuration from a dotenv file layered under the process
    /// environment. Process variables win. The process environment itself
    /// is left untouched.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(&env_with_file(path)?)
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Database connection string, credentials included.
    pub fn database_url(&self) -> &SecretString {
        &self.database_url
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn cloud_access_key(&self) -> &SecretString {
        &self.cloud_access_key
    }

    pub fn vcs_token(&self) -> &SecretString {
        &self.vcs_token
    }

    pub fn webhook_url(&self) -> &SecretString {
        &self.webhook_url
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    /// Redacted view, safe to print or serialize.
    pub fn summary(&self) -> ConfigSummary {
        let secrets = [
            (DATABASE_URL.key, &self.database_url),
            (API_KEY.key, &self.api_key),
            (CLOUD_ACCESS_KEY.key, &self.cloud_access_key),
            (VCS_TOKEN.key, &self.vcs_token),
            (WEBHOOK_URL.key, &self.webhook_url),
        ]
        .into_iter()
        .map(|(key, secret)| (key, secrets::is_set(secret)))
        .collect();

        ConfigSummary {
            api_url: self.api_url.to_string(),
            environment: self.environment,
            secrets,
            features: self.features,
        }
    }
}

/// What [`Config::summary`] reports. Secrets appear as set/unset only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSummary {
    pub api_url: String,
    pub environment: Environment,
    /// Field name -> whether the secret holds a value.
    pub secrets: BTreeMap<&'static str, bool>,
    pub features: Features,
}

impl std::fmt::Display for ConfigSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<20}  {}", "environment", self.environment)?;
        writeln!(f, "{:<20}  {}", "api_url", self.api_url)?;
        for (key, set) in &self.secrets {
            writeln!(f, "{:<20}  {}", key, if *set { "<set>" } else { "<unset>" })?;
        }
        for (name, enabled) in self.features.iter() {
            writeln!(f, "{:<20}  {}", name, enabled)?;
        }
        Ok(())
    }
}

/// Variables read by [`Config::load`], with the field each one feeds.
const SCHEMA_VARS: &[(&str, &str)] = &[
    ("API_URL", "api_url"),
    ("REACT_APP_API_URL", "api_url"),
    ("APP_ENV", "environment"),
    ("NODE_ENV", "environment"),
    ("DATABASE_URL", DATABASE_URL.key),
    ("API_KEY", API_KEY.key),
    ("CLOUD_ACCESS_KEY", CLOUD_ACCESS_KEY.key),
    ("AWS_ACCESS_KEY", CLOUD_ACCESS_KEY.key),
    ("VCS_TOKEN", VCS_TOKEN.key),
    ("GITHUB_TOKEN", VCS_TOKEN.key),
    ("WEBHOOK_URL", WEBHOOK_URL.key),
    ("SLACK_WEBHOOK", WEBHOOK_URL.key),
    (ENABLE_RESERVATIONS_VAR, Features::RESERVATIONS),
    (ENABLE_WAITLIST_VAR, Features::WAITLIST),
];

/// Snapshot of the process environment.
///
/// # Errors
///
/// Returns `InvalidValue` if a variable this crate reads is not valid
/// unicode. Other non-unicode entries are skipped.
pub fn process_env() -> Result<HashMap<String, String>> {
    collect_env(std::env::vars_os())
}

/// Build a variable mapping from raw OS pairs. See [`process_env`].
pub fn collect_env<I>(vars: I) -> Result<HashMap<String, String>>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut env = HashMap::new();
    for (name, value) in vars {
        let Ok(name) = name.into_string() else {
            continue;
        };
        match value.into_string() {
            Ok(value) => {
                env.insert(name, value);
            }
            Err(_) => {
                if let Some(&(var, key)) = SCHEMA_VARS.iter().find(|(var, _)| *var == name) {
                    return Err(ConfigError::InvalidValue {
                        key,
                        var,
                        reason: "value is not valid unicode".to_string(),
                    }
                    .into());
                }
            }
        }
    }
    Ok(env)
}

/// Entries of a dotenv file with the process environment layered on top.
pub fn env_with_file(path: impl AsRef<Path>) -> Result<HashMap<String, String>> {
    let path = path.as_ref();
    let mut env = read_env_file(path)?;
    env.extend(process_env()?);
    Ok(env)
}

/// Parse a dotenv file without touching the process environment.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let entries = dotenvy::from_path_iter(path).map_err(|e| env_file_error(path, e))?;
    entries
        .map(|entry| entry.map_err(|e| env_file_error(path, e)))
        .collect()
}

// Line parse errors carry the offending line, which may hold a secret.
fn env_file_error(path: &Path, err: dotenvy::Error) -> Error {
    let detail = match err {
        dotenvy::Error::LineParse(_, index) => format!("parse error at position {index}"),
        other => other.to_string(),
    };
    Error::EnvFile(format!("{}: {detail}", path.display()))
}

/// First non-blank variable among `vars`, with the name it was found under.
/// The value is returned as set; whitespace only decides blankness.
fn lookup<'a>(
    env: &'a HashMap<String, String>,
    vars: &[&'static str],
) -> Option<(&'static str, &'a str)> {
    vars.iter().find_map(|&var| {
        env.get(var)
            .map(String::as_str)
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| (var, raw))
    })
}

fn load_secret(
    env: &HashMap<String, String>,
    environment: Environment,
    spec: &SecretVar,
) -> std::result::Result<SecretString, ConfigError> {
    match lookup(env, spec.vars) {
        Some((var, raw)) => {
            match spec.shape {
                Shape::Opaque => {}
                Shape::Url => {
                    check_url(spec.key, var, raw, false)?;
                }
                Shape::HttpUrl => {
                    check_url(spec.key, var, raw, true)?;
                }
            }
            Ok(SecretString::from(raw.to_string()))
        }
        None if spec.required_in_production && environment.is_production() => {
            Err(ConfigError::MissingSecret {
                key: spec.key,
                var: spec.vars[0],
            })
        }
        None => {
            tracing::warn!(
                field = spec.key,
                var = spec.vars[0],
                %environment,
                "secret not set, leaving empty"
            );
            Ok(secrets::empty())
        }
    }
}

fn check_url(
    key: &'static str,
    var: &'static str,
    raw: &str,
    http_only: bool,
) -> std::result::Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue { key, var, reason };

    // url::ParseError messages do not echo the input.
    let url = Url::parse(raw).map_err(|e| invalid(format!("not a URL: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(invalid("URL has no hierarchical path".to_string()));
    }
    if http_only {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "unsupported scheme {:?}, expected http or https",
                url.scheme()
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("URL has no host".to_string()));
        }
    }
    Ok(url)
}

fn load_flag(
    env: &HashMap<String, String>,
    key: &'static str,
    var: &'static str,
    default: bool,
) -> std::result::Result<bool, ConfigError> {
    let Some((var, raw)) = lookup(env, &[var]) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            var,
            reason: format!("expected a boolean, got {raw:?}"),
        }),
    }
}
