//! CLI-owned configuration: TOML profiles, credential resolution, and
//! translation into the inputs `aci_api` takes.
//!
//! The library never sees these types -- it receives `ApicHosts`, a
//! `Session` and per-request delays.

use std::collections::HashMap;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use aci_api::ApicHosts;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub const KEYRING_SERVICE: &str = "aci";

// ── TOML config structs ──────────────────────────────────────────────

/// CLI-owned TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when --profile is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Defaults {
    /// Pacing delay applied when neither flag nor profile sets one.
    #[serde(default)]
    pub delay_ms: u64,
}

/// One controller cluster and the account used against it.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Ordered APIC addresses. Only the first is contacted.
    #[serde(default)]
    pub hosts: Vec<String>,

    pub username: Option<String>,

    /// Plaintext password -- prefer the keyring or `ACI_APIC_PASSWORD`.
    pub password: Option<String>,

    pub delay_ms: Option<u64>,
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    if let Some(ref path) = global.config {
        return path.clone();
    }
    ProjectDirs::from("com", "aci", "aci").map_or_else(
        || PathBuf::from(".aci.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ───────────────────────────────────────────────────

/// Load the full Config from defaults, file and `ACI_CFG__*` environment.
pub fn load_config(path: &Path) -> Result<Config, CliError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ACI_CFG__").split("__"))
        .extract()?;
    Ok(config)
}

// ── Profile resolution ───────────────────────────────────────────────

/// Everything a command needs to reach a controller.
#[derive(Debug)]
pub struct Target {
    pub profile: String,
    pub hosts: ApicHosts,
    pub username: Option<String>,
    pub delay: Duration,
    password_plain: Option<String>,
}

impl Target {
    /// Resolve the password: flag/env, then keyring, then profile
    /// plaintext, then an interactive prompt.
    pub fn password(&self, global: &GlobalOpts) -> Result<SecretString, CliError> {
        if let Some(ref pw) = global.password {
            return Ok(SecretString::from(pw.clone()));
        }

        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{}/password", self.profile))
        {
            if let Ok(pw) = entry.get_password() {
                return Ok(SecretString::from(pw));
            }
        }

        if let Some(ref pw) = self.password_plain {
            return Ok(SecretString::from(pw.clone()));
        }

        if std::io::stdin().is_terminal() {
            let pw = rpassword::prompt_password("APIC password: ")?;
            return Ok(SecretString::from(pw));
        }

        Err(CliError::NoCredentials {
            profile: self.profile.clone(),
        })
    }
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Merge flags (which already include env) over the selected profile.
pub fn resolve_target(global: &GlobalOpts, config: &Config) -> Result<Target, CliError> {
    let name = active_profile_name(global, config);
    let fallback = Profile::default();
    let profile = match config.profiles.get(&name) {
        Some(p) => p,
        // Only an explicitly requested profile must exist.
        None if global.profile.is_some() => {
            let mut available: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name,
                available: available.join(", "),
            });
        }
        None => &fallback,
    };

    let hosts = if global.hosts.is_empty() {
        ApicHosts::new(profile.hosts.iter().cloned())
    } else {
        ApicHosts::new(global.hosts.iter().cloned())
    };
    if hosts.is_empty() {
        return Err(CliError::NoHost { profile: name });
    }

    let delay_ms = global
        .delay_ms
        .or(profile.delay_ms)
        .unwrap_or(config.defaults.delay_ms);

    Ok(Target {
        hosts,
        username: global.username.clone().or_else(|| profile.username.clone()),
        delay: Duration::from_millis(delay_ms),
        password_plain: profile.password.clone(),
        profile: name,
    })
}
