//! CLI error types with miette diagnostics.
//!
//! Maps `aci_api::Error` variants into user-facing errors with actionable
//! help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the APIC")]
    #[diagnostic(
        code(aci::connection_failed),
        help("Check that the APIC is reachable.\nURL: {url}")
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: aci_api::Error,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(aci::timeout),
        help("The APIC or a gateway in front of it did not answer in time. Retry later.")
    )]
    Timeout {
        #[source]
        source: aci_api::Error,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("APIC rejected the credentials or session token")]
    #[diagnostic(
        code(aci::auth_failed),
        help("Log in again with: aci login\nTokens expire; drop --token / ACI_APIC_TOKEN to force a fresh login.")
    )]
    AuthFailed {
        #[source]
        source: aci_api::Error,
    },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(aci::no_credentials),
        help("Pass --username and set ACI_APIC_PASSWORD, or supply a session with --token.")
    )]
    NoCredentials { profile: String },

    #[error("System keyring unavailable")]
    #[diagnostic(
        code(aci::keyring),
        help("Check that a keyring service is running, or set ACI_APIC_PASSWORD instead.")
    )]
    Keyring {
        #[source]
        source: keyring::Error,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("APIC request failed")]
    #[diagnostic(code(aci::api_error))]
    Api {
        #[source]
        source: aci_api::Error,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(aci::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No APIC host configured for profile '{profile}'")]
    #[diagnostic(
        code(aci::no_host),
        help("Pass --host <address> or set ACI_APIC, or add hosts to the profile.")
    )]
    NoHost { profile: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(code(aci::profile_not_found), help("Available profiles: {available}"))]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(aci::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(aci::json), help("Check the JSON payload and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Could not render output: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<keyring::Error> for CliError {
    fn from(source: keyring::Error) -> Self {
        Self::Keyring { source }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NoHost { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── aci_api::Error → CliError mapping ────────────────────────────────

impl From<aci_api::Error> for CliError {
    fn from(err: aci_api::Error) -> Self {
        use aci_api::Error as E;

        match err {
            E::Validation(v) => CliError::Validation {
                field: validation_field(&v).into(),
                reason: v.to_string(),
            },
            E::Authentication { .. } | E::MissingSessionCookie { .. } => {
                CliError::AuthFailed { source: err }
            }
            E::GatewayTimeout { .. } => CliError::Timeout { source: err },
            E::Transport(ref e) if e.is_timeout() => CliError::Timeout { source: err },
            E::Transport(ref e) => CliError::ConnectionFailed {
                url: e.url().map(ToString::to_string).unwrap_or_default(),
                source: err,
            },
            _ => CliError::Api { source: err },
        }
    }
}

fn validation_field(err: &aci_api::ValidationError) -> &'static str {
    use aci_api::ValidationError as V;

    match err {
        V::MissingToken => "token",
        V::MissingPath | V::XmlNotSupported { .. } | V::ReservedCharacter { .. } => "path",
        V::MissingPayload => "payload",
        V::MissingHost => "host",
    }
}
