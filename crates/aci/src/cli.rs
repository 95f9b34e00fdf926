//! Clap derive structures for the `aci` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// aci -- read and write the Cisco APIC object tree from the command line
#[derive(Debug, Parser)]
#[command(
    name = "aci",
    version,
    about = "Read and write Cisco ACI objects through the APIC REST API",
    long_about = "Log in to an APIC and read, create/update or delete managed objects\n\
        by path (tenants, VRFs, bridge domains, subnets, EPGs, contracts, filters).\n\n\
        Only JSON is supported. Server certificates are not verified.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "ACI_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, env = "ACI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// APIC address; repeat or comma-separate for a cluster (first is used)
    #[arg(
        long = "host",
        short = 'H',
        env = "ACI_APIC",
        value_delimiter = ',',
        global = true
    )]
    pub hosts: Vec<String>,

    /// APIC username
    #[arg(long, short = 'u', env = "ACI_APIC_USERNAME", global = true)]
    pub username: Option<String>,

    /// APIC password
    #[arg(long, env = "ACI_APIC_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Existing session token; skips login
    #[arg(long, env = "ACI_APIC_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Pacing delay in milliseconds (before Get, after a successful Post)
    #[arg(long, env = "ACI_DELAY_MS", global = true)]
    pub delay_ms: Option<u64>,

    /// Output format for response bodies
    #[arg(long, short = 'o', env = "ACI_OUTPUT", default_value = "json", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON (default)
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Body exactly as the controller sent it
    Raw,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and print the session token
    Login,

    /// Read an object or class path (e.g. class/fvTenant, mo/uni/tn-A)
    Get(GetArgs),

    /// Create or update objects under a path
    Post(PostArgs),

    /// Delete an object path
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Inspect the resolved configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Generate man pages
    Man(ManArgs),
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Object path relative to /api/ (".json" is appended when missing)
    pub path: String,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Debug, Args)]
pub struct PostArgs {
    /// Object path relative to /api/ (".json" is appended when missing)
    pub path: String,

    /// Inline JSON payload
    #[arg(long, short = 'd', conflicts_with = "file", required_unless_present = "file")]
    pub data: Option<String>,

    /// Read the JSON payload from a file ("-" for stdin)
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Object path relative to /api/ (".json" is appended when missing)
    pub path: String,

    /// Succeed whatever status the controller answers with
    #[arg(long)]
    pub lenient: bool,
}

/// Controller query-string options.
#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// query-target (self, children, subtree)
    #[arg(long)]
    pub query_target: Option<String>,

    /// target-subtree-class
    #[arg(long)]
    pub target_subtree_class: Option<String>,

    /// query-target-filter, e.g. 'eq(fvTenant.name,"common")'
    #[arg(long)]
    pub query_target_filter: Option<String>,

    /// rsp-subtree (no, children, full, modified)
    #[arg(long)]
    pub rsp_subtree: Option<String>,

    /// rsp-subtree-class
    #[arg(long)]
    pub rsp_subtree_class: Option<String>,

    /// rsp-subtree-filter
    #[arg(long)]
    pub rsp_subtree_filter: Option<String>,

    /// rsp-subtree-include (faults, health, stats, ...)
    #[arg(long)]
    pub rsp_subtree_include: Option<String>,

    /// rsp-prop-include (all, naming-only, config-only)
    #[arg(long)]
    pub rsp_prop_include: Option<String>,

    /// order-by, e.g. 'fvTenant.name|desc'
    #[arg(long)]
    pub order_by: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the configuration file path
    Path,
    /// Print the resolved profile (secrets redacted)
    Show,
    /// Store the profile's password in the system keyring
    SetPassword,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}

#[derive(Debug, Args)]
pub struct ManArgs {
    /// Write one page per command into this directory instead of printing
    /// the top-level page
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}
