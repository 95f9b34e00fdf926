//! Config subcommand handlers.

use serde::Serialize;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

/// What `config show` prints. Secrets never leave the process.
#[derive(Serialize)]
struct ResolvedProfile<'a> {
    profile: &'a str,
    config_file: String,
    hosts: &'a [String],
    username: Option<&'a str>,
    delay_ms: u128,
    token: Option<&'static str>,
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global);

    match args.command {
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config(&path)?;
            let target = config::resolve_target(global, &cfg)?;
            let resolved = ResolvedProfile {
                profile: &target.profile,
                config_file: path.display().to_string(),
                hosts: target.hosts.as_slice(),
                username: target.username.as_deref(),
                delay_ms: target.delay.as_millis(),
                token: global.token.as_ref().map(|_| "[REDACTED]"),
            };
            output::print_output(&output::render_value(global.output, &resolved)?, global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg: Config = config::load_config(&path)?;
            let profile = config::active_profile_name(global, &cfg);

            let password = rpassword::prompt_password(format!("Password for '{profile}': "))?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            keyring::Entry::new(config::KEYRING_SERVICE, &format!("{profile}/password"))?
                .set_password(&password)?;

            if !global.quiet {
                eprintln!("Password stored in keyring for profile '{profile}'");
            }
            Ok(())
        }
    }
}
