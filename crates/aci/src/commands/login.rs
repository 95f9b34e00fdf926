//! `aci login`: exchange credentials for a session token.

use aci_api::{ApicClient, Session};

use crate::cli::GlobalOpts;
use crate::config::Target;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: &ApicClient,
    target: &Target,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let session = authenticate(client, target, global).await?;
    output::print_output(session.expose(), global.quiet);
    Ok(())
}

/// Log in with the resolved username and password.
pub async fn authenticate(
    client: &ApicClient,
    target: &Target,
    global: &GlobalOpts,
) -> Result<Session, CliError> {
    let username = target
        .username
        .as_deref()
        .ok_or_else(|| CliError::NoCredentials {
            profile: target.profile.clone(),
        })?;
    let password = target.password(global)?;

    tracing::info!(user = username, "logging in");
    Ok(client.login(username, &password).await?)
}
