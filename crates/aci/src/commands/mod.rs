//! Command dispatch: bridges CLI args -> `aci_api` calls -> output.

pub mod config_cmd;
pub mod login;
pub mod man;
pub mod objects;

use aci_api::{ApicClient, Session, TransportConfig};

use crate::cli::{Command, GlobalOpts};
use crate::config::Target;
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, target: &Target, global: &GlobalOpts) -> Result<(), CliError> {
    let client = ApicClient::new(target.hosts.clone(), &TransportConfig::default())?;

    match cmd {
        Command::Login => login::handle(&client, target, global).await,
        Command::Get(args) => {
            let session = session(&client, target, global).await?;
            objects::get(&client, &session, args, target, global).await
        }
        Command::Post(args) => {
            let session = session(&client, target, global).await?;
            objects::post(&client, &session, args, target, global).await
        }
        Command::Delete(args) => {
            let session = session(&client, target, global).await?;
            objects::delete(&client, &session, args, global).await
        }
        // Config, Completions and Man are handled before dispatch
        Command::Config(_) | Command::Completions(_) | Command::Man(_) => unreachable!(),
    }
}

/// Use `--token` when given, otherwise log in.
async fn session(
    client: &ApicClient,
    target: &Target,
    global: &GlobalOpts,
) -> Result<Session, CliError> {
    if let Some(ref token) = global.token {
        return Ok(Session::new(token.clone()));
    }
    login::authenticate(client, target, global).await
}
