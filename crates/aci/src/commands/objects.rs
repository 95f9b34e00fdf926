//! `aci get | post | delete` handlers.

use std::io::Read;

use aci_api::{ApicClient, DeleteRequest, GetRequest, PostRequest, QueryFilter, Session};

use crate::cli::{DeleteArgs, FilterArgs, GetArgs, GlobalOpts, PostArgs};
use crate::config::Target;
use crate::error::CliError;
use crate::output;

impl From<FilterArgs> for QueryFilter {
    fn from(args: FilterArgs) -> Self {
        QueryFilter {
            query_target: args.query_target,
            target_subtree_class: args.target_subtree_class,
            query_target_filter: args.query_target_filter,
            rsp_subtree: args.rsp_subtree,
            rsp_subtree_class: args.rsp_subtree_class,
            rsp_subtree_filter: args.rsp_subtree_filter,
            rsp_subtree_include: args.rsp_subtree_include,
            rsp_prop_include: args.rsp_prop_include,
            order_by: args.order_by,
        }
    }
}

pub async fn get(
    client: &ApicClient,
    session: &Session,
    args: GetArgs,
    target: &Target,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let req = GetRequest::new(args.path)
        .with_filter(args.filter.into())
        .with_delay(target.delay);

    let body = client.get(session, &req).await?;
    output::print_output(&output::render_body(global.output, &body)?, global.quiet);
    Ok(())
}

pub async fn post(
    client: &ApicClient,
    session: &Session,
    args: PostArgs,
    target: &Target,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let payload = read_payload(&args)?;
    // Reject broken JSON locally; the controller's own error is less useful.
    serde_json::from_slice::<serde::de::IgnoredAny>(&payload)?;

    let req = PostRequest::new(args.path, payload)
        .with_filter(args.filter.into())
        .with_delay(target.delay);

    let body = client.post(session, &req).await?;
    output::print_output(&output::render_body(global.output, &body)?, global.quiet);
    Ok(())
}

pub async fn delete(
    client: &ApicClient,
    session: &Session,
    args: DeleteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut req = DeleteRequest::new(&args.path);
    if !args.lenient {
        req = req.with_status_check();
    }

    client.delete(session, &req).await?;
    if !global.quiet {
        eprintln!("Deleted {}", args.path);
    }
    Ok(())
}

fn read_payload(args: &PostArgs) -> Result<Vec<u8>, CliError> {
    match (&args.data, &args.file) {
        (Some(data), _) => Ok(data.clone().into_bytes()),
        (None, Some(path)) if path.as_os_str() == "-" => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
        (None, Some(path)) => Ok(std::fs::read(path)?),
        (None, None) => Err(CliError::Validation {
            field: "payload".into(),
            reason: "pass --data or --file".into(),
        }),
    }
}
