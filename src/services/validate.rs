use tracing::debug;
use super::{ServiceContext, tracked_user};
use crate::model::identity::Identity;
use crate::utils::errors::{ErrorCode, KeeperError};

///
/// Check the proposed plain text password against the user's history - the
/// pre-commit half of the policy, called before the authentication layer accepts
/// a password change.
///
/// The candidate is digested under EVERY binding the user has accumulated, current
/// or not: a match under a deprecated hash configuration is still a reuse. Each
/// binding is only matched against its own records, but the window those records
/// must sit inside is computed jointly across all bindings by recency.
///
/// Absent or unsaved users are skipped entirely - nothing is read or written.
///
pub async fn validate(ctx: &ServiceContext, plain_text_password: &str, user: Option<&dyn Identity>)
    -> Result<(), KeeperError> {

    let user = match tracked_user(user) {
        Some(user) => user,
        None => return Ok(()),
    };
    let user_id = user.user_id();

    let policy = ctx.active_policy();
    let bindings = ctx.store().load_bindings(user_id).await?;

    if bindings.is_empty() {
        return Ok(())
    }

    let history = ctx.store().load_history(user_id).await?;
    let in_scope = policy.window().in_scope(&history);

    // Digesting is deliberately slow, so keep it off the async executor threads.
    let plain_text_password = plain_text_password.to_string();
    let digests = tokio::task::spawn_blocking(move || {
            bindings.into_iter()
                .map(|binding| {
                    let digest = binding.digest(&plain_text_password)?;
                    Ok((binding.binding_id, digest))
                })
                .collect::<Result<Vec<(String, String)>, KeeperError>>()
        })
        .await
        .map_err(|e| KeeperError::from(e))?
        ?;

    for (binding_id, digest) in &digests {
        if in_scope.iter().any(|record| &record.binding_id == binding_id && &record.digest == digest) {
            debug!("Password for user {} matched an in-scope history record", user_id);

            return Err(ErrorCode::PasswordUsedBefore.with_msg(&policy.help_text()))
        }
    }

    Ok(())
}
