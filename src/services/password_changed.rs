use tracing::{debug, info};
use super::{ServiceContext, tracked_user};
use crate::model::binding::HashBinding;
use crate::model::identity::Identity;
use crate::model::policy::{ReusePolicy, RetentionWindow};
use crate::utils::errors::KeeperError;

///
/// Record a committed password change - the post-commit half of the policy.
///
/// The new password is digested under the user's CURRENT binding (resolved or
/// lazily created from the configured algorithm and iteration count), appended to
/// the history, and then the history is pruned back to the retention window across
/// all the user's bindings.
///
/// Absent or unsaved users are skipped, exactly as in validate.
///
pub async fn password_changed(ctx: &ServiceContext, plain_text_password: &str, user: Option<&dyn Identity>)
    -> Result<(), KeeperError> {

    let user = match tracked_user(user) {
        Some(user) => user,
        None => return Ok(()),
    };
    let user_id = user.user_id();

    // Serialise changes for this user - append-then-prune must observe a settled
    // history even when two change requests land together.
    let lock = ctx.user_lock(user_id);
    let _guard = lock.lock().await;

    let policy = ctx.active_policy();
    let binding = current_binding(ctx, user_id, &policy).await?;

    // Digesting is deliberately slow, so keep it off the async executor threads.
    let plain_text_password = plain_text_password.to_string();
    let binding_for_hashing = binding.clone();
    let digest = tokio::task::spawn_blocking(move || binding_for_hashing.digest(&plain_text_password))
        .await
        .map_err(|e| KeeperError::from(e))?
        ?;

    ctx.store()
        .append(user_id, &binding.binding_id, &digest, bson::DateTime::from_chrono(ctx.now()))
        .await?;

    prune(ctx, user_id, &policy.window()).await
}

///
/// The user's binding for the configured hash settings, created with a fresh salt
/// the first time a change happens under settings not seen for them before. An
/// iteration-count or algorithm upgrade therefore starts a new binding while the
/// old ones (and their history) stay checkable.
///
async fn current_binding(ctx: &ServiceContext, user_id: &str, policy: &ReusePolicy)
    -> Result<HashBinding, KeeperError> {

    match ctx.store().find_binding(user_id, policy.algorithm, policy.iterations).await? {
        Some(binding) => Ok(binding),
        None => {
            info!("Creating {} binding with {} iterations for user {}", policy.algorithm, policy.iterations, user_id);

            let binding = HashBinding::new(user_id, policy.algorithm, policy.iterations, ctx.now());
            ctx.store().create_binding(binding).await
        },
    }
}

///
/// Delete every record that has aged out of the retention window. Recency is judged
/// across the union of the user's bindings - an old record under a deprecated
/// algorithm still occupies a window slot until newer changes push it out.
///
async fn prune(ctx: &ServiceContext, user_id: &str, window: &RetentionWindow) -> Result<(), KeeperError> {
    if !window.is_bounded() {
        return Ok(())
    }

    let history = ctx.store().load_history(user_id).await?;
    let aged_out: Vec<String> = window.aged_out(&history)
        .iter()
        .map(|record| record.record_id.clone())
        .collect();

    if aged_out.is_empty() {
        return Ok(())
    }

    let deleted = ctx.store().delete_records(user_id, &aged_out).await?;
    debug!("Pruned {} history records for user {}", deleted, user_id);

    Ok(())
}
