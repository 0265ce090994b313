///
/// The user identity collaborator - implemented by the embedding authentication layer.
///
/// History is keyed on the stable identifier this trait exposes. An identity that
/// has not been persisted yet (account-creation flows) has no stable identifier to
/// key history on, so both validator entry points silently skip it.
///
pub trait Identity: Send + Sync {
    /// The stable, comparable identifier for this user.
    fn user_id(&self) -> &str;

    /// False while the identity only exists in memory on the caller's side.
    fn is_persisted(&self) -> bool;
}
