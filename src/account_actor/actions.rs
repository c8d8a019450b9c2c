//! Custom actions for the Account actor.

/// Moderation actions on an [`Account`](crate::model::Account).
///
/// Both return the account as stored after the action.
#[derive(Debug, Clone)]
pub enum AccountAction {
    /// Blocks the account. The reason must not be blank.
    Block { reason: String },
    /// Lifts a block and clears its reason.
    Unblock,
}
