//! Account-specific resource logic: vendors, customers and the admin.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::AccountClient;
use crate::model::Account;
use resource_actor::ResourceActor;

/// Creates a new Account actor and its client.
///
/// Run the actor with a [`MediaStore`](crate::media::MediaStore) so that
/// replaced or orphaned logos are cleaned up.
pub fn new() -> (ResourceActor<Account>, AccountClient) {
    let (actor, generic_client) = ResourceActor::new(32);
    let client = AccountClient::new(generic_client);

    (actor, client)
}
