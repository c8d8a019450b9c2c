//! [`ActorEntity`] implementation for [`Counter`]. Names are unique.

use super::error::CounterError;
use crate::model::{Counter, CounterCreate, CounterId};
use async_trait::async_trait;
use resource_actor::ActorEntity;

/// Custom actions for Counter entities.
#[derive(Debug, Clone)]
pub enum CounterAction {
    /// Advances the sequence and returns the new value. The first call yields 1.
    Next,
}

#[async_trait]
impl ActorEntity for Counter {
    type Id = CounterId;
    type Create = CounterCreate;
    type Update = ();
    type Action = CounterAction;
    type ActionResult = u64;
    type Context = ();
    type Error = CounterError;

    fn from_create_params(id: CounterId, params: CounterCreate) -> Result<Self, CounterError> {
        Ok(Self {
            id,
            name: params.name,
            seq: 0,
        })
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.name.clone())
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), CounterError> {
        Ok(())
    }

    async fn handle_action(&mut self, action: CounterAction, _ctx: &()) -> Result<u64, CounterError> {
        match action {
            CounterAction::Next => {
                self.seq += 1;
                Ok(self.seq)
            }
        }
    }
}
