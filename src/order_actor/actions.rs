//! Custom actions for the Order actor.

use crate::model::{Order, OrderStatus};

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Moves the order to the given status. Any status may follow any other.
    SetStatus(OrderStatus),
}

/// Outcome of [`OrderAction::SetStatus`].
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub order: Order,
    pub previous: OrderStatus,
}
