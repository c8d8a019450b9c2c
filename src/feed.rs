//! # Order Feed
//!
//! In-process publish/subscribe keyed by order id. Every order gets a room
//! holding an append-only log and a broadcast channel. Publishing assigns the
//! next sequence number and sends while holding the feed lock, so all
//! subscribers of one order observe its events in the same order.
//!
//! Transport (websockets and the like) is left to callers: they `join`,
//! replay the backlog, then forward from the live receiver.

use crate::model::{AccountId, OrderId, OrderStatus, Role};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::debug;

const LIVE_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FeedEvent {
    Created { number: u64 },
    StatusChanged { from: OrderStatus, to: OrderStatus },
    Message { author: AccountId, role: Role, text: String },
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    /// Strictly increasing within one order, starting at 1.
    pub seq: u64,
    pub order_id: OrderId,
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: FeedEvent,
}

struct Room {
    log: Vec<FeedEntry>,
    seq: u64,
    live: broadcast::Sender<FeedEntry>,
    subscribers: usize,
}

impl Room {
    fn new() -> Self {
        let (live, _) = broadcast::channel(LIVE_CAPACITY);
        Self {
            log: Vec::new(),
            seq: 0,
            live,
            subscribers: 0,
        }
    }
}

type Rooms = Arc<Mutex<HashMap<OrderId, Room>>>;

fn lock(rooms: &Rooms) -> MutexGuard<'_, HashMap<OrderId, Room>> {
    // The map stays consistent even if a holder panicked
    rooms.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Default)]
pub struct OrderFeed {
    rooms: Rooms,
}

/// A joined order room. Dropping it leaves the room.
pub struct Subscription {
    pub order_id: OrderId,
    /// Everything published before the join.
    pub backlog: Vec<FeedEntry>,
    pub live: broadcast::Receiver<FeedEntry>,
    rooms: Rooms,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(room) = lock(&self.rooms).get_mut(&self.order_id) {
            room.subscribers = room.subscribers.saturating_sub(1);
        }
    }
}

impl OrderFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&self, order_id: OrderId) -> Subscription {
        let mut rooms = lock(&self.rooms);
        let room = rooms.entry(order_id).or_insert_with(Room::new);
        room.subscribers += 1;
        debug!(%order_id, subscribers = room.subscribers, "Joined order feed");
        Subscription {
            order_id,
            backlog: room.log.clone(),
            live: room.live.subscribe(),
            rooms: Arc::clone(&self.rooms),
        }
    }

    /// Appends `event` to the order's log and sends it to live subscribers.
    ///
    /// A `Deleted` event closes the room: the log is discarded once the
    /// event has been delivered.
    pub fn publish(&self, order_id: OrderId, event: FeedEvent) -> FeedEntry {
        let mut rooms = lock(&self.rooms);
        let room = rooms.entry(order_id).or_insert_with(Room::new);
        room.seq += 1;
        let entry = FeedEntry {
            seq: room.seq,
            order_id,
            at: Utc::now(),
            event,
        };
        room.log.push(entry.clone());
        // No live receivers is fine
        let _ = room.live.send(entry.clone());
        debug!(%order_id, seq = entry.seq, "Published to order feed");

        if entry.event == FeedEvent::Deleted {
            rooms.remove(&order_id);
        }
        entry
    }

    /// The order's log so far, oldest first.
    pub fn history(&self, order_id: OrderId) -> Vec<FeedEntry> {
        lock(&self.rooms)
            .get(&order_id)
            .map(|room| room.log.clone())
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self, order_id: OrderId) -> usize {
        lock(&self.rooms)
            .get(&order_id)
            .map_or(0, |room| room.subscribers)
    }
}
