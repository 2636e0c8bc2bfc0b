//! Collision events
//!
//! Contacts found during a tick are queued and only delivered after the
//! tick's resolution pass, so handlers never observe a half-resolved
//! world and cannot invalidate the contact list by destroying entities.

use crate::ecs::Entity;
use super::CollisionData;

/// One side of a confirmed contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Entity receiving the event
    pub entity: Entity,
    /// Entity it touched
    pub other: Entity,
    /// Contact with the normal pointing from `entity` toward `other`
    pub data: CollisionData,
    /// Closing speed along the normal before resolution. Positive when the
    /// bodies were approaching.
    pub relative_velocity: f32,
}

impl CollisionEvent {
    /// The same contact seen from `other`
    pub fn mirrored(&self) -> Self {
        Self {
            entity: self.other,
            other: self.entity,
            data: CollisionData {
                normal: -self.data.normal,
                ..self.data
            },
            relative_velocity: self.relative_velocity,
        }
    }
}

/// Per-tick queue of pending collision events
#[derive(Debug, Default)]
pub struct CollisionEventQueue {
    pending: Vec<CollisionEvent>,
}

impl CollisionEventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for delivery after resolution
    pub fn send(&mut self, event: CollisionEvent) {
        self.pending.push(event);
    }

    /// Queue both sides of a contact
    pub fn send_pair(&mut self, event: CollisionEvent) {
        let mirrored = event.mirrored();
        self.send(event);
        self.send(mirrored);
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending event, leaving the queue empty
    pub fn drain(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Drop pending events
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
