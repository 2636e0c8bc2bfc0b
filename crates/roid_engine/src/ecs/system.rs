//! System trait

use std::time::Duration;

use super::Registry;

/// System trait for processing entities and components once per frame
pub trait System<R: Registry> {
    /// Run the system for one rendered frame
    fn update(&mut self, registry: &mut R, delta: Duration);

    /// Name used in log output
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
