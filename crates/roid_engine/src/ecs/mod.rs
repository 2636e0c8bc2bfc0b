//! Entity-Component-System implementation
//!
//! The physics core only talks to entities through the [`Registry`] trait;
//! [`World`] is the sparse-set implementation shipped with the engine.

pub mod world;
pub mod entity;
pub mod component;
pub mod storage;
pub mod registry;
pub mod system;

pub use world::World;
pub use entity::Entity;
pub use component::Component;
pub use storage::ComponentStorage;
pub use registry::{Registry, EcsError};
pub use system::System;
