//! Entity implementation

slotmap::new_key_type! {
    /// Entity identifier.
    ///
    /// A generational handle: once an entity is destroyed its handle never
    /// matches a later entity that reuses the same slot.
    pub struct Entity;
}
