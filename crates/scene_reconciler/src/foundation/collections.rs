//! Handle types and arena collections
//!
//! Scene objects and tree nodes both live in generational slot maps, so a
//! handle that outlives its entry is detected instead of aliasing a new one.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to a scene object stored in an [`ObjectStore`](crate::object::ObjectStore)
    pub struct ObjectId;

    /// Stable handle to a logical tree node owned by the [`Host`](crate::host::Host)
    pub struct NodeId;
}
