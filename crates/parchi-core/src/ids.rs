//! Process-wide identifier generation.
//!
//! Every `uploadId` and `imageId` comes from an [`IdGenerator`]. The default generator
//! produces random (v4) UUIDs drawn from the OS random source. It keeps no state, so
//! concurrent callers never contend and never observe the same value; the 122 random bits
//! make collisions negligible for the lifetime of the service.

use uuid::Uuid;

/// Source of globally unique identifiers. Implementations must be safe to call
/// concurrently from any number of tasks.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

/// Random UUID v4 generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}
