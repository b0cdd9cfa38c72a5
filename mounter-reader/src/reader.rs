//! The contract every concrete resource reader implements.

use mounter_core::{MountingPoint, RelationshipQueue, ResourceKind};

use crate::error::ReaderError;

/// State shared by the readers of one run.
pub struct ReadContext<'a> {
    /// The mounting point under construction.
    pub mounting_point: &'a mut MountingPoint,
    /// Relationships queued by entry ingestion, resolved by the runner.
    pub relationships: &'a mut RelationshipQueue,
}

/// Reads one kind of resource from a source into the mounting point.
pub trait ResourceReader {
    fn kind(&self) -> ResourceKind;

    fn read(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), ReaderError>;
}
