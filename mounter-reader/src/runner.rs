//! Ordered execution of resource readers.
//!
//! Whatever order the readers are handed over in, they run by ingestion
//! rank: the site first (its locales drive everything else), content assets
//! before anything carrying rich text, content types before entries, and
//! pages last. Relationships are resolved exactly once, right after the
//! content entries reader.

use mounter_core::{Locale, MountingPoint, RelationshipQueue, ResourceKind};

use crate::error::ReaderError;
use crate::reader::{ReadContext, ResourceReader};

/// Position of `kind` in an ingestion run.
pub fn rank(kind: ResourceKind) -> u8 {
    match kind {
        ResourceKind::Site => 0,
        ResourceKind::ContentAssets => 1,
        ResourceKind::ContentTypes => 2,
        ResourceKind::ThemeAssets => 3,
        ResourceKind::Snippets => 4,
        ResourceKind::ContentEntries => 5,
        ResourceKind::Pages => 6,
    }
}

/// A list of readers plus the options of one run.
pub struct Runner<'r> {
    readers: Vec<Box<dyn ResourceReader + 'r>>,
    forced_locales: Vec<Locale>,
}

impl<'r> Runner<'r> {
    pub fn new(readers: Vec<Box<dyn ResourceReader + 'r>>) -> Self {
        Self {
            readers,
            forced_locales: Vec::new(),
        }
    }

    /// Override the site's locales once the site is read. Empty means no override.
    pub fn force_locales(mut self, locales: Vec<Locale>) -> Self {
        self.forced_locales = locales;
        self
    }

    /// Keep only the readers for `kinds`. The site reader is always kept.
    pub fn only(mut self, kinds: &[ResourceKind]) -> Self {
        self.readers
            .retain(|reader| reader.kind() == ResourceKind::Site || kinds.contains(&reader.kind()));
        self
    }

    /// Kinds that will be read, in execution order.
    pub fn kinds(&self) -> Vec<ResourceKind> {
        let mut kinds: Vec<ResourceKind> = self.readers.iter().map(|reader| reader.kind()).collect();
        kinds.sort_by_key(|kind| rank(*kind));
        kinds
    }

    /// Run every reader and hand back the finished mounting point.
    ///
    /// On error the partially built mounting point is dropped.
    pub fn run(mut self) -> Result<MountingPoint, ReaderError> {
        self.readers.sort_by_key(|reader| rank(reader.kind()));
        if self.readers.first().map(|reader| reader.kind()) != Some(ResourceKind::Site) {
            return Err(ReaderError::MissingSiteReader);
        }

        let mut mounting_point = MountingPoint::new();
        let mut relationships = RelationshipQueue::new();

        for reader in &mut self.readers {
            let kind = reader.kind();
            tracing::debug!("reading {kind}");
            mounting_point.init_resource(kind);

            let mut ctx = ReadContext {
                mounting_point: &mut mounting_point,
                relationships: &mut relationships,
            };
            reader.read(&mut ctx)?;

            match kind {
                ResourceKind::Site => {
                    mounting_point.force_locales(std::mem::take(&mut self.forced_locales));
                    tracing::info!(
                        "site read; locales: {}",
                        mounting_point
                            .locales()
                            .iter()
                            .map(Locale::as_str)
                            .collect::<Vec<_>>()
                            .join(", ")
                    );
                }
                ResourceKind::ContentEntries => {
                    let pending = std::mem::take(&mut relationships);
                    let count = pending.len();
                    let report = pending.resolve(&mut mounting_point);
                    tracing::info!(
                        "{} entries read; {}/{count} relationships resolved",
                        mounting_point.entries_len(),
                        report.resolved
                    );
                }
                _ => {
                    if let Some(resource) = mounting_point.resource(kind) {
                        tracing::info!("{} {kind} read", resource.len());
                    }
                }
            }
        }

        Ok(mounting_point)
    }
}
