//! Deferred two-phase relationship resolution.
//!
//! While entries are ingested, `belongs_to` and `many_to_many` fields are not
//! stored; each one becomes a [`PendingRelationship`]. Once every entry of
//! every content type (and every locale) is registered, the queue is
//! consumed exactly once by [`RelationshipQueue::resolve`], which turns the
//! raw target ids into references to registered entries.

use std::collections::HashSet;

use crate::entry::{EntryId, FieldValue};
use crate::locale::Locale;
use crate::mounting_point::MountingPoint;

/// Raw target id(s) as found in the source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetIds {
    /// A single reference (`belongs_to`); `None` when the source sent null.
    One(Option<EntryId>),
    /// An ordered list of references (`many_to_many`).
    Many(Vec<EntryId>),
}

/// A cross-entry reference awaiting resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRelationship {
    pub source: EntryId,
    pub field: String,
    pub targets: TargetIds,
    /// Locale the reference was read under; the resolved value is stored there.
    pub locale: Locale,
}

/// Outcome of a resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Relationships whose field received a value.
    pub resolved: usize,
    /// Target ids that matched no registered entry.
    pub dangling: Vec<EntryId>,
    /// Source ids that matched no registered entry.
    pub missing_sources: Vec<EntryId>,
}

/// Append-only queue of pending relationships.
#[derive(Debug, Clone, Default)]
pub struct RelationshipQueue {
    pending: Vec<PendingRelationship>,
}

impl RelationshipQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, relationship: PendingRelationship) {
        self.pending.push(relationship);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingRelationship> {
        self.pending.iter()
    }

    /// Resolve every pending relationship against the registered entries.
    ///
    /// - single target: the entry's id, or no value when it is unknown;
    /// - list of targets: known ids in input order, unknown ids dropped,
    ///   repeated ids kept once at their first position.
    ///
    /// Unresolved ids never fail the pass.
    pub fn resolve(self, mounting_point: &mut MountingPoint) -> ResolutionReport {
        let mut report = ResolutionReport::default();

        for relationship in self.pending {
            let PendingRelationship {
                source,
                field,
                targets,
                locale,
            } = relationship;

            if mounting_point.entry_by_id(&source).is_none() {
                tracing::warn!("relationship '{field}' skipped: unknown source entry {source}");
                report.missing_sources.push(source);
                continue;
            }

            let value = match targets {
                TargetIds::One(None) => None,
                TargetIds::One(Some(target)) => {
                    if mounting_point.entry_by_id(&target).is_some() {
                        Some(FieldValue::Reference(target))
                    } else {
                        tracing::debug!("{source}.{field}: unresolved target {target}");
                        report.dangling.push(target);
                        None
                    }
                }
                TargetIds::Many(targets) => {
                    let mut seen = HashSet::new();
                    let mut resolved = Vec::with_capacity(targets.len());
                    for target in targets {
                        if !seen.insert(target.clone()) {
                            continue;
                        }
                        if mounting_point.entry_by_id(&target).is_some() {
                            resolved.push(target);
                        } else {
                            tracing::debug!("{source}.{field}: unresolved target {target}");
                            report.dangling.push(target);
                        }
                    }
                    Some(FieldValue::References(resolved))
                }
            };

            let Some(value) = value else { continue };
            if let Some(entry) = mounting_point.entry_by_id_mut(&source) {
                entry.set_in(field, locale, value);
                report.resolved += 1;
            }
        }

        if !report.dangling.is_empty() {
            tracing::warn!(
                "{} relationship target(s) could not be resolved",
                report.dangling.len()
            );
        }
        report
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ContentEntry;

    fn entry(id: &str, slug: &str) -> ContentEntry {
        let mut entry = ContentEntry::new(id, "songs");
        entry.slug.set_in("en", slug.to_string());
        entry
    }

    fn mount() -> MountingPoint {
        let mut mounting_point = MountingPoint::new();
        for (id, slug) in [("1", "one"), ("2", "two"), ("3", "three")] {
            mounting_point.register_entry(entry(id, slug));
        }
        mounting_point
    }

    fn pending(source: &str, field: &str, targets: TargetIds) -> PendingRelationship {
        PendingRelationship {
            source: EntryId::from(source),
            field: field.to_string(),
            targets,
            locale: Locale::from("en"),
        }
    }

    #[test]
    fn belongs_to_resolves_known_target() {
        let mut mounting_point = mount();
        let mut queue = RelationshipQueue::new();
        queue.push(pending("1", "band", TargetIds::One(Some(EntryId::from("2")))));
        let report = queue.resolve(&mut mounting_point);

        assert_eq!(report.resolved, 1);
        let source = mounting_point.entry_by_id(&EntryId::from("1")).expect("source");
        assert_eq!(source.get("band"), Some(&FieldValue::Reference(EntryId::from("2"))));
    }

    #[test]
    fn belongs_to_unknown_target_leaves_no_value() {
        let mut mounting_point = mount();
        let mut queue = RelationshipQueue::new();
        queue.push(pending("1", "band", TargetIds::One(Some(EntryId::from("99")))));
        let report = queue.resolve(&mut mounting_point);

        assert_eq!(report.dangling, vec![EntryId::from("99")]);
        let source = mounting_point.entry_by_id(&EntryId::from("1")).expect("source");
        assert!(source.get("band").is_none());
    }

    #[test]
    fn many_to_many_keeps_input_order_and_drops_unknown() {
        let mut mounting_point = mount();
        let mut queue = RelationshipQueue::new();
        let ids = ["3", "42", "2"].map(EntryId::from).to_vec();
        queue.push(pending("1", "tags", TargetIds::Many(ids)));
        queue.resolve(&mut mounting_point);

        let source = mounting_point.entry_by_id(&EntryId::from("1")).expect("source");
        assert_eq!(
            source.get("tags").and_then(FieldValue::as_references),
            Some(&[EntryId::from("3"), EntryId::from("2")][..])
        );
    }

    #[test]
    fn many_to_many_collapses_repeated_ids() {
        let mut mounting_point = mount();
        let mut queue = RelationshipQueue::new();
        let ids = ["2", "3", "2"].map(EntryId::from).to_vec();
        queue.push(pending("1", "tags", TargetIds::Many(ids)));
        queue.resolve(&mut mounting_point);

        let source = mounting_point.entry_by_id(&EntryId::from("1")).expect("source");
        assert_eq!(
            source.get("tags").and_then(FieldValue::as_references),
            Some(&[EntryId::from("2"), EntryId::from("3")][..])
        );
    }

    #[test]
    fn unknown_source_is_reported() {
        let mut mounting_point = mount();
        let mut queue = RelationshipQueue::new();
        queue.push(pending("77", "band", TargetIds::One(Some(EntryId::from("1")))));
        let report = queue.resolve(&mut mounting_point);
        assert_eq!(report.missing_sources, vec![EntryId::from("77")]);
        assert_eq!(report.resolved, 0);
    }
}
