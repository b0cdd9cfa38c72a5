//! Mounter core library — the in-memory content graph of a site.
//!
//! Public API surface:
//! - [`locale`] — [`Locale`], the ambient current locale and [`with_locale`]
//! - [`localized`] — [`Localized`] per-locale attribute storage
//! - [`fields`] — content type schema ([`ContentType`], [`Field`], [`FieldKind`])
//! - [`entry`] — [`ContentEntry`] and its [`FieldValue`]s
//! - [`filter`] — schema-driven filtering of raw entry attributes
//! - [`relationships`] — deferred two-phase relationship resolution
//! - [`page`] — pages and the [`PageTreeBuilder`]
//! - [`mounting_point`] — the [`MountingPoint`] aggregate root
//! - [`error`] — [`CoreError`]

pub mod asset;
pub mod entry;
pub mod error;
pub mod fields;
pub mod filter;
pub mod locale;
pub mod localized;
pub mod mounting_point;
pub mod page;
pub mod relationships;
pub mod site;

pub use asset::{rewrite_asset_urls, AssetSource, ContentAsset, ThemeAsset};
pub use entry::{ContentEntry, EntryId, FieldValue};
pub use error::CoreError;
pub use fields::{ContentType, Field, FieldKind, SelectOption};
pub use filter::{build_entry, filter_attributes, FilteredAttributes, RawRecord};
pub use locale::{current_locale, set_current_locale, with_locale, Locale, DEFAULT_LOCALE};
pub use localized::Localized;
pub use mounting_point::{ContentEntries, MountingPoint, Resource, ResourceKind};
pub use page::{
    EditableElement, EditableKind, EditableRecord, Page, PageRecord, PageTranslation, PageTree,
    PageTreeBuilder,
};
pub use relationships::{PendingRelationship, RelationshipQueue, ResolutionReport, TargetIds};
pub use site::{Site, Snippet};
