pub mod item;
pub mod source;

pub use item::{ContentItem, MISSING_LINK};
pub use source::{Listing, SortOrder, SourceKind, SourceSpec};
