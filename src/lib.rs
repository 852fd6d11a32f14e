pub mod bitmap;
pub mod config;
pub mod error;
pub mod group;
pub mod nav;
pub mod paginator;
pub mod scope;
pub mod source;
pub mod store;

// Re-export common types for convenience
pub use config::AlphabarConfig;
pub use error::{Error, Result};
pub use group::{Group, GroupCounts, Letter};
pub use nav::{navigation, NavOptions, NavSlot, Navigation};
pub use paginator::{BucketPaginator, PaginatorView};
pub use scope::AlphaScopeExt;
pub use source::{GroupCounter, MemorySource, Predicate, Record, RecordFilter, RecordSource};
pub use store::{RecordSet, RecordStore, RedbSource};
