//! The perceptual-hash catalog index: a BK-tree per hash kind, MD5
//! aggregation across overlay variants, and metadata filtering at query
//! time.

pub mod bktree;
pub mod error;
pub mod index;

pub use bktree::BkTree;
pub use error::{HashIndexError, HashIndexNotFoundError};
pub use index::{
    hash_roi, FieldFilter, Filters, HashIndex, HashOptions, IconFileMetadata, IconMetadataSource, QueryHit,
};
