//! Prefilter tunables.

use icon_hashindex::HashOptions;

#[derive(Debug, Clone, Copy)]
pub struct PrefilterOptions {
    pub phash_radius: u32,
    pub dhash_radius: u32,
    pub max_allowed_gap: u32,
    pub max_next_ranks: u32,
    pub hash_options: HashOptions,
    /// Worker-pool chunksize.
    pub chunksize: usize,
}

impl Default for PrefilterOptions {
    fn default() -> Self {
        Self {
            phash_radius: 18,
            dhash_radius: 10,
            max_allowed_gap: 6,
            max_next_ranks: 2,
            hash_options: HashOptions::default(),
            chunksize: 10,
        }
    }
}
