//! File parsing for the Aequorea evaluation ecosystem.
//!
//! - **Inference shards** — [`ShardReader`], a lazy record iterator over one
//!   TSV shard, and [`shard_paths`] for stable directory listings
//! - **Ground truth** — [`read_ground_truth`] for nested TSV annotations

pub mod ground_truth;
pub mod shard;

pub use ground_truth::read_ground_truth;
pub use shard::{shard_paths, ShardReader};
