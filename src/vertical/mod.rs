// gridcompare/src/vertical/mod.rs

mod align;
mod errors;
mod locator;
mod tropopause;

pub use align::{align_vertical, orient_vertical};
pub use errors::{LevelError, PartitionError};
pub use locator::{find_level_from_array, locate_level, nearest_levels};
pub use tropopause::{Partition, TropopausePartitioner, VerticalSegment, TROPOPAUSE_PROXY_HPA};
