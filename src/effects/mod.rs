//! Post-processing passes shared by the dungeon generators

mod connectivity;
mod markers;

pub use connectivity::{
    ensure_connected, keep_largest_region, remove_dead_ends, stitch_regions, ConnectivityPolicy,
};
pub use markers::{place_markers, place_markers_scanline};
