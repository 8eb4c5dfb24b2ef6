//! Map generation algorithms

mod bsp;
mod cellular;
mod drunkard;
mod maze;
mod static_map;
mod terrain;
mod wfc;

pub use bsp::{Bsp, BspConfig};
pub use cellular::{CellularAutomata, CellularConfig};
pub use drunkard::{DrunkardConfig, DrunkardWalk, WalkVariant};
pub use maze::{Maze, MazeAlgorithm, MazeConfig};
pub use static_map::{static_map, STATIC_MAP_SIZE};
pub use terrain::{PerlinConfig, PerlinTerrain};
pub use wfc::{Wfc, WfcConfig};
