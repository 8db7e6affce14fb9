//! Grid discovery.
//!
//! - [`GridExplorer`]: breadth-first frontier search driven through a [`Controller`](crate::controller::Controller)
//! - [`IslandDetector`]: connectivity diagnostic over the discovered points
//! - [`ReachabilityPruner`]: drops points with no cardinal neighbor
//!
//! # Example
//!
//! ```ignore
//! let mut explorer = GridExplorer::new(config.explorer_config());
//! explorer.enqueue_points(controller.last_observation()?.agent_position());
//! explorer.run(&mut controller)?;
//!
//! let points = config.pruner().prune(explorer.grid_points());
//! if config.island_detector().has_islands(&points) { /* inspect */ }
//! ```

mod explorer;
mod islands;
mod prune;

pub use explorer::{ExplorationSummary, ExplorerConfig, FrontierEntry, GridExplorer, SeenPointSet};
pub use islands::IslandDetector;
pub use prune::ReachabilityPruner;
