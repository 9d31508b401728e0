//! rrt_tree - sampling-based motion planning core
//!
//! This crate grows a rapidly-exploring random tree over a bounded 2D
//! world, choosing the cheapest parent for every new node, until it
//! reaches a goal region. Obstacles are supplied through the
//! [`ObstacleField`] trait.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{Point2D, Path2D, WorldBounds};
pub use common::{PathPlanner, SamplingBasedPlanner, ObstacleField, Visualizable};
pub use common::{RoboticsError, RoboticsResult};
pub use path_planning::{Tree, TreeConfig, TreeNode, NodeId, Extend, RRTTreePlanner};
