//! Utility modules for rrt_tree

pub mod visualization;

pub use visualization::{Visualizer, PathStyle, PointStyle, colors};
