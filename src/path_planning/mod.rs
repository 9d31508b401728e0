// Path Planning: random tree growth and its obstacle fields

pub mod tree;
pub mod obstacles;
pub mod planner;

pub use tree::*;
pub use obstacles::*;
pub use planner::*;
