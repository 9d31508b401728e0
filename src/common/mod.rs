//! Common types, traits, and error definitions for rrt_tree
//!
//! This module provides the building blocks shared by the tree,
//! the obstacle fields and the visualization helpers.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
