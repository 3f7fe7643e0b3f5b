//! Staged A* pathfinding over a mutable 2-D grid, with an animation driver
//! that replays the search's frontier/visit/path stages onto the grid at a
//! fixed cadence.

pub mod algorithm;
pub mod animation;
pub mod common;
pub mod config;
pub mod error;
pub mod grid;
pub mod scenario;
pub mod stat;
