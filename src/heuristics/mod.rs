//! Heuristics module for MDMTSP.
//!
//! This module exports the route construction and improvement heuristics.

pub mod construction;
pub mod local_search;

pub use construction::*;
pub use local_search::*;
