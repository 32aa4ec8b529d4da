//! Cycle management
//!
//! This module handles cycle records, the reducer and store that change
//! them, the tick task, countdown formatting and timer configuration.

pub mod clock;
pub mod config;
pub mod countdown;
pub mod model;
pub mod reducer;
pub mod session;
pub mod store;
pub mod ticker;
pub mod validation;
