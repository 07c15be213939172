//! pipbot Common Types
//!
//! This crate contains the types shared across the pipbot workspace:
//! validated currency codes, exact decimal amount parsing and display
//! formatting, and time helpers.

pub mod monetary;
pub mod error;
pub mod time;

pub use monetary::*;
pub use error::*;
pub use time::*;
