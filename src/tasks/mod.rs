//! Background Tasks Module
//!
//! # Tasks
//! - Expiry sweep: purges expired entries from the in-process store

mod cleanup;

pub use cleanup::spawn_cleanup_task;
