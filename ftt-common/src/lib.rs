//! # FTT Common Library
//!
//! Shared code for the FTT label services:
//! - Error and result types
//! - Bootstrap configuration loading and root folder resolution
//! - Label lifecycle event types (LabelEvent) and the EventBus
//! - Time helpers

pub mod config;
pub mod error;
pub mod events;
pub mod time;

pub use error::{Error, Result};
