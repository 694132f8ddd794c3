//! Filter-and-view pipeline behind the sleepscope dashboard.
//!
//! Load a table once, then per session turn a category selection and a
//! normalized slider range into a filtered view, rendered as a table or a
//! scatter plot.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod scale;
pub mod view;

pub use error::{DomainError, Error, LoadError};
