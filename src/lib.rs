//! Timeline geometry and date arithmetic for an interactive Gantt editor.
//!
//! The [`model`] module is a pure function library: calendar dates,
//! working-day arithmetic over a weekday mask, day-indexed pixel mapping,
//! bar segmentation, progress markers and the pointer gesture resolver.
//! [`io`] reads and writes the JSON document; [`config`] holds user
//! preferences.

pub mod config;
pub mod error;
pub mod io;
pub mod model;

pub use error::{Error, Result};
