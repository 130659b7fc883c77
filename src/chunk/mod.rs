//! Grouping of cleaned document lines into per-person records
//!
//! Two strategies work over the same input, an ordered slice of lines:
//! - stride: every `n` consecutive lines form one record (name, title,
//!   description). Used where the source document is already regular.
//! - header: a line that looks like a role heading ("Rev. ...",
//!   "Elder ...") opens a record that runs until the next heading.
//!
//! Neither strategy reorders, validates or fails. Short input produces
//! short or empty records and is left for a human to review.

mod fixed;
mod header;

pub use fixed::*;
pub use header::*;
