//! Client-side view model: classification, filtering, sorting, grouping.
//!
//! - `classify`: conventional-commit type tags and scope extraction
//! - `state`: `ViewState` and its controls
//! - `pipeline`: filter → sort → group → order → stats
//! - `labels`: day/count/relative-time labels and day summaries

pub mod classify;
pub mod labels;
pub mod pipeline;
pub mod state;

pub use classify::{CommitType, classify, scope};
pub use pipeline::{build, build_at};
pub use state::{SortDirection, TypeFilter, ViewState};
