//! Admin console: the sortable per-tenant inventory tables.
//!
//! [`TableController`] keeps the fetched rows of every expanded tenant as the
//! single source of truth, sorts them in place on header clicks and renders
//! escaped HTML for the page to display.

pub mod controller;
pub mod markup;
pub mod sort;
pub mod strings;

pub use controller::{Command, Effect, FetchError, Phase, Section, TableController};
pub use sort::{SortDirection, SortKey, SortState};
pub use strings::Strings;
