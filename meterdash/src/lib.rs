//! Client-side state for the smart meter dashboard.
//!
//! The [`scheduler`] polls the data service and owns the [`session::Session`];
//! everything else is the state it keeps and the logic applied to it.

pub mod backfill;
pub mod commands;
pub mod ingest;
pub mod operator;
pub mod readings;
pub mod render;
pub mod scheduler;
pub mod series;
pub mod session;
pub mod status;
pub mod util;
