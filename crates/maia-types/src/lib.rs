//! Domain model and request inputs for the MAIA memory API.
//!
//! Field names and enum tags match the server's JSON wire format. Optional
//! fields are skipped when unset on the way out and default to `None` on the
//! way in.

mod dto;
mod model;

pub use dto::*;
pub use model::*;
