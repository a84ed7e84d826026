//! Text input and output.
//!
//! These are thin adapters around the optimizer: [`parse_instance`] turns the
//! plain-text instance format into an [`crate::model::Instance`], and
//! [`render_route`] prints a finished route.

mod parse;
mod render;

pub use parse::parse_instance;
pub use render::{render_route, Itinerary, Leg, MISSING_COST};
