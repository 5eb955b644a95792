//! Codec and scripting pipeline for Diesel `.model` files.

/// Section codec, model graph, bounds, and import merge.
pub mod model;
/// Operation items, validation, and the script interpreter.
pub mod script;
mod util;
