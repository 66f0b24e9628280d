//! HexGrid command-line tools
//!
//! A demo layer over `hexgrid-core`: terrain and a reference unit, JSON
//! scenario files, random scenario generation, and text rendering of
//! search results.

pub mod commands;
pub mod generate;
pub mod render;
pub mod scenario;
pub mod terrain;

pub use commands::Session;
pub use scenario::Scenario;
