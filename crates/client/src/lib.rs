//! Headless front end for the delver movement kernel.
//!
//! A [`Session`] owns one game state loaded from the content directory and
//! plays movement commands against it until they finish or the turn budget
//! runs out. Each command ends in a [`RunSummary`] that the binary prints as
//! JSON.
pub mod config;
pub mod keys;
pub mod logging;
pub mod render;
pub mod session;

pub use config::ClientConfig;
pub use keys::{delta_for_key, parse_keys};
pub use logging::setup_logging;
pub use render::render_memory;
pub use session::{Command, RunSummary, Session, SessionBuilder};
