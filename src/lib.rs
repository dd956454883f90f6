//! # Delve
//!
//! Procedural dungeon-map generation core for tabletop RPG tools.
//!
//! ## Architecture Overview
//!
//! Delve is the headless core of a map tool: given a size preset, a style,
//! and a seed, it emits a map artifact — filled cells, placed objects, and
//! a metadata record sufficient to re-stock the same layout later. The
//! pipeline runs in two stages:
//!
//! - **Layout**: room placement, connection graph, corridor carving, door
//!   inference, stairs and water, cell materialization
//! - **Stocking**: per-room category rolls, templated fills, zone-aware
//!   object placement, corridor traps
//!
//! Every phase draws from a single seeded [`DiceRoller`], so the whole
//! artifact is a pure function of configuration and seed. The core performs
//! no I/O; callers serialize the artifact with serde_json.
//!
//! ```
//! use delve::{generate_seeded, MapStyle, SizePreset, StockingConfig};
//!
//! let artifact = generate_seeded(
//!     SizePreset::Small,
//!     MapStyle::Classic,
//!     None,
//!     &StockingConfig::default(),
//!     42,
//! )
//! .expect("small classic dungeon");
//! assert!(!artifact.cells.is_empty());
//! ```

pub mod config;
pub mod generation;
pub mod map;
pub mod rng;
pub mod stocking;

pub use config::*;
pub use generation::*;
pub use map::*;
pub use rng::*;
pub use stocking::*;

/// Core error type for the Delve generation engine.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration is invalid; the only error that fails a generate call
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
