//! Infrastructure configuration modules.

pub mod betting;
pub mod lifecycle;
pub mod logging;
pub mod matchmaking;
pub mod settings;
pub mod startup;

pub use settings::Config;
