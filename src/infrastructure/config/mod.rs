//! Infrastructure configuration modules.

pub mod logging;
pub mod paths;
pub mod refresh;
pub mod settings;
pub mod storage;

pub use settings::Config;
