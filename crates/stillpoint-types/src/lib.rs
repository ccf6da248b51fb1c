pub mod config;
pub mod error;
pub mod event;
pub mod session;
pub mod stats;
pub mod timer;


pub use error::MeditationError;
pub type Result<T> = std::result::Result<T, MeditationError>;
