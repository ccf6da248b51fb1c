pub mod history;
pub mod stats;
pub mod timer;
