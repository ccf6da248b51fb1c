//! Browser adapters for the Stillpoint core ports.

pub mod audio;
pub mod clock;
pub mod storage;
pub mod ticker;


pub use audio::WebAudioCuePlayer;
pub use clock::BrowserClock;
pub use ticker::IntervalTicker;
