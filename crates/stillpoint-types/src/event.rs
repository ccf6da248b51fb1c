use serde::{Deserialize, Serialize};

use crate::session::SessionRecord;

/// Events emitted by the meditation runtime.
/// UI subscribes to these for reactive updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeditationEvent {
    /// A fresh session began
    Started { duration_secs: u32, intention: Option<String> },

    /// A paused session continues
    Resumed { remaining_secs: u32 },

    Paused { remaining_secs: u32 },

    /// The in-progress session was discarded
    Reset,

    /// Remaining time hit the midpoint with the interval bell on
    Halfway { remaining_secs: u32 },

    /// A session ran to zero and was logged
    Completed(SessionRecord),

    DurationChanged { duration_secs: u32 },

    HistoryCleared,
}

impl MeditationEvent {
    /// The audio cue that accompanies this event, if any.
    pub fn cue(&self) -> Option<Cue> {
        match self {
            MeditationEvent::Started { .. } => Some(Cue::Start),
            MeditationEvent::Halfway { .. } => Some(Cue::Halfway),
            MeditationEvent::Completed(_) => Some(Cue::Completion),
            _ => None,
        }
    }
}

/// Named sounds the audio collaborator knows how to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Start,
    Halfway,
    Completion,
}

impl Cue {
    pub fn all() -> &'static [Cue] {
        &[Cue::Start, Cue::Halfway, Cue::Completion]
    }

    pub fn label(&self) -> &str {
        match self {
            Cue::Start => "start gong",
            Cue::Halfway => "interval chime",
            Cue::Completion => "end gong",
        }
    }
}
