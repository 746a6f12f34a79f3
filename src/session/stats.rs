use super::state::SessionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics about a dictation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Current lifecycle state
    pub state: SessionState,

    /// Address the next (or current) connection uses
    pub endpoint: String,

    /// When the current connection opened, if connected
    pub connected_at: Option<DateTime<Utc>>,

    /// Frames delivered while connected
    pub frames_received: usize,

    /// Transcriptions written into a document
    pub transcripts_inserted: usize,

    /// Frames dropped because they did not decode
    pub decode_failures: usize,

    /// Transcriptions dropped because no document had focus
    pub unfocused_drops: usize,
}
