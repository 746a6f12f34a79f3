//! Dictation session management
//!
//! This module provides the `DictationSession` state machine that manages:
//! - The lifecycle of one connection to the dictation server
//! - Decoding inbound frames into transcriptions
//! - Writing transcriptions into whichever document has focus
//! - Status reporting and session statistics

mod session;
mod state;
mod stats;

pub use session::DictationSession;
pub use state::SessionState;
pub use stats::SessionStats;
