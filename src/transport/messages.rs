use crate::error::DecodeError;
use crate::transport::Frame;

/// Transcription result received from the dictation server
///
/// Only `text` is read; any other fields in the record are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionPayload {
    pub text: String,
}

/// Decode one inbound frame into a transcription payload
///
/// The frame must be UTF-8 text holding a JSON object with a string `text`
/// field. Pure: the same frame always yields the same result.
pub fn decode(frame: &Frame) -> Result<TranscriptionPayload, DecodeError> {
    let raw = std::str::from_utf8(frame.as_bytes())
        .map_err(|e| DecodeError::Malformed(format!("invalid UTF-8: {}", e)))?;

    // A derived struct would also accept `["..."]`; require an object
    let record: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)
        .map_err(|e| DecodeError::Malformed(format!("not a JSON object: {}", e)))?;

    match record.get("text") {
        Some(serde_json::Value::String(text)) => Ok(TranscriptionPayload { text: text.clone() }),
        Some(_) => Err(DecodeError::Malformed("`text` is not a string".to_string())),
        None => Err(DecodeError::Malformed("missing `text` field".to_string())),
    }
}
