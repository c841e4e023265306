//! Message bridge decoding
//!
//! Events emitted by the injected patcher arrive as raw strings over a
//! fire-and-forget post-message channel. The sender runs inside an
//! untrusted, possibly hostile page, so nothing about the wire shape is
//! trusted: messages are schema-validated here before the session
//! controller sees them.
//!
//! Wire format: `{"type": "...", "payload": "..."}`. Unrecognized types are
//! ignored rather than treated as errors, so the patcher can grow new
//! message kinds without breaking older hosts.

use serde::Deserialize;
use url::Url;

use crate::errors::BridgeError;

/// A validated event from the hosted page
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// The patcher saw a streamable media URL in the page's traffic
    VideoLink(String),
    /// The patcher suppressed a script-driven redirect
    RedirectBlocked(String),
    /// Well-formed message of a kind this host does not handle
    Ignored(String),
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

/// Decode one raw bridge message
///
/// Errors mean the message was malformed; callers log and drop it. A
/// well-formed message with an unknown type decodes to
/// [`BridgeEvent::Ignored`].
pub fn decode(raw: &str) -> Result<BridgeEvent, BridgeError> {
    let message: RawMessage = serde_json::from_str(raw)?;
    match message.kind.as_str() {
        "VIDEO_LINK" => {
            let url = string_payload(&message, "VIDEO_LINK")?;
            // captured links must be absolute URLs; anything else is noise
            Url::parse(&url)
                .map_err(|e| BridgeError::payload("VIDEO_LINK", e.to_string()))?;
            Ok(BridgeEvent::VideoLink(url))
        }
        "REDIRECT_BLOCKED" => {
            let target = string_payload(&message, "REDIRECT_BLOCKED")?;
            Ok(BridgeEvent::RedirectBlocked(target))
        }
        other => Ok(BridgeEvent::Ignored(other.to_string())),
    }
}

fn string_payload(message: &RawMessage, kind: &str) -> Result<String, BridgeError> {
    match &message.payload {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(_) => Err(BridgeError::payload(kind, "payload must be a string")),
        None => Err(BridgeError::payload(kind, "payload missing")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_link_decodes() {
        let event = decode(r#"{"type":"VIDEO_LINK","payload":"https://cdn.example.com/v.m3u8"}"#)
            .unwrap();
        assert_eq!(
            event,
            BridgeEvent::VideoLink("https://cdn.example.com/v.m3u8".to_string())
        );
    }

    #[test]
    fn test_redirect_blocked_decodes() {
        let event =
            decode(r#"{"type":"REDIRECT_BLOCKED","payload":"https://spam.example/land"}"#).unwrap();
        assert_eq!(
            event,
            BridgeEvent::RedirectBlocked("https://spam.example/land".to_string())
        );
    }

    #[test]
    fn test_unknown_type_is_ignored_not_error() {
        let event = decode(r#"{"type":"TELEMETRY","payload":"whatever"}"#).unwrap();
        assert_eq!(event, BridgeEvent::Ignored("TELEMETRY".to_string()));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(decode("not json").is_err());
        assert!(decode("").is_err());
        assert!(decode("42").is_err());
    }

    #[test]
    fn test_wrong_payload_shape_is_error() {
        assert!(decode(r#"{"type":"VIDEO_LINK"}"#).is_err());
        assert!(decode(r#"{"type":"VIDEO_LINK","payload":7}"#).is_err());
        assert!(decode(r#"{"type":"VIDEO_LINK","payload":""}"#).is_err());
        assert!(decode(r#"{"type":"VIDEO_LINK","payload":"not a url"}"#).is_err());
    }
}
