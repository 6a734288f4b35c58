//! Media extraction from Telegram messages
//!
//! Converts a Telegram message into the transport-neutral [`InboundMessage`]
//! consumed by the relay pipeline. Nothing is downloaded here.

use crate::relay::{InboundDocument, InboundMessage};
use teloxide::types::Message;

/// Extract the photo/document references of `msg`.
///
/// For photos the last (highest-resolution) size is used.
#[must_use]
pub fn extract_inbound(msg: &Message) -> InboundMessage {
    let photo_file_id = msg
        .photo()
        .and_then(|sizes| sizes.last())
        .map(|photo| photo.file.id.0.clone());

    let document = msg.document().map(|doc| InboundDocument {
        file_id: doc.file.id.0.clone(),
        mime_type: doc.mime_type.as_ref().map(ToString::to_string),
    });

    InboundMessage {
        chat_id: msg.chat.id.0,
        photo_file_id,
        document,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn message(extra: Value) -> Message {
        let mut base = json!({
            "message_id": 10,
            "date": 1_700_000_000,
            "chat": {"id": 555, "type": "private", "first_name": "Ada"},
            "from": {"id": 555, "is_bot": false, "first_name": "Ada"}
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            for (key, value) in extra {
                base.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn test_photo_uses_largest_size() {
        let msg = message(json!({
            "photo": [
                {"file_id": "small", "file_unique_id": "s", "width": 90, "height": 90, "file_size": 100},
                {"file_id": "large", "file_unique_id": "l", "width": 1280, "height": 1280, "file_size": 9000}
            ]
        }));

        let inbound = extract_inbound(&msg);
        assert_eq!(inbound.chat_id, 555);
        assert_eq!(inbound.photo_file_id.as_deref(), Some("large"));
        assert!(inbound.document.is_none());
    }

    #[test]
    fn test_document_keeps_mime_type() {
        let msg = message(json!({
            "document": {
                "file_id": "doc-id",
                "file_unique_id": "d",
                "file_name": "cat.png",
                "mime_type": "image/png",
                "file_size": 2048
            }
        }));

        let inbound = extract_inbound(&msg);
        assert!(inbound.photo_file_id.is_none());
        assert_eq!(
            inbound.document,
            Some(InboundDocument {
                file_id: "doc-id".to_string(),
                mime_type: Some("image/png".to_string()),
            })
        );
    }

    #[test]
    fn test_text_message_has_no_media() {
        let msg = message(json!({"text": "hello"}));

        let inbound = extract_inbound(&msg);
        assert_eq!(inbound.chat_id, 555);
        assert!(inbound.photo_file_id.is_none());
        assert!(inbound.document.is_none());
    }
}
