//! Pure decision logic of the relay: which messages are accepted and what
//! reply each outcome produces. No I/O happens here.

use super::RelayError;
use crate::config::{RESULT_CAPTION, RESULT_FILE_NAME};

/// Document attached to an inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundDocument {
    /// Platform file identifier
    pub file_id: String,
    /// Declared MIME type, if any
    pub mime_type: Option<String>,
}

/// Transport-neutral view of an inbound chat message, before any download
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InboundMessage {
    /// Originating chat
    pub chat_id: i64,
    /// File id of the highest-resolution photo size, if the message is a photo
    pub photo_file_id: Option<String>,
    /// Attached document, if any
    pub document: Option<InboundDocument>,
}

/// How the image arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Compressed Telegram photo
    Photo,
    /// Document whose MIME type starts with `image/`
    ImageDocument,
}

/// Validated reference to an image that still has to be downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    /// Platform file identifier
    pub file_id: String,
    /// Media kind
    pub kind: AttachmentKind,
}

/// Downloaded image bytes, owned by a single pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundAttachment {
    /// Raw image content
    pub bytes: Vec<u8>,
    /// Media kind
    pub kind: AttachmentKind,
    /// Originating chat
    pub chat_id: i64,
}

/// The single outgoing message a pipeline run produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain-text message
    Text(String),
    /// PNG document
    Png {
        /// Processed image
        bytes: Vec<u8>,
        /// Attachment file name
        file_name: &'static str,
        /// Caption
        caption: &'static str,
    },
}

/// Pick the image attachment of `message`.
///
/// Photos win over documents; a document is accepted only when its declared
/// MIME type starts with `image/`.
///
/// # Errors
///
/// Returns [`RelayError::NotAnImage`] when the message carries no usable image.
pub fn validate(message: &InboundMessage) -> Result<AttachmentRef, RelayError> {
    if let Some(file_id) = &message.photo_file_id {
        return Ok(AttachmentRef {
            file_id: file_id.clone(),
            kind: AttachmentKind::Photo,
        });
    }

    match &message.document {
        Some(doc) if is_image_mime(doc.mime_type.as_deref()) => Ok(AttachmentRef {
            file_id: doc.file_id.clone(),
            kind: AttachmentKind::ImageDocument,
        }),
        _ => Err(RelayError::NotAnImage),
    }
}

fn is_image_mime(mime_type: Option<&str>) -> bool {
    mime_type.is_some_and(|m| m.starts_with("image/"))
}

/// Translate the outcome of a run into the reply to send.
#[must_use]
pub fn reply_for(outcome: Result<Vec<u8>, RelayError>) -> Reply {
    match outcome {
        Ok(bytes) => Reply::Png {
            bytes,
            file_name: RESULT_FILE_NAME,
            caption: RESULT_CAPTION,
        },
        Err(e) => Reply::Text(e.user_message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(mime_type: Option<&str>) -> InboundMessage {
        InboundMessage {
            chat_id: 42,
            photo_file_id: None,
            document: Some(InboundDocument {
                file_id: "doc-1".to_string(),
                mime_type: mime_type.map(ToString::to_string),
            }),
        }
    }

    #[test]
    fn test_photo_is_accepted() {
        let message = InboundMessage {
            chat_id: 42,
            photo_file_id: Some("photo-1".to_string()),
            document: None,
        };

        let attachment = validate(&message).unwrap();
        assert_eq!(attachment.kind, AttachmentKind::Photo);
        assert_eq!(attachment.file_id, "photo-1");
    }

    #[test]
    fn test_image_documents_are_accepted() {
        for mime in ["image/png", "image/jpeg", "image/webp"] {
            let attachment = validate(&document(Some(mime))).unwrap();
            assert_eq!(attachment.kind, AttachmentKind::ImageDocument);
            assert_eq!(attachment.file_id, "doc-1");
        }
    }

    #[test]
    fn test_non_image_messages_are_rejected() {
        assert!(matches!(
            validate(&document(Some("application/pdf"))),
            Err(RelayError::NotAnImage)
        ));
        assert!(matches!(
            validate(&document(Some("text/image/plain"))),
            Err(RelayError::NotAnImage)
        ));
        assert!(matches!(
            validate(&document(None)),
            Err(RelayError::NotAnImage)
        ));
        assert!(matches!(
            validate(&InboundMessage::default()),
            Err(RelayError::NotAnImage)
        ));
    }

    #[test]
    fn test_success_reply_is_png_document() {
        let reply = reply_for(Ok(vec![1, 2, 3]));
        assert_eq!(
            reply,
            Reply::Png {
                bytes: vec![1, 2, 3],
                file_name: "no-bg.png",
                caption: "Done ✅ Background removed.",
            }
        );
    }

    #[test]
    fn test_failure_replies_are_text() {
        let reply = reply_for(Err(RelayError::Service {
            status: 400,
            payload: None,
        }));
        assert_eq!(
            reply,
            Reply::Text("Background removal failed: remove.bg failed with status 400".to_string())
        );

        let reply = reply_for(Err(RelayError::Transport("connection reset".to_string())));
        assert_eq!(
            reply,
            Reply::Text("Something went wrong. Please try again later.".to_string())
        );
    }
}
