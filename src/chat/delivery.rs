//! Artifact delivery.
//!
//! Last hop before the transport. Artifacts can age between being cached
//! and being requested again, so delivery re-runs the full validation
//! before anything is sent.

use std::path::Path;

use crate::chat::broker::Choice;
use crate::chat::transport::{ChatId, ChatTransport, MediaPayload, MessageId};
use crate::core::error::{FetchError, FetchResult};
use crate::core::validation;

/// Packages a verified artifact for the transport.
///
/// Inline sends carry the title as their caption; document sends leave it
/// to the filename.
pub fn payload_for(path: &Path, title: &str, choice: Choice) -> MediaPayload {
    MediaPayload {
        path: path.to_path_buf(),
        mime: choice.format.mime(),
        file_name: format!(
            "{}.{}",
            validation::sanitize_filename(title),
            choice.format.extension()
        ),
        caption: (!choice.as_document).then(|| title.to_string()),
        as_document: choice.as_document,
    }
}

/// Re-validates `path` and sends it through the transport.
///
/// A failed check surfaces without sending anything; a transport failure
/// maps to [`FetchError::Transfer`].
pub async fn deliver_artifact(
    transport: &dyn ChatTransport,
    chat: &ChatId,
    path: &Path,
    title: &str,
    choice: Choice,
    quote: Option<&MessageId>,
) -> FetchResult<()> {
    validation::validate_for_delivery(path, choice.format)?;

    let payload = payload_for(path, title, choice);
    log::info!("📤 Delivering {} ({})", payload.file_name, choice.describe());
    transport
        .send_media(chat, payload, quote)
        .await
        .map_err(|e| FetchError::Transfer(format!("send failed: {e}")))
}
