//! Preview caption building.
//!
//! Renders the search hit into the card text sent back to the chat,
//! including the choice legend the broker understands.

use crate::download::search::SearchHit;

/// Caption for the preview card: result fields plus the choice legend.
pub fn build_caption(hit: &SearchHit) -> String {
    format!(
        "┏━[ *Media Fetch 🎧* ]━┓\n\
         ┃🎵 Title: {title}\n\
         ┃⏱️ Duration: {duration}\n\
         ┃👁️ Views: {views}\n\
         ┃👤 Author: {author}\n\
         ┗━━━━━━━━━━━━━━━━━━┛\n\
         \n\
         📥 React:\n\
         👍 Audio MP3\n\
         ❤️ Video MP4\n\
         📄 Audio document\n\
         📁 Video document\n\
         \n\
         Or reply: 1 audio, 2 video, 3 videodoc, 4 audiodoc",
        title = hit.title,
        duration = hit.duration_label,
        views = format_count(hit.views),
        author = hit.author,
    )
}

/// Reply sent when the command arrives without a query.
pub fn usage_text() -> &'static str {
    "✳️ Usage:\nplay <search terms>\nExample: play bad bunny"
}

/// Thousands-separated rendering, e.g. 1234567 becomes "1,234,567".
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
