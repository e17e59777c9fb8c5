//! Plain-text transcript export.

use crate::discussion::record::DiscussionRecord;
use crate::prompt::INITIAL_NOTEPAD_CONTENT;
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Render a record as the plain-text transcript users download.
///
/// System notifications are not part of the record, so every entry is
/// either the user's message or a role reply. The final notepad is
/// appended only when it differs from the initial notepad.
pub fn render_transcript(record: &DiscussionRecord, exported_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    let message_count = 1 + record.turns.len();

    let _ = writeln!(out, "=== Multi-Mind Chat Transcript ===");
    let _ = writeln!(out, "Exported at: {}", exported_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(out, "Messages: {}", message_count);
    out.push('\n');

    let _ = write!(
        out,
        "[{}] User: {}\n\n",
        record.started_at.format("%H:%M:%S"),
        record.user_query
    );
    if let Some(image) = &record.user_image {
        let _ = write!(out, "    [Attachment: {} - {}]\n\n", image.name, image.mime_type);
    }

    for turn in &record.turns {
        let duration = if turn.duration_ms > 0 {
            format!(" ({:.2}s)", turn.duration_ms as f64 / 1000.0)
        } else {
            String::new()
        };
        let _ = write!(
            out,
            "[{}] {}{}: {}\n\n",
            turn.timestamp.format("%H:%M:%S"),
            turn.role,
            duration,
            turn.message
        );
    }

    if record.final_notepad != INITIAL_NOTEPAD_CONTENT {
        let _ = writeln!(out, "=== Final Notepad ===");
        let _ = write!(out, "{}\n\n", record.final_notepad);
    }

    out
}
