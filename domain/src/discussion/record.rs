//! What a discussion leaves behind.
//!
//! A [`DiscussionRecord`] is assembled while the discussion runs and closed
//! with [`DiscussionRecord::finish`]. It serializes to JSON for export and
//! feeds [`DiscussionStats`](super::stats::DiscussionStats).

use crate::config::{ActiveRole, RoleId};
use crate::discussion::mode::DiscussionSettings;
use crate::discussion::state::ImageAttachment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const RECORD_FORMAT_VERSION: &str = "1.0";

/// Why a message exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessagePurpose {
    UserInput,
    SystemNotification,
    RoleDiscussion,
    FinalResponse,
}

/// Metadata of an attached image (the payload itself is not recorded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMeta {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: usize,
}

impl From<&ImageAttachment> for ImageMeta {
    fn from(image: &ImageAttachment) -> Self {
        Self {
            name: image.name.clone(),
            mime_type: image.mime_type.clone(),
            size_bytes: image.size_bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSummary {
    pub id: RoleId,
    pub name: String,
    pub model_name: String,
    pub channel_name: String,
}

impl From<&ActiveRole> for RoleSummary {
    fn from(role: &ActiveRole) -> Self {
        Self {
            id: role.id().clone(),
            name: role.name().to_string(),
            model_name: role.model.name.clone(),
            channel_name: role.channel.name.clone(),
        }
    }
}

/// One completed role reply. `message` is the parsed spoken text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub role_id: RoleId,
    pub role: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub purpose: MessagePurpose,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotepadUpdate {
    pub updater_id: RoleId,
    pub updater: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalAnswer {
    pub provider_id: RoleId,
    pub provider: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub version: String,
    pub message_count: usize,
    pub notepad_update_count: usize,
}

/// Full account of one discussion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussionRecord {
    pub started_at: DateTime<Utc>,
    pub user_query: String,
    pub user_image: Option<ImageMeta>,
    pub settings: DiscussionSettings,
    pub active_roles: Vec<RoleSummary>,
    pub turns: Vec<TurnRecord>,
    pub notepad_updates: Vec<NotepadUpdate>,
    pub final_answer: Option<FinalAnswer>,
    /// Notepad content when the discussion ended
    pub final_notepad: String,
    pub total_duration_ms: u64,
    pub is_completed: bool,
    pub was_interrupted: bool,
    pub interrupted_at: Option<DateTime<Utc>>,
    pub metadata: RecordMetadata,
}

impl DiscussionRecord {
    pub fn begin(
        user_query: impl Into<String>,
        image: Option<&ImageAttachment>,
        settings: DiscussionSettings,
        roles: &[ActiveRole],
        notepad: impl Into<String>,
    ) -> Self {
        Self {
            started_at: Utc::now(),
            user_query: user_query.into(),
            user_image: image.map(ImageMeta::from),
            settings,
            active_roles: roles.iter().map(RoleSummary::from).collect(),
            turns: Vec::new(),
            notepad_updates: Vec::new(),
            final_answer: None,
            final_notepad: notepad.into(),
            total_duration_ms: 0,
            is_completed: false,
            was_interrupted: false,
            interrupted_at: None,
            metadata: RecordMetadata {
                version: RECORD_FORMAT_VERSION.to_string(),
                message_count: 0,
                notepad_update_count: 0,
            },
        }
    }

    pub fn push_turn(&mut self, role: &ActiveRole, message: impl Into<String>, duration_ms: u64) {
        self.turns.push(TurnRecord {
            role_id: role.id().clone(),
            role: role.name().to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            duration_ms,
            purpose: MessagePurpose::RoleDiscussion,
        });
    }

    pub fn push_notepad_update(&mut self, role: &ActiveRole, content: impl Into<String>) {
        let content = content.into();
        self.final_notepad = content.clone();
        self.notepad_updates.push(NotepadUpdate {
            updater_id: role.id().clone(),
            updater: role.name().to_string(),
            content,
            timestamp: Utc::now(),
        });
    }

    /// Record the synthesized answer; it is also kept as the last turn.
    pub fn set_final_answer(&mut self, role: &ActiveRole, content: impl Into<String>, duration_ms: u64) {
        let content = content.into();
        let timestamp = Utc::now();
        self.turns.push(TurnRecord {
            role_id: role.id().clone(),
            role: role.name().to_string(),
            message: content.clone(),
            timestamp,
            duration_ms,
            purpose: MessagePurpose::FinalResponse,
        });
        self.final_answer = Some(FinalAnswer {
            provider_id: role.id().clone(),
            provider: role.name().to_string(),
            content,
            timestamp,
            duration_ms,
        });
    }

    /// Close the record. `completed` is true only when synthesis succeeded.
    pub fn finish(&mut self, completed: bool, interrupted: bool, total_duration_ms: u64) {
        self.is_completed = completed;
        self.was_interrupted = interrupted;
        if interrupted {
            self.interrupted_at = Some(Utc::now());
        }
        self.total_duration_ms = total_duration_ms;
        // user message + every recorded reply
        self.metadata.message_count = 1 + self.turns.len();
        self.metadata.notepad_update_count = self.notepad_updates.len();
    }

    /// Replies that belong to the discussion itself (excludes the final answer).
    pub fn discussion_turns(&self) -> impl Iterator<Item = &TurnRecord> {
        self.turns
            .iter()
            .filter(|t| t.purpose == MessagePurpose::RoleDiscussion)
    }
}
