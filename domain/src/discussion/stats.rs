//! Summary statistics for a finished discussion.

use crate::discussion::record::DiscussionRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleParticipation {
    /// Display name of the role
    pub role: String,
    pub turn_count: usize,
    pub total_response_time_ms: u64,
    pub average_response_time_ms: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscussionStats {
    /// Replies counted, including the final answer
    pub total_turns: usize,
    pub average_response_time_ms: f64,
    pub longest_response_time_ms: u64,
    pub shortest_response_time_ms: u64,
    /// Keyed by role id
    pub role_participation: BTreeMap<String, RoleParticipation>,
    /// Notepad updates per reply
    pub notepad_update_frequency: f64,
}

impl DiscussionStats {
    pub fn from_record(record: &DiscussionRecord) -> Self {
        let turns = &record.turns;
        if turns.is_empty() {
            return Self::default();
        }

        let durations: Vec<u64> = turns.iter().map(|t| t.duration_ms).collect();
        let total: u64 = durations.iter().sum();

        let mut role_participation: BTreeMap<String, RoleParticipation> = BTreeMap::new();
        for turn in turns {
            let entry = role_participation
                .entry(turn.role_id.as_str().to_string())
                .or_insert_with(|| RoleParticipation {
                    role: turn.role.clone(),
                    ..RoleParticipation::default()
                });
            entry.turn_count += 1;
            entry.total_response_time_ms += turn.duration_ms;
        }
        for entry in role_participation.values_mut() {
            entry.average_response_time_ms =
                entry.total_response_time_ms as f64 / entry.turn_count as f64;
        }

        Self {
            total_turns: turns.len(),
            average_response_time_ms: total as f64 / turns.len() as f64,
            longest_response_time_ms: durations.iter().copied().max().unwrap_or_default(),
            shortest_response_time_ms: durations.iter().copied().min().unwrap_or_default(),
            role_participation,
            notepad_update_frequency: record.notepad_updates.len() as f64 / turns.len() as f64,
        }
    }
}
