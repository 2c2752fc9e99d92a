//! Conversation log: most-recent-first question/answer turns.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::TurnSource;

static LAST_TURN_ID: AtomicU64 = AtomicU64::new(0);

/// Millisecond timestamp, bumped past the previous id if the clock hasn't moved.
fn next_turn_id(now: DateTime<Utc>) -> u64 {
    let candidate = now.timestamp_millis().max(0) as u64;
    let prev = LAST_TURN_ID
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
            Some(candidate.max(prev + 1))
        })
        .unwrap_or_else(|prev| prev);
    candidate.max(prev + 1)
}

/// One answered question. Never edited once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: u64,
    pub question: String,
    pub answer: String,
    /// Snippet of the context the backend actually used.
    pub context_used: String,
    pub asked_at: DateTime<Utc>,
    pub source: TurnSource,
}

impl ConversationTurn {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        context_used: impl Into<String>,
        source: TurnSource,
    ) -> Self {
        let asked_at = Utc::now();
        Self {
            id: next_turn_id(asked_at),
            question: question.into(),
            answer: answer.into(),
            context_used: context_used.into(),
            asked_at,
            source,
        }
    }

    /// Local wall-clock time of the turn, for display.
    pub fn timestamp(&self) -> String {
        self.asked_at.with_timezone(&Local).format("%H:%M:%S").to_string()
    }
}

/// Append-only (prepend) log. Unbounded unless built with a cap.
#[derive(Debug, Default)]
pub struct ConversationLog {
    turns: VecDeque<ConversationTurn>,
    cap: Option<usize>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `cap` turns (minimum one); the oldest are dropped first.
    pub fn with_capacity_limit(cap: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            cap: Some(cap.max(1)),
        }
    }

    /// Prepend a turn and return it.
    pub fn record(&mut self, turn: ConversationTurn) -> &ConversationTurn {
        debug!(turn_id = turn.id, source = %turn.source, "Turn recorded");
        self.turns.push_front(turn);
        if let Some(cap) = self.cap {
            self.turns.truncate(cap);
        }
        &self.turns[0]
    }

    pub fn clear(&mut self) {
        info!(count = self.turns.len(), "Conversation log cleared");
        self.turns.clear();
    }

    /// Most recent turn.
    pub fn latest(&self) -> Option<&ConversationTurn> {
        self.turns.front()
    }

    /// Turns, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(q: &str) -> ConversationTurn {
        ConversationTurn::new(q, format!("a:{q}"), "ctx", TurnSource::Text)
    }

    #[test]
    fn most_recent_first() {
        let mut log = ConversationLog::new();
        for q in ["one", "two", "three"] {
            log.record(turn(q));
        }
        assert_eq!(log.len(), 3);
        let order: Vec<_> = log.iter().map(|t| t.question.as_str()).collect();
        assert_eq!(order, vec!["three", "two", "one"]);
        assert_eq!(log.latest().unwrap().question, "three");
    }

    #[test]
    fn ids_strictly_increase() {
        let turns: Vec<_> = (0..50).map(|i| turn(&i.to_string())).collect();
        assert!(turns.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn clear_empties() {
        let mut log = ConversationLog::new();
        log.record(turn("q"));
        log.clear();
        assert!(log.is_empty());
        assert!(log.latest().is_none());
    }

    #[test]
    fn zero_cap_still_keeps_latest() {
        let mut log = ConversationLog::with_capacity_limit(0);
        assert_eq!(log.record(turn("only")).question, "only");
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn cap_drops_oldest() {
        let mut log = ConversationLog::with_capacity_limit(2);
        for q in ["one", "two", "three"] {
            log.record(turn(q));
        }
        let order: Vec<_> = log.iter().map(|t| t.question.as_str()).collect();
        assert_eq!(order, vec!["three", "two"]);
    }
}
