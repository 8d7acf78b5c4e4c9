/*
[INPUT]:  Sync failures and confirmations raised by the coordinator
[OUTPUT]: A bounded queue of dismissible, human-readable notices
[POS]:    Engine support - user-facing feedback
[UPDATE]: When notices gain new levels or actions
*/

use std::collections::VecDeque;

const MAX_NOTICES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

/// Oldest first. When full, the oldest notice is dropped.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    next_id: u64,
    notices: VecDeque<Notice>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Info, message.into())
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Error, message.into())
    }

    fn push(&mut self, level: NoticeLevel, message: String) -> u64 {
        self.next_id += 1;
        if self.notices.len() == MAX_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice {
            id: self.next_id,
            level,
            message,
        });
        self.next_id
    }

    /// Most recent notice, the one a status bar shows.
    pub fn latest(&self) -> Option<&Notice> {
        self.notices.back()
    }

    /// Dismiss the most recent notice.
    pub fn dismiss_latest(&mut self) -> Option<Notice> {
        self.notices.pop_back()
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|notice| notice.id != id);
        self.notices.len() != before
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .filter(|notice| notice.level == NoticeLevel::Error)
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismissal_by_latest_and_id() {
        let mut queue = NoticeQueue::new();
        let first = queue.error("first");
        queue.info("second");

        assert_eq!(queue.latest().map(|n| n.message.as_str()), Some("second"));
        assert_eq!(queue.dismiss_latest().map(|n| n.level), Some(NoticeLevel::Info));
        assert!(queue.dismiss(first));
        assert!(!queue.dismiss(first));
        assert!(queue.is_empty());
    }

    #[test]
    fn queue_is_bounded() {
        let mut queue = NoticeQueue::new();
        for index in 0..(MAX_NOTICES + 5) {
            queue.error(format!("n{index}"));
        }
        assert_eq!(queue.len(), MAX_NOTICES);
        assert_eq!(queue.iter().next().map(|n| n.message.as_str()), Some("n5"));
    }
}
