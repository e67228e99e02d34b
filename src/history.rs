use std::sync::mpsc::{channel, Receiver, Sender};

use chrono::Local;

use crate::calculator::{format_number, Calculation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub time: String,
    pub expression: String,
    pub result: String,
}

impl HistoryEntry {
    pub fn from_calculation(time: String, calculation: &Calculation) -> Self {
        Self { time, expression: calculation.expression(), result: format_number(calculation.result) }
    }
}

/// Append-only record of every calculation in this session. Views subscribe
/// to hear about new rows.
#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    subscribers: Vec<Sender<HistoryEntry>>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn subscribe(&mut self) -> Receiver<HistoryEntry> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Record a calculation stamped with the local wall-clock time.
    pub fn record(&mut self, calculation: &Calculation) -> &HistoryEntry {
        let time = Local::now().format("%H:%M:%S").to_string();
        self.append(HistoryEntry::from_calculation(time, calculation))
    }

    pub fn append(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        // Dropped receivers are pruned on send
        self.subscribers.retain(|tx| tx.send(entry.clone()).is_ok());
        log::debug!("history: {} = {}", entry.expression, entry.result);
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }
}

/// Scroll state of the history table; follows the newest row after each append.
#[derive(Debug)]
pub struct HistoryView {
    updates: Receiver<HistoryEntry>,
    selected: Option<usize>,
    unseen: usize,
}

impl HistoryView {
    pub fn new(log: &mut HistoryLog) -> Self {
        let selected = log.len().checked_sub(1);
        Self { updates: log.subscribe(), selected, unseen: 0 }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Rows appended since the view was last shown.
    pub fn unseen(&self) -> usize {
        self.unseen
    }

    /// Drain notifications and jump to the last row if anything arrived.
    pub fn refresh(&mut self, log: &HistoryLog) {
        let arrived = self.updates.try_iter().count();
        if arrived > 0 {
            self.unseen += arrived;
            self.selected = log.len().checked_sub(1);
        }
    }

    pub fn mark_seen(&mut self) {
        self.unseen = 0;
    }

    pub fn scroll_up(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some(i.saturating_sub(1));
        }
    }

    pub fn scroll_down(&mut self, log: &HistoryLog) {
        if let Some(i) = self.selected {
            self.selected = Some((i + 1).min(log.len().saturating_sub(1)));
        }
    }
}
