use chrono::Local;

/// Characters of the query shown in a collapsed history label.
pub const LABEL_CHARS: usize = 30;

/// One completed query with both of its answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub query: String,
    pub casual: String,
    pub formal: String,
    pub time: String,
}

impl HistoryEntry {
    pub fn new(query: &str, casual: &str, formal: &str) -> Self {
        Self {
            query: query.to_string(),
            casual: casual.to_string(),
            formal: formal.to_string(),
            time: Local::now().format("%H:%M:%S").to_string(),
        }
    }

    pub fn label(&self) -> String {
        let head: String = self.query.chars().take(LABEL_CHARS).collect();
        format!("{}...", head)
    }
}

/// Session history, newest entry first.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// 1-based, matching the numbers shown in the panel.
    pub fn get(&self, number: usize) -> Option<&HistoryEntry> {
        number.checked_sub(1).and_then(|idx| self.entries.get(idx))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
