//! Navigable history of submitted command texts
//!
//! The cursor sits either on one of the stored entries or one step past the
//! newest ("at present"), where the unsubmitted draft lives. Moving the
//! cursor never changes the stored entries; only [`InputHistory::submit`]
//! does.

#[derive(Debug, Clone, Default)]
pub struct InputHistory {
    entries: Vec<String>,
    /// `entries.len()` means at present
    cursor: usize,
    draft: String,
    limit: Option<usize>,
}

impl InputHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history that keeps at most `limit` entries
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::default()
        }
    }

    /// Creates a history from previously submitted entries, oldest first
    pub fn from_entries(entries: impl IntoIterator<Item = String>, limit: Option<usize>) -> Self {
        let mut history = Self {
            limit: limit.map(|l| l.max(1)),
            ..Self::default()
        };
        history.entries = entries.into_iter().collect();
        history.trim_to_limit();
        history.cursor = history.entries.len();
        history
    }

    /// Stores the in-progress text shown when navigating back to the present
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Steps back one entry and returns it
    ///
    /// Stays on the oldest entry once reached. Returns `None` only when
    /// nothing has been submitted yet.
    pub fn previous(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        Some(&self.entries[self.cursor])
    }

    /// Steps forward one entry and returns it
    ///
    /// Stepping past the newest entry, or calling this while already at
    /// present, yields the draft.
    pub fn next(&mut self) -> &str {
        if self.cursor < self.entries.len() {
            self.cursor += 1;
        }
        if self.is_at_present() {
            &self.draft
        } else {
            &self.entries[self.cursor]
        }
    }

    /// Appends a new newest entry, clears the draft and returns to present
    pub fn submit(&mut self, text: impl Into<String>) {
        self.entries.push(text.into());
        self.trim_to_limit();
        self.draft.clear();
        self.cursor = self.entries.len();
    }

    /// Text under the cursor
    pub fn current(&self) -> &str {
        self.entries
            .get(self.cursor)
            .map(String::as_str)
            .unwrap_or(self.draft.as_str())
    }

    pub fn is_at_present(&self) -> bool {
        self.cursor == self.entries.len()
    }

    /// Stored entries, oldest first
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn trim_to_limit(&mut self) {
        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
            }
        }
    }
}
