/// Places offered while typing. Order here is the order shown.
pub const SUGGESTIONS: &[&str] = &[
    "London",
    "New York",
    "Tokyo",
    "Paris",
    "Sydney",
    "Berlin",
    "Mumbai",
    "Dubai",
    "Singapore",
    "Toronto",
    "Los Angeles",
    "Chicago",
];

/// Case-insensitive substring match against [`SUGGESTIONS`].
pub fn filter_suggestions(text: &str) -> Vec<&'static str> {
    let needle = text.trim().to_lowercase();
    SUGGESTIONS.iter().copied().filter(|s| s.to_lowercase().contains(&needle)).collect()
}

/// The search box plus the location the current and historical views read from.
#[derive(Debug, Clone)]
pub struct LocationSearch {
    text: String,
    committed: String,
    suggestions: Vec<&'static str>,
}

impl LocationSearch {
    pub fn new(initial: &str) -> Self {
        let initial = initial.trim().to_string();
        Self {
            suggestions: filter_suggestions(&initial),
            text: initial.clone(),
            committed: initial,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn suggestions(&self) -> &[&'static str] {
        &self.suggestions
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.suggestions = filter_suggestions(&self.text);
    }

    /// Returns `true` if the committed location changed.
    pub fn commit(&mut self, text: &str) -> bool {
        let text = text.trim();
        self.set_text(text);

        if self.committed == text {
            return false;
        }
        self.committed = text.to_string();
        true
    }
}

impl Default for LocationSearch {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_LOCATION)
    }
}
