use crate::error::{Result, SearchError};

/// Host-defined filter fragments ANDed onto every results query.
///
/// Fragments are trusted SQL written by the host (tenant scoping and the
/// like); clients can neither see nor change them.
#[derive(Debug, Clone, Default)]
pub struct ConditionSet {
    fragments: Vec<String>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, fragment: impl Into<String>) -> Result<()> {
        let fragment = fragment.into();
        if fragment.trim().is_empty() {
            return Err(SearchError::Config("Condition fragment is empty".into()));
        }
        self.fragments.push(fragment);
        Ok(())
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// `AND (f1) AND (f2) ...`, or an empty string when there is nothing to add
    pub fn render(&self) -> String {
        self.fragments
            .iter()
            .map(|f| format!("AND ({})", f))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
