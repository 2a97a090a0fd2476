use serde::Serialize;

/// Body-level element a comment is attached to. Indices are 0-based over the
/// direct `w:p` / `w:tbl` children of `w:body`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Anchor {
    Paragraph(usize),
    Table(usize),
}

/// One review comment, fully rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
    pub id: u32,
    pub anchor: Anchor,
    pub location: String,
    pub problem: String,
    pub current_format: String,
    pub expected_format: String,
    pub suggestion: String,
}

impl CommentRecord {
    /// Comment body lines in display order. Empty fields are left out.
    pub fn body_lines(&self) -> Vec<String> {
        [
            ("Location", &self.location),
            ("Problem", &self.problem),
            ("Current", &self.current_format),
            ("Expected", &self.expected_format),
            ("Suggestion", &self.suggestion),
        ]
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect()
    }
}

/// Hands out comment ids for one annotation pass.
#[derive(Debug, Clone)]
pub struct CommentIdCounter {
    next: u32,
}

impl CommentIdCounter {
    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }

    /// Seeded past the highest id already used in the package.
    pub fn after_existing(existing: impl IntoIterator<Item = u32>) -> Self {
        let next = existing.into_iter().max().map_or(0, |max| max.saturating_add(1));
        Self { next }
    }

    pub fn peek(&self) -> u32 {
        self.next
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CommentRecord {
        CommentRecord {
            id: 0,
            anchor: Anchor::Paragraph(0),
            location: "Paragraph 1".into(),
            problem: "Alignment differs".into(),
            current_format: String::new(),
            expected_format: "alignment: center".into(),
            suggestion: " ".into(),
        }
    }

    #[test]
    fn empty_lines_are_skipped() {
        assert_eq!(
            record().body_lines(),
            vec![
                "Location: Paragraph 1",
                "Problem: Alignment differs",
                "Expected: alignment: center",
            ]
        );
    }

    #[test]
    fn counter_starts_after_existing_ids() {
        let mut counter = CommentIdCounter::after_existing([3, 0, 7]);
        assert_eq!(counter.next_id(), 8);
        assert_eq!(counter.next_id(), 9);
        assert_eq!(counter.peek(), 10);

        let mut fresh = CommentIdCounter::after_existing(std::iter::empty());
        assert_eq!(fresh.next_id(), 0);
    }
}
