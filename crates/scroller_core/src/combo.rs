//! Fuzzy-filter typeahead over a caller-supplied candidate list.
//!
//! The combo never decides whether a committed name is acceptable; it hands
//! the text back and leaves duplicate handling to whoever owns the list.

use std::iter;
use std::ops::Range;

use crate::names::{is_invisible_mark, normalize};

pub const NO_CANDIDATES_HINT: &str = "No participants found";

/// Supplies the current candidates each time the list is recomputed.
pub trait CandidateSource {
    fn candidates(&self) -> Vec<String>;
}

impl<F> CandidateSource for F
where
    F: Fn() -> Vec<String>,
{
    fn candidates(&self) -> Vec<String> {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboKey {
    Down,
    Up,
    Enter,
    Escape,
}

/// Input events a combo reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComboEvent {
    Focused,
    InputChanged(String),
    Key(ComboKey),
    /// Pointer-down on the item at this index of the filtered list.
    PointerSelect(usize),
    /// Input lost focus; the list closes after the grace delay.
    Blurred,
    /// Grace delay after a blur has elapsed.
    CloseElapsed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboItem {
    pub name: String,
    /// Byte range of the match inside `name`.
    pub highlight: Option<Range<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComboHint {
    NoCandidates,
    CommitLiteral(String),
}

impl ComboHint {
    pub fn text(&self) -> String {
        match self {
            ComboHint::NoCandidates => NO_CANDIDATES_HINT.to_string(),
            ComboHint::CommitLiteral(query) => format!("Press Enter to add \"{query}\""),
        }
    }
}

/// What a handled event asks of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComboOutcome {
    None,
    Commit(String),
    /// Start the blur grace delay.
    ScheduleClose,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComboState {
    query: String,
    items: Vec<ComboItem>,
    hint: Option<ComboHint>,
    active_index: Option<usize>,
    open: bool,
    focused: bool,
}

impl ComboState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn items(&self) -> &[ComboItem] {
        &self.items
    }

    pub fn hint(&self) -> Option<&ComboHint> {
        self.hint.as_ref()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn handle<S>(&mut self, event: ComboEvent, source: &S) -> ComboOutcome
    where
        S: CandidateSource + ?Sized,
    {
        match event {
            ComboEvent::Focused => {
                self.focused = true;
                self.refilter(source);
                ComboOutcome::None
            }
            ComboEvent::InputChanged(text) => {
                self.query = text;
                self.refilter(source);
                ComboOutcome::None
            }
            ComboEvent::Key(key) => self.key(key),
            ComboEvent::PointerSelect(index) => {
                if !self.open {
                    return ComboOutcome::None;
                }
                match self.items.get(index) {
                    Some(item) => {
                        let name = item.name.clone();
                        self.commit(name)
                    }
                    None => ComboOutcome::None,
                }
            }
            ComboEvent::Blurred => {
                self.focused = false;
                ComboOutcome::ScheduleClose
            }
            ComboEvent::CloseElapsed => {
                if !self.focused {
                    self.open = false;
                }
                ComboOutcome::None
            }
        }
    }

    /// Clears the query and closes the list without committing.
    pub fn reset(&mut self) {
        self.query.clear();
        self.open = false;
        self.active_index = None;
    }

    fn key(&mut self, key: ComboKey) -> ComboOutcome {
        match key {
            ComboKey::Down => {
                if let Some(last) = self.items.len().checked_sub(1) {
                    let next = self.active_index.map_or(0, |index| index + 1);
                    self.active_index = Some(next.min(last));
                }
                ComboOutcome::None
            }
            ComboKey::Up => {
                if !self.items.is_empty() {
                    let next = self.active_index.map_or(0, |index| index.saturating_sub(1));
                    self.active_index = Some(next);
                }
                ComboOutcome::None
            }
            ComboKey::Enter => {
                if let Some(item) = self.active_index.and_then(|index| self.items.get(index)) {
                    let name = item.name.clone();
                    return self.commit(name);
                }
                let literal = self.query.trim().to_string();
                if literal.is_empty() {
                    ComboOutcome::None
                } else {
                    self.commit(literal)
                }
            }
            ComboKey::Escape => {
                self.focused = false;
                ComboOutcome::ScheduleClose
            }
        }
    }

    fn commit(&mut self, name: String) -> ComboOutcome {
        self.reset();
        ComboOutcome::Commit(name)
    }

    fn refilter<S>(&mut self, source: &S)
    where
        S: CandidateSource + ?Sized,
    {
        let trimmed = self.query.trim();
        let needle = normalize(trimmed);
        let candidates = source.candidates();

        self.items = if needle.is_empty() {
            candidates
                .into_iter()
                .map(|name| ComboItem {
                    name,
                    highlight: None,
                })
                .collect()
        } else {
            candidates
                .into_iter()
                .filter(|name| normalize(name).contains(&needle))
                .map(|name| {
                    let highlight = highlight_span(&name, trimmed);
                    ComboItem { name, highlight }
                })
                .collect()
        };

        self.hint = match (self.items.is_empty(), needle.is_empty()) {
            (true, true) => Some(ComboHint::NoCandidates),
            (true, false) => Some(ComboHint::CommitLiteral(trimmed.to_string())),
            _ => None,
        };
        self.active_index = None;
        self.open = true;
    }
}

/// Byte range in `name` covering the first match of `query`.
///
/// The match is found in the stripped, case-folded name and then walked back
/// onto the original string, skipping invisible marks on the way, so the
/// range is valid for slicing `name` regardless of how many marks it holds.
pub fn highlight_span(name: &str, query: &str) -> Option<Range<usize>> {
    let needle = normalize(query.trim());
    if needle.is_empty() {
        return None;
    }

    // Fold the whole string like `normalize` does so context-sensitive
    // mappings (final sigma) agree with the filter. Per-char folding yields
    // the same number of chars, which gives each folded char's owner.
    let folded = normalize(name);
    let owners: Vec<usize> = name
        .chars()
        .filter(|ch| !is_invisible_mark(*ch))
        .enumerate()
        .flat_map(|(ordinal, ch)| iter::repeat(ordinal).take(ch.to_lowercase().count()))
        .collect();

    let byte_index = folded.find(&needle)?;
    let first = folded[..byte_index].chars().count();
    let last = first + needle.chars().count() - 1;
    let start_ordinal = *owners.get(first)?;
    let end_ordinal = *owners.get(last)? + 1;

    let mut start = None;
    let mut end = name.len();
    let mut seen = 0;
    for (byte, ch) in name.char_indices() {
        if is_invisible_mark(ch) {
            continue;
        }
        if seen == start_ordinal {
            start = Some(byte);
        }
        seen += 1;
        if seen == end_ordinal {
            end = byte + ch.len_utf8();
            break;
        }
    }
    start.map(|start| start..end)
}
