//! Sender name normalization and fuzzy list membership.
//!
//! The host inserts zero-width and bidirectional control characters into
//! mixed-script display names. They are invisible on screen but break both
//! equality and substring checks, so every comparison goes through
//! [`normalize`].

/// True for the zero-width and bidi-control characters the host embeds in names.
pub fn is_invisible_mark(ch: char) -> bool {
    matches!(ch,
        '\u{200B}'..='\u{200F}'
        | '\u{202A}'..='\u{202E}'
        | '\u{2060}'
        | '\u{2066}'..='\u{2069}'
        | '\u{FEFF}'
    )
}

pub fn strip_invisible(text: &str) -> String {
    text.chars().filter(|ch| !is_invisible_mark(*ch)).collect()
}

/// Strip invisible marks, then case-fold.
pub fn normalize(name: &str) -> String {
    strip_invisible(name).to_lowercase()
}

/// Fuzzy containment: equal, contains, or contained-by for any entry.
///
/// Short entries match generously ("Al" matches "Alice" and "Aladdin").
pub fn matches_any<S: AsRef<str>>(sender: &str, list: &[S]) -> bool {
    let sender = normalize(sender);
    if sender.is_empty() {
        return false;
    }
    list.iter().any(|entry| {
        let entry = normalize(entry.as_ref());
        if entry.is_empty() {
            return false;
        }
        sender == entry || sender.contains(&entry) || entry.contains(&sender)
    })
}

/// User-curated ordered list of names with no exact duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameList {
    names: Vec<String>,
}

impl NameList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from stored values, dropping blanks and repeated entries.
    pub fn from_stored<I>(names: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut list = Self::new();
        for name in names {
            list.insert(&name);
        }
        list
    }

    /// Appends a trimmed name. Returns false for empty or duplicate names.
    pub fn insert(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|entry| entry != name);
        self.names.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|entry| entry == name)
    }

    pub fn matches(&self, sender: &str) -> bool {
        matches_any(sender, &self.names)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.names.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sender_never_matches() {
        assert!(!matches_any("", &["alice"]));
        assert!(!matches_any("\u{200E}", &["alice"]));
    }

    #[test]
    fn name_list_rejects_blank_and_duplicates() {
        let mut list = NameList::new();
        assert!(list.insert("  Alice "));
        assert!(!list.insert("Alice"));
        assert!(!list.insert("   "));
        assert_eq!(list.as_slice(), ["Alice".to_string()]);
    }

    #[test]
    fn from_stored_dedupes_in_order() {
        let list = NameList::from_stored(vec![
            "Bob".to_string(),
            "Alice".to_string(),
            "Bob".to_string(),
        ]);
        assert_eq!(list.to_vec(), vec!["Bob".to_string(), "Alice".to_string()]);
    }
}
