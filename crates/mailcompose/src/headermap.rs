//! Ordered, case-insensitive header storage.
//!
//! Unlike a parser's header map, every value here is always caller
//! supplied text rather than bytes sliced out of a wire message, so there
//! is no need for zero-copy `SharedString` machinery here.

/// One named header slot: the display-case name plus the ordered list of
/// raw (not yet RFC 2047 encoded) values assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSlot {
    name: String,
    values: Vec<String>,
}

impl HeaderSlot {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// An ordered sequence of header slots, looked up case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    slots: Vec<HeaderSlot>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.name.eq_ignore_ascii_case(name))
    }

    /// Replaces all prior values under `name`.
    pub fn set(&mut self, name: &str, values: Vec<String>) {
        match self.position(name) {
            Some(idx) => {
                self.slots[idx].name = name.to_string();
                self.slots[idx].values = values;
            }
            None => self.slots.push(HeaderSlot {
                name: name.to_string(),
                values,
            }),
        }
    }

    /// Appends a value under `name`, preserving any existing ones.
    pub fn add(&mut self, name: &str, value: String) {
        match self.position(name) {
            Some(idx) => self.slots[idx].values.push(value),
            None => self.set(name, vec![value]),
        }
    }

    /// Returns the raw (unjoined) values stored under `name`.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|idx| self.slots[idx].values())
    }

    /// Removes the header entirely, returning its prior values if present.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.position(name).map(|idx| self.slots.remove(idx).values)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterates slots in insertion order (used for rendering in §4.4's
    /// "unspecified but stable" order).
    pub fn iter(&self) -> impl Iterator<Item = &HeaderSlot> {
        self.slots.iter()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn set_replaces_all_prior_values() {
        let mut h = HeaderMap::new();
        h.set("To", vec!["a@example.com".into()]);
        h.add("To", "b@example.com".into());
        assert_eq!(h.get("to").unwrap().len(), 2);
        h.set("To", vec!["c@example.com".into()]);
        assert_eq!(h.get("TO").unwrap(), &["c@example.com".to_string()]);
    }

    #[test]
    fn case_insensitive_lookup_preserves_display_case() {
        let mut h = HeaderMap::new();
        h.set("Content-Type", vec!["text/plain".into()]);
        assert!(h.contains("content-type"));
        assert_eq!(h.iter().next().unwrap().name(), "Content-Type");
    }

    #[test]
    fn remove_returns_prior_values() {
        let mut h = HeaderMap::new();
        h.set("Bcc", vec!["x@example.com".into(), "y@example.com".into()]);
        let removed = h.remove("bcc").unwrap();
        assert_eq!(removed.len(), 2);
        assert!(!h.contains("Bcc"));
    }
}
