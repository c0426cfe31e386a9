use url::form_urlencoded;

/// An ordered view of a URI query string.
///
/// Pairs keep their original order. `set` rewrites the first occurrence
/// of a key in place and drops any later duplicates, `remove` drops all
/// occurrences, so repeated edits keep the encoded string canonical.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Parse a search string. A leading `?` is accepted and ignored.
    pub fn parse(search: &str) -> Self {
        let raw = search.strip_prefix('?').unwrap_or(search);
        Self {
            pairs: form_urlencoded::parse(raw.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// The raw value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key` to `value`, keeping the position of an existing entry.
    pub fn set(&mut self, key: &str, value: &str) {
        let mut seen = false;
        self.pairs.retain_mut(|(k, v)| {
            if k.as_str() != key {
                return true;
            }
            if seen {
                return false;
            }
            seen = true;
            *v = value.to_string();
            true
        });
        if !seen {
            self.pairs.push((key.to_string(), value.to_string()));
        }
    }

    /// Remove every occurrence of `key`.
    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Encode back to `application/x-www-form-urlencoded` form, without
    /// a leading `?`. An empty query encodes as the empty string.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_get() {
        let q = Query::parse("?xP=6&base=10");
        assert_eq!(q.get("xP"), Some("6"));
        assert_eq!(q.get("base"), Some("10"));
        assert_eq!(q.get("yP"), None);
    }

    #[test]
    fn set_keeps_position() {
        let mut q = Query::parse("a=1&b=2&c=3");
        q.set("b", "20");
        assert_eq!(q.encode(), "a=1&b=20&c=3");
    }

    #[test]
    fn set_appends_new_key() {
        let mut q = Query::parse("a=1");
        q.set("b", "2");
        assert_eq!(q.encode(), "a=1&b=2");
    }

    #[test]
    fn set_collapses_duplicates() {
        let mut q = Query::parse("a=1&b=2&a=3");
        q.set("a", "9");
        assert_eq!(q.encode(), "a=9&b=2");
    }

    #[test]
    fn remove_drops_all_occurrences() {
        let mut q = Query::parse("a=1&b=2&a=3");
        q.remove("a");
        assert_eq!(q.encode(), "b=2");
        assert!(!q.is_empty());
        q.remove("b");
        assert!(q.is_empty());
        assert_eq!(q.encode(), "");
    }

    #[test]
    fn percent_encoding_round_trip() {
        let mut q = Query::default();
        q.set("visible", "0.1_2.3");
        q.set("note", "a b&c");
        let encoded = q.encode();
        let parsed = Query::parse(&encoded);
        assert_eq!(parsed.get("visible"), Some("0.1_2.3"));
        assert_eq!(parsed.get("note"), Some("a b&c"));
    }

    #[test]
    fn empty_value_survives() {
        let q = Query::parse("flag=");
        assert_eq!(q.get("flag"), Some(""));
    }
}
