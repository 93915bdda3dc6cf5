use super::Value;

/// An ordered sequence of keyed values, iterated in insertion order.
///
/// Arrays built from plain sequences are keyed by position (`"0"`, `"1"`,
/// ...). Arrays built from maps keep their keys, which `<for key="...">`
/// exposes to the loop body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Array {
    entries: Vec<(String, Value)>,
}

impl Array {
    /// Create a new empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an array from values, keyed by position.
    pub fn from_values<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), Into::<Value>::into(value)))
            .collect()
    }

    /// Append an entry.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Concatenate two arrays, keeping the entries of `self` first.
    ///
    /// Positional keys of the result are renumbered so that merging two
    /// plain sequences yields another plain sequence.
    pub fn merge(self, other: Array) -> Array {
        let renumber = self.is_positional() && other.is_positional();
        let combined = self.entries.into_iter().chain(other.entries);
        if renumber {
            combined
                .enumerate()
                .map(|(index, (_, value))| (index.to_string(), value))
                .collect()
        } else {
            combined.collect()
        }
    }

    fn is_positional(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(index, (key, _))| key.parse::<usize>().is_ok_and(|k| k == index))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Array {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
