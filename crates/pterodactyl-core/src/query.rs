//! Convenience builder for HTTP query parameters.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Append one `key=value` pair per element, for array parameters like `ids[]`.
    pub fn push_each<T>(&mut self, key: &'static str, values: &[T])
    where
        T: Display,
    {
        for value in values {
            self.push(key, value);
        }
    }

    /// Replace any existing value for `key`.
    pub fn set<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.retain(|(existing, _)| *existing != key);
        self.push(key, value);
    }

    /// Borrow the collected pairs.
    #[must_use]
    pub fn as_pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl From<&[(&'static str, String)]> for QueryParams {
    fn from(pairs: &[(&'static str, String)]) -> Self {
        Self {
            pairs: pairs.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::QueryParams;

    #[test]
    fn push_each_repeats_key() {
        let mut params = QueryParams::new();
        params.push_each("location_ids[]", &[1, 4]);
        params.push_each::<u32>("empty[]", &[]);
        assert_eq!(
            params.into_pairs(),
            vec![
                ("location_ids[]", "1".to_string()),
                ("location_ids[]", "4".to_string())
            ]
        );
    }

    #[test]
    fn set_replaces_existing_key() {
        let mut params = QueryParams::new();
        params.push("page", 1);
        params.push("include", "variables");
        params.set("page", 3);
        assert_eq!(
            params.as_pairs(),
            &[("include", "variables".to_string()), ("page", "3".to_string())]
        );
    }
}
