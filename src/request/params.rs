use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

/// Maximum number of parameters stored inline before spilling to the heap.
/// Most route templates capture ≤4 values (e.g. `/users/{id}/posts/{post_id}`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Inline storage for name/value pairs.
///
/// Names use `Arc<str>` because they come from route templates known at
/// configuration time; values are per-request strings.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Insertion-ordered mapping of parameter name to string value.
///
/// Order is the capture order of the path template when produced by the
/// matcher, and the caller's order when built by hand. Inserting an existing
/// name replaces its value in place and keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    inner: ParamVec,
}

impl Parameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert accepting anything printable, so `with("id", 42)` works.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Display) -> Self {
        self.insert(name, value.to_string());
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.inner.iter_mut().find(|(k, _)| k.as_ref() == name) {
            slot.1 = value;
        } else {
            self.inner.push((Arc::from(name), value));
        }
    }

    /// Insert reusing an already shared name.
    pub(crate) fn insert_shared(&mut self, name: &Arc<str>, value: String) {
        if let Some(slot) = self.inner.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value;
        } else {
            self.inner.push((Arc::clone(name), value));
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(|(k, _)| k.as_ref())
    }

    /// Convert to a `HashMap`. Allocates; prefer [`Parameters::get`] on hot paths.
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        self.inner
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (k, v) in iter {
            params.insert(k.as_ref(), v);
        }
        params
    }
}

impl<K: AsRef<str>, V: Into<String>, const N: usize> From<[(K, V); N]> for Parameters {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
