//! Stack-valued multimap modelling name shadowing.

use std::{borrow::Borrow, fmt, hash::Hash, sync::Arc};

use indexmap::IndexMap;

/// A multimap from key to a stack of values.
///
/// [`put`](Self::put) pushes a value for a key and [`get`](Self::get) sees
/// the most recent one, so an inner scope shadows an outer binding until the
/// inner scope removes it again. Removal must mirror insertion order: only the
/// value on top of a key's stack may be removed.
///
/// Keys iterate in first-insertion order.
pub struct PriorityMap<K, V> {
    entries: IndexMap<K, Vec<V>>,
}

impl<K, V> PriorityMap<K, V>
where
    K: Hash + Eq,
{
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Push `value` on top of `key`'s stack.
    pub fn put(&mut self, key: K, value: V) {
        self.entries.entry(key).or_default().push(value);
    }

    /// The visible value for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).and_then(|stack| stack.last())
    }

    /// Whether `key` has a visible value.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Number of values stacked under `key`.
    pub fn depth<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).map_or(0, Vec::len)
    }

    /// Number of keys with a visible value.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|stack| !stack.is_empty()).count()
    }

    /// Whether no key has a visible value.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visible bindings in first-insertion order of their keys.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries
            .iter()
            .filter_map(|(key, stack)| stack.last().map(|value| (key, value)))
    }
}

impl<K, V> PriorityMap<K, V>
where
    K: Hash + Eq + fmt::Debug,
    V: PartialEq + fmt::Debug,
{
    /// Pop `value` from `key`'s stack and return it.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not the visible value for `key`. Callers must
    /// remove bindings in the reverse order they were put, matching scope
    /// exit order.
    pub fn remove<Q>(&mut self, key: &Q, value: &V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let Some(stack) = self.entries.get_mut(key) else {
            panic!("priority map has no binding for {key:?}");
        };
        match stack.pop() {
            Some(top) if top == *value => top,
            Some(top) => panic!(
                "priority map removal out of order for {key:?}: expected {top:?}, got {value:?}"
            ),
            None => panic!("priority map has no binding for {key:?}"),
        }
    }
}

impl<K, V> PriorityMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Snapshot the visible bindings into an immutable, shareable map.
    pub fn freeze(&self) -> FrozenPriorityMap<K, V> {
        let visible = self
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        FrozenPriorityMap {
            entries: Arc::new(visible),
        }
    }
}

impl<K: Hash + Eq, V> Default for PriorityMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PriorityMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

/// An immutable snapshot of a [`PriorityMap`]'s visible bindings.
///
/// Clones share the same storage.
#[derive(Clone)]
pub struct FrozenPriorityMap<K, V> {
    entries: Arc<IndexMap<K, V>>,
}

impl<K: Hash + Eq, V> FrozenPriorityMap<K, V> {
    /// The value bound to `key` when the snapshot was taken.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for FrozenPriorityMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}
