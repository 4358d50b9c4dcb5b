//! Collections keyed by reference identity.
//!
//! Structural hashing does not terminate on cyclic values, so hydration keys
//! its bookkeeping by the arena address of arrays, objects and functions.

use crate::types::TypeKey;
use hashbrown::{HashMap, HashSet};

/// Address of a heap value. Two values share an id iff they are `===`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(usize);

impl ValueId {
    pub fn of<T: ?Sized>(target: &T) -> Self {
        Self(target as *const T as *const () as usize)
    }
}

/// Map from value identity to `V`.
#[derive(Debug)]
pub struct IdentityMap<V> {
    entries: HashMap<ValueId, V>,
}

impl<V> Default for IdentityMap<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> IdentityMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ValueId) -> Option<&V> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: ValueId) -> Option<&mut V> {
        self.entries.get_mut(&id)
    }

    pub fn entry_or_default(&mut self, id: ValueId) -> &mut V
    where
        V: Default,
    {
        self.entries.entry(id).or_default()
    }

    pub fn insert(&mut self, id: ValueId, value: V) -> Option<V> {
        self.entries.insert(id, value)
    }

    pub fn contains(&self, id: ValueId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Set of (value, type) pairs on the active stack of a hydration or a type
/// check.
#[derive(Debug, Default)]
pub struct IdentitySet {
    entries: HashSet<(ValueId, TypeKey)>,
}

impl IdentitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the pair was already present.
    pub fn insert(&mut self, id: ValueId, ty: TypeKey) -> bool {
        self.entries.insert((id, ty))
    }

    pub fn remove(&mut self, id: ValueId, ty: TypeKey) -> bool {
        self.entries.remove(&(id, ty))
    }

    pub fn contains(&self, id: ValueId, ty: TypeKey) -> bool {
        self.entries.contains(&(id, ty))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_not_structure() {
        let a = [1, 2];
        let b = [1, 2];
        let mut map = IdentityMap::new();
        map.insert(ValueId::of(&a), "a");
        assert_eq!(map.get(ValueId::of(&a)), Some(&"a"));
        assert_eq!(map.get(ValueId::of(&b)), None);
    }

    #[test]
    fn test_set_pairs() {
        let v = 1u8;
        let t1 = 2u8;
        let t2 = 3u8;
        let mut set = IdentitySet::new();
        assert!(set.insert(ValueId::of(&v), TypeKey::of(&t1)));
        assert!(!set.insert(ValueId::of(&v), TypeKey::of(&t1)));
        assert!(set.insert(ValueId::of(&v), TypeKey::of(&t2)));
        assert!(set.remove(ValueId::of(&v), TypeKey::of(&t1)));
        assert!(!set.contains(ValueId::of(&v), TypeKey::of(&t1)));
        assert_eq!(set.len(), 1);
    }
}
