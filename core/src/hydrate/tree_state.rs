//! Per-call bookkeeping for cycle-safe hydration.
//!
//! A [`TreeState`] lives for exactly one top-level type call. For every
//! (value, type) pair it records the result container as soon as it is
//! allocated, so a cyclic re-entry finds the container instead of recursing.

use crate::{
    types::TypeKey,
    values::{IdentityMap, IdentitySet, Value, ValueId},
};
use smallvec::SmallVec;

/// Progress of one type over one value.
#[derive(Debug, Clone, Copy)]
pub struct Slot<'a> {
    pub result: Value<'a>,
    /// Cleared when a cycle re-enters the pair before it resolves.
    pub idempotent: bool,
    pub resolved: bool,
    /// Index of the next element to fill.
    pub cursor: usize,
}

#[derive(Debug, Default)]
struct ValueState<'a> {
    slots: SmallVec<[(TypeKey, Slot<'a>); 2]>,
}

impl<'a> ValueState<'a> {
    fn slot(&self, ty: TypeKey) -> Option<&Slot<'a>> {
        self.slots.iter().find(|(k, _)| *k == ty).map(|(_, s)| s)
    }

    fn slot_mut(&mut self, ty: TypeKey) -> Option<&mut Slot<'a>> {
        self.slots.iter_mut().find(|(k, _)| *k == ty).map(|(_, s)| s)
    }
}

#[derive(Debug, Default)]
pub struct TreeState<'a> {
    cycle_entries: IdentitySet,
    value_states: IdentityMap<ValueState<'a>>,
}

impl<'a> TreeState<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result already recorded for `(id, ty)`, finished or in progress.
    pub fn lookup(&mut self, id: ValueId, ty: TypeKey) -> Option<Value<'a>> {
        let slot = self.value_states.get_mut(id)?.slot_mut(ty)?;
        if !slot.resolved && self.cycle_entries.contains(id, ty) {
            tracing::debug!(?id, ?ty, "Cycle re-entered before resolution");
            slot.idempotent = false;
        }
        Some(slot.result)
    }

    /// Records the container allocated for `(id, ty)` before it is filled.
    pub fn register(&mut self, id: ValueId, ty: TypeKey, result: Value<'a>) {
        let state = self.value_states.entry_or_default(id);
        let slot = Slot {
            result,
            idempotent: true,
            resolved: false,
            cursor: 0,
        };
        match state.slot_mut(ty) {
            Some(existing) => *existing = slot,
            None => state.slots.push((ty, slot)),
        }
    }

    /// Marks `(id, ty)` as on the active stack. Returns `false` if it already was.
    pub fn enter(&mut self, id: ValueId, ty: TypeKey) -> bool {
        self.cycle_entries.insert(id, ty)
    }

    pub fn leave(&mut self, id: ValueId, ty: TypeKey) {
        self.cycle_entries.remove(id, ty);
    }

    pub fn cursor(&self, id: ValueId, ty: TypeKey) -> usize {
        self.value_states
            .get(id)
            .and_then(|state| state.slot(ty))
            .map_or(0, |slot| slot.cursor)
    }

    pub fn advance(&mut self, id: ValueId, ty: TypeKey) {
        if let Some(slot) = self.value_states.get_mut(id).and_then(|s| s.slot_mut(ty)) {
            slot.cursor += 1;
        }
    }

    pub fn is_idempotent(&self, id: ValueId, ty: TypeKey) -> bool {
        self.value_states
            .get(id)
            .and_then(|state| state.slot(ty))
            .is_none_or(|slot| slot.idempotent)
    }

    /// Fixes the final result of `(id, ty)`.
    pub fn resolve(&mut self, id: ValueId, ty: TypeKey, result: Value<'a>) {
        if let Some(slot) = self.value_states.get_mut(id).and_then(|s| s.slot_mut(ty)) {
            slot.result = result;
            slot.resolved = true;
        }
    }

    /// Registers an already finished result.
    pub fn remember(&mut self, id: ValueId, ty: TypeKey, result: Value<'a>) {
        self.register(id, ty, result);
        self.resolve(id, ty, result);
    }

    /// Number of distinct values visited so far.
    pub fn visited(&self) -> usize {
        self.value_states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reentry_clears_idempotent() {
        let (v, t) = (1u8, 2u8);
        let (id, ty) = (ValueId::of(&v), TypeKey::of(&t));
        let mut state = TreeState::new();
        assert!(state.lookup(id, ty).is_none());

        state.register(id, ty, Value::Nil);
        assert!(state.enter(id, ty));
        assert!(!state.enter(id, ty));
        assert!(state.lookup(id, ty).is_some());
        assert!(!state.is_idempotent(id, ty));

        state.advance(id, ty);
        assert_eq!(state.cursor(id, ty), 1);
        state.leave(id, ty);
        state.resolve(id, ty, Value::Bool(true));
        assert_eq!(state.lookup(id, ty), Some(Value::Bool(true)));
    }

    #[test]
    fn test_shared_lookup_keeps_idempotent() {
        let (v, t) = (1u8, 2u8);
        let (id, ty) = (ValueId::of(&v), TypeKey::of(&t));
        let mut state = TreeState::new();
        state.remember(id, ty, Value::Nil);
        assert_eq!(state.lookup(id, ty), Some(Value::Nil));
        assert!(state.is_idempotent(id, ty));
        assert_eq!(state.visited(), 1);
    }
}
