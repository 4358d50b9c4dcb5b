//! Recursive construction of typed instances.
//!
//! A [`Hydration`] is created once per top-level call and threaded through
//! every nested combinator, carrying the runtime and the [`TreeState`].

pub mod path;
pub mod tree_state;

pub use path::{Path, Segment};
pub use tree_state::{Slot, TreeState};

use crate::{
    api::{Error, Runtime},
    types::Type,
    values::Value,
};

pub struct Hydration<'a> {
    rt: Runtime<'a>,
    state: TreeState<'a>,
}

impl<'a> Hydration<'a> {
    pub fn new(rt: Runtime<'a>) -> Self {
        Self {
            rt,
            state: TreeState::new(),
        }
    }

    pub fn runtime(&self) -> &Runtime<'a> {
        &self.rt
    }

    pub fn state(&mut self) -> &mut TreeState<'a> {
        &mut self.state
    }

    pub fn hydrate(
        &mut self,
        ty: Type<'a>,
        value: Value<'a>,
        path: &mut Path<'a>,
    ) -> Result<Value<'a>, Error> {
        ty.combinator().hydrate(self, value, path)
    }

    /// Hydrates a child with `segment` appended to the path.
    pub fn hydrate_at(
        &mut self,
        ty: Type<'a>,
        value: Value<'a>,
        path: &mut Path<'a>,
        segment: Segment<'a>,
    ) -> Result<Value<'a>, Error> {
        path.push(segment);
        let result = self.hydrate(ty, value, path);
        path.pop();
        result
    }
}
