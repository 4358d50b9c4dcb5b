//! Runtime configuration.

use crate::api::Error;
use crate::fmt;

/// Observer invoked with every error that leaves a top-level call.
pub type FailHook<'a> = dyn Fn(&Error) + 'a;

/// Options injected into a [`Runtime`](crate::Runtime).
#[derive(Clone, Copy, Default)]
pub struct RuntimeOptions<'a> {
    /// Called before a failing top-level call returns its error.
    pub on_fail: Option<&'a FailHook<'a>>,
}

impl<'a> RuntimeOptions<'a> {
    pub fn with_fail_hook(hook: &'a FailHook<'a>) -> Self {
        Self {
            on_fail: Some(hook),
        }
    }
}

impl fmt::Debug for RuntimeOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeOptions")
            .field("on_fail", &self.on_fail.map(|_| "<hook>"))
            .finish()
    }
}
