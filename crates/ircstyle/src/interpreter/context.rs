use std::ops::{Deref, DerefMut};

use crate::types::ColorCode;

/// Formatting state active at a point of the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleContext {
    pub bold: bool,
    pub underline: bool,
    pub foreground: Option<ColorCode>,
    pub background: Option<ColorCode>,
}

impl StyleContext {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Exclusive access to a [`StyleContext`] for the extent of one element.
///
/// The state seen on entry is restored when the guard drops, including when
/// rendering the element's children fails part way.
///
/// # Example
///
/// ```
/// use ircstyle::interpreter::{ScopedContext, StyleContext};
///
/// let mut context = StyleContext::new();
/// {
///     let mut scoped = ScopedContext::enter(&mut context);
///     scoped.bold = true;
///     assert!(!scoped.saved().bold);
/// }
/// assert!(!context.bold);
/// ```
#[derive(Debug)]
pub struct ScopedContext<'c> {
    context: &'c mut StyleContext,
    saved: StyleContext,
}

impl<'c> ScopedContext<'c> {
    pub fn enter(context: &'c mut StyleContext) -> Self {
        let saved = *context;
        Self { context, saved }
    }

    /// The state on entry.
    pub fn saved(&self) -> StyleContext {
        self.saved
    }
}

impl Deref for ScopedContext<'_> {
    type Target = StyleContext;

    fn deref(&self) -> &StyleContext {
        self.context
    }
}

impl DerefMut for ScopedContext<'_> {
    fn deref_mut(&mut self) -> &mut StyleContext {
        self.context
    }
}

impl Drop for ScopedContext<'_> {
    fn drop(&mut self) {
        *self.context = self.saved;
    }
}
