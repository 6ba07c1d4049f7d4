//! Zero-copy cursor over a borrowed slice.
//!
//! Both parsers advance by value: `tail()` returns a new cursor one element
//! further along the same slice, so backtracking is just keeping an old copy.

#[derive(Debug)]
pub struct Cursor<'a, T> {
    items: &'a [T],
    offset: usize,
}

// Manual impls: deriving would require `T: Clone`/`T: Copy`.
impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<'a, T> Cursor<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self { items, offset: 0 }
    }

    /// Current element, or `None` once exhausted.
    pub fn head(&self) -> Option<&'a T> {
        self.items.get(self.offset)
    }

    /// Cursor one element further. Saturates at the end.
    pub fn tail(&self) -> Self {
        Self {
            items: self.items,
            offset: (self.offset + 1).min(self.items.len()),
        }
    }

    /// Head and tail in one step; `None` marks end of input.
    pub fn walk(&self) -> Option<(&'a T, Self)> {
        self.head().map(|head| (head, self.tail()))
    }

    /// Remaining element count.
    pub fn len(&self) -> usize {
        self.items.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offset of the head within the backing slice.
    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn as_slice(&self) -> &'a [T] {
        &self.items[self.offset..]
    }
}
