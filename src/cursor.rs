use std::num::NonZeroUsize;

/// Position of the displayed question. Navigation wraps at both ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
}

impl Cursor {
    pub fn current(&self) -> usize {
        self.index
    }

    pub fn next(self, count: NonZeroUsize) -> Self {
        Self {
            index: (self.index + 1) % count.get(),
        }
    }

    pub fn previous(self, count: NonZeroUsize) -> Self {
        let count = count.get();
        Self {
            index: (self.index % count + count - 1) % count,
        }
    }
}
