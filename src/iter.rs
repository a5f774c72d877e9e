use core::iter::FusedIterator;

use crate::layout::IndexTable;
use crate::view::LabelView;

/// Iterator over the label views of an `AssocStore`, one per data index.
///
/// Unlabelled indices yield empty views. This iterator implements `Clone`.
#[derive(Debug, Clone)]
pub struct Labels<'a, T> {
    table: IndexTable<'a>,
    payload: &'a [T],
    front: usize,
    back: usize,
}

impl<'a, T> Labels<'a, T> {
    pub(crate) fn new(table: IndexTable<'a>, payload: &'a [T]) -> Self {
        Self {
            table,
            payload,
            front: 0,
            back: table.len(),
        }
    }

    fn view(&self, index: usize) -> Option<LabelView<'a, T>> {
        let (start, end) = self.table.range(index, self.payload.len())?;
        self.payload.get(start..end).map(LabelView::new)
    }
}

impl<'a, T> Iterator for Labels<'a, T> {
    type Item = LabelView<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let view = self.view(self.front);
        self.front += 1;
        view
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for Labels<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.view(self.back)
    }
}

impl<T> ExactSizeIterator for Labels<'_, T> {}

impl<T> FusedIterator for Labels<'_, T> {}
