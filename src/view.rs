use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

/// Read-only view over the labels of one indexed object.
///
/// The view borrows the store, so the store cannot be appended to, cleared
/// or merged while the view is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelView<'a, T> {
    labels: &'a [T],
}

impl<'a, T> LabelView<'a, T> {
    pub(crate) fn new(labels: &'a [T]) -> Self {
        Self { labels }
    }

    /// A view with no labels, as returned for unseen data indices.
    #[must_use]
    pub fn empty() -> Self {
        Self { labels: &[] }
    }

    /// The labels as a slice borrowing the store.
    #[must_use]
    pub fn as_slice(&self) -> &'a [T] {
        self.labels
    }

    /// Iterates over the labels in append order.
    #[must_use]
    pub fn iter(&self) -> core::slice::Iter<'a, T> {
        self.labels.iter()
    }
}

impl<T: Copy> LabelView<'_, T> {
    /// Copies the labels into an owned vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.labels.to_vec()
    }
}

impl<T> Default for LabelView<'_, T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Deref for LabelView<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.labels
    }
}

impl<'a, T> IntoIterator for LabelView<'a, T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

impl<'a, T> IntoIterator for &LabelView<'a, T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

/// Mutable view over the labels of one indexed object.
///
/// Labels can be overwritten or reordered in place (for example sorted);
/// the run itself cannot grow or shrink.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct LabelViewMut<'a, T> {
    labels: &'a mut [T],
}

impl<'a, T> LabelViewMut<'a, T> {
    pub(crate) fn new(labels: &'a mut [T]) -> Self {
        Self { labels }
    }

    /// A view with no labels, as returned for unseen data indices.
    #[must_use]
    pub fn empty() -> Self {
        Self { labels: &mut [] }
    }

    /// The labels as a shared slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.labels
    }

    /// The labels as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.labels
    }

    /// Converts into a plain mutable slice bound to the store borrow.
    #[must_use]
    pub fn into_mut_slice(self) -> &'a mut [T] {
        self.labels
    }
}

impl<T> Default for LabelViewMut<'_, T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Deref for LabelViewMut<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.labels
    }
}

impl<T> DerefMut for LabelViewMut<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.labels
    }
}

impl<'a, T> IntoIterator for LabelViewMut<'a, T> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter_mut()
    }
}

macro_rules! impl_slice_eq {
    ($view:ident) => {
        impl<T: PartialEq> PartialEq<[T]> for $view<'_, T> {
            fn eq(&self, other: &[T]) -> bool {
                *self.labels == *other
            }
        }

        impl<T: PartialEq> PartialEq<&[T]> for $view<'_, T> {
            fn eq(&self, other: &&[T]) -> bool {
                *self.labels == **other
            }
        }

        impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for $view<'_, T> {
            fn eq(&self, other: &[T; N]) -> bool {
                *self.labels == other[..]
            }
        }

        impl<T: PartialEq> PartialEq<Vec<T>> for $view<'_, T> {
            fn eq(&self, other: &Vec<T>) -> bool {
                *self.labels == other[..]
            }
        }
    };
}

impl_slice_eq!(LabelView);
impl_slice_eq!(LabelViewMut);
