use std::ops::Index;
use std::ops::IndexMut;
use std::ops::Range;

use crate::cbs_assert_moderate;
use crate::cbs_assert_simple;

/// A growable buffer with a logical `[head, tail)` window.
///
/// Elements before `head` are retained; they either belong to an enclosing window (see
/// [`Queue::store`]) or were frozen by [`Queue::finish`]. Positions are absolute indices into the
/// buffer, so a position obtained earlier stays valid as long as the buffer is not truncated below
/// it.
#[derive(Debug, Clone)]
pub struct Queue<T> {
    elements: Vec<T>,
    head: usize,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self {
            elements: Vec::default(),
            head: 0,
        }
    }
}

/// A save-point of a [`Queue`] window, consumed by [`Queue::restore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSnapshot {
    head: usize,
    tail: usize,
}

impl<T> Queue<T> {
    pub fn push(&mut self, element: T) {
        self.elements.push(element);
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn tail(&self) -> usize {
        self.elements.len()
    }

    /// The number of elements in the window.
    pub fn len(&self) -> usize {
        self.tail() - self.head
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail()
    }

    /// The elements in the `[head, tail)` window.
    pub fn window(&self) -> &[T] {
        &self.elements[self.head..]
    }

    /// The elements at the absolute positions in `range`, which may lie outside of the window.
    pub fn slice(&self, range: Range<usize>) -> &[T] {
        &self.elements[range]
    }

    pub fn set_head(&mut self, head: usize) {
        cbs_assert_simple!(head <= self.tail());
        self.head = head;
    }

    /// Drops every element at a position `>= tail`; the head is moved back if needed.
    pub fn truncate(&mut self, tail: usize) {
        cbs_assert_simple!(tail <= self.tail());
        self.elements.truncate(tail);
        self.head = self.head.min(tail);
    }

    /// Returns a save-point of the current window without copying it.
    pub fn save_point(&self) -> QueueSnapshot {
        QueueSnapshot {
            head: self.head,
            tail: self.tail(),
        }
    }

    /// Returns the window to the state recorded in `snapshot`.
    pub fn restore(&mut self, snapshot: QueueSnapshot) {
        cbs_assert_simple!(snapshot.tail <= self.tail());
        self.elements.truncate(snapshot.tail);
        self.head = snapshot.head;
    }

    /// Freezes the current window: the head moves to the tail and the positions of the frozen
    /// elements are returned.
    pub fn finish(&mut self) -> Range<usize> {
        let frozen = self.head..self.tail();
        self.head = self.tail();
        frozen
    }

    /// Empties the buffer, keeping its allocation.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.head = 0;
    }
}

impl<T: Copy> Queue<T> {
    /// Re-pushes the current window and moves the head past the original window, so that the
    /// copy can be modified freely while the original stays intact for [`Queue::restore`].
    pub fn store(&mut self) -> QueueSnapshot {
        let snapshot = self.save_point();
        self.elements.extend_from_within(snapshot.head..snapshot.tail);
        self.head = snapshot.tail;
        cbs_assert_moderate!(self.len() == snapshot.tail - snapshot.head);
        snapshot
    }
}

impl<T> Index<usize> for Queue<T> {
    type Output = T;

    fn index(&self, position: usize) -> &T {
        &self.elements[position]
    }
}

impl<T> IndexMut<usize> for Queue<T> {
    fn index_mut(&mut self, position: usize) -> &mut T {
        &mut self.elements[position]
    }
}
