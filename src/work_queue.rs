//! FIFO of pending diamond-square subsquares.
//!
//! Items are processed in insertion order, so every subsquare of one
//! half-size is finished before any subsquare of the next smaller size.

use std::collections::VecDeque;

use crate::error::{TerrainError, TerrainResult};

/// One subsquare awaiting its diamond and square steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorkItem {
    pub center_row: u32,
    pub center_col: u32,
    /// Distance from the center to each edge midpoint
    pub half_size: u32,
    /// Divisor applied to random displacements at this level
    pub inverse_scale: f32,
}

impl WorkItem {
    pub fn new(center_row: u32, center_col: u32, half_size: u32, inverse_scale: f32) -> Self {
        Self {
            center_row,
            center_col,
            half_size,
            inverse_scale,
        }
    }
}

#[derive(Debug, Default)]
pub struct WorkQueue {
    pending: VecDeque<WorkItem>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
        }
    }

    pub fn enqueue(&mut self, item: WorkItem) {
        self.pending.push_back(item);
    }

    /// Pop the oldest item. Callers check `is_empty` first; an empty
    /// dequeue means the synthesizer lost track of its work.
    pub fn dequeue(&mut self) -> TerrainResult<WorkItem> {
        self.pending.pop_front().ok_or(TerrainError::EmptyQueue)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = WorkQueue::new();
        queue.enqueue(WorkItem::new(4, 4, 4, 2.0));
        queue.enqueue(WorkItem::new(2, 2, 2, 4.0));
        queue.enqueue(WorkItem::new(2, 6, 2, 4.0));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.dequeue().unwrap().half_size, 4);
        assert_eq!(queue.dequeue().unwrap().center_col, 2);
        assert_eq!(queue.dequeue().unwrap().center_col, 6);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_empty_dequeue_errors() {
        let mut queue = WorkQueue::default();
        assert!(queue.is_empty());
        assert!(matches!(queue.dequeue(), Err(TerrainError::EmptyQueue)));
    }

    #[test]
    fn test_interleaved_enqueue_dequeue() {
        let mut queue = WorkQueue::with_capacity(4);
        queue.enqueue(WorkItem::new(1, 1, 1, 2.0));
        let first = queue.dequeue().unwrap();
        queue.enqueue(WorkItem::new(3, 3, 1, 2.0));

        assert_eq!(first.center_row, 1);
        assert_eq!(queue.dequeue().unwrap().center_row, 3);
        assert!(matches!(queue.dequeue(), Err(TerrainError::EmptyQueue)));
    }
}
