/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::VecDeque;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("invalid element size {size} for window size {window_size}")]
    InvalidSize { size: i64, window_size: i64 },
    #[error("invalid slide positions {0}")]
    InvalidArgument(i64),
}

struct Element<T> {
    element: T,
    life_time: i64,
    size: i64,
}

/// A fixed capacity window of sized elements.
///
/// Index 0 is the newest element. Each element carries a remaining lifetime,
/// which is decreased when the window slides, and the element is dropped
/// once it goes below zero. The window never holds more than `window_size`
/// worth of elements, the oldest ones are evicted on insertion if needed.
pub struct SlidingWindow<T> {
    elements: VecDeque<Element<T>>,
    window_size: i64,
    occupied: i64,
}

impl<T> SlidingWindow<T> {
    pub fn new(window_size: i64) -> Self {
        SlidingWindow {
            elements: VecDeque::new(),
            window_size: window_size.saturating_abs(),
            occupied: 0,
        }
    }

    #[inline]
    pub fn window_size(&self) -> i64 {
        self.window_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Add an element of size 1, which fails on a zero sized window.
    pub fn add(&mut self, element: T) -> Result<(), WindowError> {
        self.add_sized(element, 1)
    }

    pub fn add_sized(&mut self, element: T, size: i64) -> Result<(), WindowError> {
        if size < 0 || size > self.window_size {
            return Err(WindowError::InvalidSize {
                size,
                window_size: self.window_size,
            });
        }
        self.push(element, size);
        Ok(())
    }

    /// Insert without checking `size`, which must be in `0..=window_size`.
    pub(crate) fn push(&mut self, element: T, size: i64) {
        while self.occupied + size > self.window_size {
            let Some(oldest) = self.elements.pop_back() else {
                break;
            };
            self.occupied -= oldest.size;
        }
        self.occupied += size;
        self.elements.push_front(Element {
            element,
            life_time: self.window_size - size,
            size,
        });
    }

    pub fn slide_window_by_one_position(&mut self) {
        self.shift(1);
    }

    pub fn slide_window(&mut self, positions: i64) -> Result<(), WindowError> {
        if positions < 0 {
            return Err(WindowError::InvalidArgument(positions));
        }
        self.shift(positions);
        Ok(())
    }

    fn shift(&mut self, positions: i64) {
        for e in self.elements.iter_mut() {
            e.life_time = e.life_time.saturating_sub(positions);
        }
        while let Some(oldest) = self.elements.back() {
            if oldest.life_time >= 0 {
                break;
            }
            self.occupied -= oldest.size;
            self.elements.pop_back();
        }
    }

    pub fn oldest_element(&self) -> Option<&T> {
        self.elements.back().map(|e| &e.element)
    }

    pub fn newest_element(&self) -> Option<&T> {
        self.elements.front().map(|e| &e.element)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index).map(|e| &e.element)
    }

    pub fn life_time(&self, index: usize) -> Option<i64> {
        self.elements.get(index).map(|e| e.life_time)
    }

    pub fn size(&self, index: usize) -> Option<i64> {
        self.elements.get(index).map(|e| e.size)
    }

    /// Iterate from the newest to the oldest element.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.elements.iter().map(|e| &e.element)
    }

    pub fn life_times(&self) -> impl DoubleEndedIterator<Item = i64> + '_ {
        self.elements.iter().map(|e| e.life_time)
    }

    /// `(element, life_time, size)` from the newest to the oldest element.
    pub(crate) fn entries(&self) -> impl DoubleEndedIterator<Item = (&T, i64, i64)> {
        self.elements.iter().map(|e| (&e.element, e.life_time, e.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evict_oldest() {
        let mut w = SlidingWindow::new(3);
        for c in ['A', 'B', 'C', 'D'] {
            w.add(c).unwrap();
        }
        w.slide_window(1).unwrap();
        assert_ne!(w.oldest_element(), Some(&'A'));
        assert_eq!(w.oldest_element(), Some(&'B'));
        assert_eq!(w.newest_element(), Some(&'D'));
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn life_time() {
        let mut w = SlidingWindow::new(-4);
        assert_eq!(w.window_size(), 4);
        assert!(w.oldest_element().is_none());
        assert!(w.newest_element().is_none());

        w.add_sized("x", 2).unwrap();
        assert_eq!(w.life_time(0), Some(2));
        assert_eq!(w.size(0), Some(2));
        w.add("y").unwrap();
        assert_eq!(w.life_times().collect::<Vec<_>>(), vec![3, 2]);

        w.slide_window(2).unwrap();
        assert_eq!(w.life_times().collect::<Vec<_>>(), vec![1, 0]);
        w.slide_window_by_one_position();
        assert_eq!(w.iter().copied().collect::<Vec<_>>(), vec!["y"]);
        w.slide_window(0).unwrap();
        assert_eq!(w.life_time(0), Some(0));
        w.slide_window_by_one_position();
        assert!(w.is_empty());
    }

    #[test]
    fn invalid() {
        let mut w = SlidingWindow::new(4);
        assert_eq!(
            w.add_sized(1, 5),
            Err(WindowError::InvalidSize {
                size: 5,
                window_size: 4
            })
        );
        assert!(w.add_sized(1, -1).is_err());
        assert_eq!(w.slide_window(-1), Err(WindowError::InvalidArgument(-1)));
        assert!(w.add_sized(1, 4).is_ok());
        assert_eq!(w.life_time(0), Some(0));

        let mut w = SlidingWindow::new(0);
        assert_eq!(
            w.add('x'),
            Err(WindowError::InvalidSize {
                size: 1,
                window_size: 0
            })
        );
        assert!(w.is_empty());
    }

    #[test]
    fn capacity() {
        let mut w = SlidingWindow::new(4);
        w.add_sized(1, 2).unwrap();
        w.add_sized(2, 2).unwrap();
        w.add_sized(3, 1).unwrap();
        assert_eq!(w.iter().copied().collect::<Vec<_>>(), vec![3, 2]);
        w.add_sized(4, 0).unwrap();
        assert_eq!(w.len(), 3);
        assert_eq!(w.get(0), Some(&4));
        assert_eq!(w.get(3), None);
    }
}
