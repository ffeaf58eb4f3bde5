// Navigation cursor - which row of the song table is "current"
// Wraps at both ends; inactive while the store is empty

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Wrap-around step. `count` must be non-zero.
pub fn step(index: usize, direction: Direction, count: usize) -> usize {
    debug_assert!(count > 0);
    match direction {
        Direction::Next => (index + 1) % count,
        Direction::Prev => (index % count + count - 1) % count,
    }
}

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    cursor: Option<usize>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<usize> {
        self.cursor
    }

    pub fn select_initial(&mut self, count: usize) -> Option<usize> {
        self.cursor = (count > 0).then_some(0);
        self.cursor
    }

    /// Move one step. `None` (and an inactive cursor) when there is nothing to
    /// move over.
    pub fn advance(&mut self, direction: Direction, count: usize) -> Option<usize> {
        if count == 0 {
            self.cursor = None;
            return None;
        }

        let next = match self.cursor {
            Some(index) => step(index, direction, count),
            None => match direction {
                Direction::Next => 0,
                Direction::Prev => count - 1,
            },
        };
        self.cursor = Some(next);
        self.cursor
    }
}
