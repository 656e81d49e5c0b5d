//! Persistent location → value store with an allocation watermark.
//!
//! Cells are addressed by small sequential integers, so the store is an
//! index-addressed persistent vector plus `next_free`. Cloning is O(1) and
//! shares structure, which is how a function call discards any mutation its
//! body performs.
//!
//! Scoped rollback lowers `next_free` back to a saved [`Watermark`] while
//! keeping cell contents: cells that existed before the block keep their
//! updates, cells allocated inside it become unreachable and are reused by
//! the next allocation.

use std::fmt;

use super::error::{EvalResult, RuntimeError};
use super::value::Value;

/// Opaque handle to a store cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location(pub usize);

impl Location {
    pub fn address(self) -> usize {
        self.0
    }
}

/// A saved `next_free`, restored on block exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watermark(usize);

#[derive(Clone, Default)]
pub struct Store {
    cells: im::Vector<Value>,
    next_free: usize,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_free(&self) -> usize {
        self.next_free
    }

    /// Bind `value` at `next_free` and advance the counter.
    pub fn allocate(&mut self, value: Value) -> Location {
        let location = Location(self.next_free);
        if self.next_free < self.cells.len() {
            self.cells.set(self.next_free, value);
        } else {
            self.cells.push_back(value);
        }
        self.next_free += 1;
        location
    }

    /// Overwrite an allocated cell. Addresses at or above the watermark were
    /// never allocated or were rolled back, and are rejected.
    pub fn update(&mut self, location: Location, value: Value) -> EvalResult<()> {
        self.check(location)?;
        self.cells.set(location.0, value);
        Ok(())
    }

    pub fn access(&self, location: Location) -> EvalResult<&Value> {
        self.check(location)?;
        self.cells
            .get(location.0)
            .ok_or_else(|| RuntimeError::unallocated(location.0))
    }

    pub fn watermark(&self) -> Watermark {
        Watermark(self.next_free)
    }

    /// Forget allocations made since `mark`, keeping all cell contents.
    pub fn rollback(&mut self, mark: Watermark) {
        self.next_free = mark.0;
    }

    fn check(&self, location: Location) -> EvalResult<()> {
        if location.0 < self.next_free {
            Ok(())
        } else {
            Err(RuntimeError::unallocated(location.0))
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("next_free", &self.next_free)
            .field("cells", &self.cells.iter().take(self.next_free).collect::<Vec<_>>())
            .finish()
    }
}
