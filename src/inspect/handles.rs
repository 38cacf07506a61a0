use rustc_hash::FxHashMap;
use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum HandleError {
    #[error("handle {0} belongs to a discarded stack trace")]
    Stale(usize),
    #[error("handle {0} was never handed out")]
    Unknown(usize),
}

impl HandleError {
    /// The short error code sent to the client.
    pub fn code(self) -> &'static str {
        match self {
            HandleError::Stale(_) => "stale-handle",
            HandleError::Unknown(_) => "unknown-handle",
        }
    }
}

// In some places (e.g., `Variable::variables_reference`), `0` is used to
// represent no value. Therefore, IDs start at one.
//
// IDs are never reused. `reset` drops all values and remembers where the
// current epoch starts, so that IDs from earlier epochs can be told apart
// from IDs that were never handed out.
pub struct HandleTable<T> {
    values: FxHashMap<NonZeroUsize, T>,
    first_id: usize,
    next_id: usize,
}

impl<T> HandleTable<T> {
    pub fn create(&mut self, value: T) -> NonZeroUsize {
        let id = NonZeroUsize::new(self.next_id).unwrap_or(NonZeroUsize::MIN);
        self.next_id += 1;
        self.values.insert(id, value);
        id
    }

    pub fn get(&self, id: usize) -> Result<&T, HandleError> {
        if let Some(value) = NonZeroUsize::new(id).and_then(|id| self.values.get(&id)) {
            return Ok(value);
        }
        if id != 0 && id < self.first_id {
            Err(HandleError::Stale(id))
        } else {
            Err(HandleError::Unknown(id))
        }
    }

    /// Starts a new epoch, invalidating every ID handed out so far.
    pub fn reset(&mut self) {
        self.values.clear();
        self.first_id = self.next_id;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self {
            values: FxHashMap::default(),
            first_id: 1,
            next_id: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_resolve() {
        let mut table = HandleTable::default();
        let a = table.create("a");
        let b = table.create("b");
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
        assert_eq!(table.get(2), Ok(&"b"));
        assert_eq!(table.get(0), Err(HandleError::Unknown(0)));
        assert_eq!(table.get(3), Err(HandleError::Unknown(3)));
    }

    #[test]
    fn reset_makes_old_ids_stale() {
        let mut table = HandleTable::default();
        let old = table.create("old").get();
        table.reset();
        let new = table.create("new").get();

        assert_ne!(old, new);
        assert_eq!(table.get(old), Err(HandleError::Stale(old)));
        assert_eq!(table.get(new), Ok(&"new"));
        assert_eq!(HandleError::Stale(old).code(), "stale-handle");
        assert_eq!(table.len(), 1);
    }
}
