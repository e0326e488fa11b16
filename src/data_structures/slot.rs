//! Fill-once holder for values that arrive asynchronously.

/// Lifecycle of an asynchronously produced value: `Unloaded` until the producer
/// delivers it, then `Loaded` for good.
///
/// There is a single writer. A second [`fill`](Self::fill) is rejected and the
/// value is handed back to the caller, mirroring `OnceCell::set`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadSlot<T> {
    Unloaded,
    Loaded(T),
}

impl<T> LoadSlot<T> {
    pub fn fill(&mut self, value: T) -> Result<(), T> {
        match self {
            LoadSlot::Unloaded => {
                *self = LoadSlot::Loaded(value);
                Ok(())
            }
            LoadSlot::Loaded(_) => Err(value),
        }
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            LoadSlot::Unloaded => None,
            LoadSlot::Loaded(value) => Some(value),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadSlot::Loaded(_))
    }
}

impl<T> Default for LoadSlot<T> {
    fn default() -> Self {
        LoadSlot::Unloaded
    }
}
