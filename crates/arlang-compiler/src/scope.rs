//! Variable name to slot bindings.

use rustc_hash::FxHashMap;

use crate::emit::Slot;

/// Maps variable names to local slots for one compilation.
///
/// Bindings are never removed. Names keep the order in which they were
/// first bound.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    slots: FxHashMap<String, Slot>,
    order: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<Slot> {
        self.slots.get(name).copied()
    }

    /// Bind `name` to `slot`, replacing any earlier binding.
    ///
    /// Returns the previous slot, if there was one.
    pub fn bind(&mut self, name: &str, slot: Slot) -> Option<Slot> {
        let previous = self.slots.insert(name.to_owned(), slot);
        if previous.is_none() {
            self.order.push(name.to_owned());
        }
        previous
    }

    /// `(name, slot)` pairs in first-binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Slot)> + '_ {
        self.order
            .iter()
            .filter_map(|name| self.slots.get(name).map(|&slot| (name.as_str(), slot)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
