use alloc::vec::Vec;
use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Non-owning reference to a node slot in an [`Arena`].
///
/// Handles are one-based internally so that `Option<Handle>` costs nothing extra.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        let raw = (index + 1) as RawHandle;
        match NonZero::new(raw) {
            Some(raw) => Self(raw),
            None => unreachable!("`index + 1` is never zero"),
        }
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// Slot storage for tree nodes with handle reuse.
///
/// Freed slots go onto a free list and are handed out again by the next [`Arena::alloc`], so a
/// tree that shrinks and grows again does not keep extending its backing vector.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of live elements.
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            self.slots[h.index()] = Some(element);
            h
        } else {
            assert!(
                self.slots.len() <= Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX + 1
            );
            self.slots.push(Some(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Removes an element and releases its slot.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // `Option<Handle>` is used for parent links and must stay niche-optimised.
    assert_eq_size!(Handle, Option<Handle>);
    assert_eq_size!(Handle, RawHandle);

    #[test]
    #[should_panic(expected = "`Handle::from_index()` - `index` > `Handle::MAX`!")]
    fn invalid_handle() {
        let _ = Handle::from_index(Handle::MAX + 1);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut arena: Arena<&str> = Arena::new();
        let a = arena.alloc("a");
        let b = arena.alloc("b");
        assert_eq!(arena.take(a), "a");
        assert_eq!(arena.len(), 1);

        let c = arena.alloc("c");
        assert_eq!(c, a);
        assert_eq!(*arena.get(b), "b");
        assert_eq!(*arena.get(c), "c");
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - `handle` is invalid!")]
    fn stale_handle_panics() {
        let mut arena: Arena<u8> = Arena::new();
        let h = arena.alloc(1);
        arena.take(h);
        let _ = arena.get(h);
    }

    proptest! {
        #[test]
        fn handle_round_trip(index in 0..=Handle::MAX) {
            let handle = Handle::from_index(index);
            prop_assert_eq!(handle.index(), index);
        }

        #[test]
        fn arena_behaves_like_vec(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        let handle = arena.alloc(value);
                        model.push((handle, value));
                    }
                    Operation::GetMut(which, value) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        *arena.get_mut(model[index].0) = value;
                        model[index].1 = value;
                    }
                    Operation::Take(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let value = arena.take(model[index].0);
                        let (_, expected) = model.swap_remove(index);
                        prop_assert_eq!(value, expected);
                    }
                    Operation::Clear => {
                        arena.clear();
                        model.clear();
                    }
                }

                prop_assert_eq!(arena.len(), model.len());
                for &(handle, value) in &model {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        GetMut(usize, u32),
        Take(usize),
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Alloc),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::GetMut(which, value)),
            5 => any::<usize>().prop_map(Operation::Take),
            1 => Just(Operation::Clear),
        ]
    }
}
