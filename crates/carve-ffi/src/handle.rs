//! Generation-checked handle table for objects owned across the C boundary.
//!
//! A handle packs a slot index (upper 32 bits) and the slot's generation
//! (lower 32 bits). Removing an entry bumps the generation, so a handle
//! kept by C code after `destroy` no longer resolves.

/// Handle value that never resolves. Written to out-params on failure.
pub(crate) const NULL_HANDLE: u64 = u64::MAX;

fn pack(index: u32, generation: u32) -> u64 {
    (u64::from(index) << 32) | u64::from(generation)
}

fn unpack(handle: u64) -> (usize, u32) {
    ((handle >> 32) as usize, handle as u32)
}

enum Entry<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32, next_free: Option<u32> },
}

/// Slot table mapping `u64` handles to owned values.
///
/// Vacant slots form an intrusive free list. A slot whose generation
/// would wrap is never reused.
pub(crate) struct HandleTable<T> {
    entries: Vec<Entry<T>>,
    free_head: Option<u32>,
}

impl<T> HandleTable<T> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_head: None,
        }
    }

    /// Store `value` and return a handle to it.
    pub fn insert(&mut self, value: T) -> u64 {
        if let Some(index) = self.free_head {
            let entry = &mut self.entries[index as usize];
            if let Entry::Vacant {
                generation,
                next_free,
            } = *entry
            {
                self.free_head = next_free;
                *entry = Entry::Occupied { generation, value };
                return pack(index, generation);
            }
        }
        let index = self.entries.len() as u32;
        self.entries.push(Entry::Occupied {
            generation: 0,
            value,
        });
        pack(index, 0)
    }

    pub fn get(&self, handle: u64) -> Option<&T> {
        let (index, wanted) = unpack(handle);
        match self.entries.get(index)? {
            Entry::Occupied { generation, value } if *generation == wanted => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, handle: u64) -> Option<&mut T> {
        let (index, wanted) = unpack(handle);
        match self.entries.get_mut(index)? {
            Entry::Occupied { generation, value } if *generation == wanted => Some(value),
            _ => None,
        }
    }

    /// Take the value out, invalidating `handle`. Stale or unknown
    /// handles return `None`.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let (index, wanted) = unpack(handle);
        match self.entries.get(index)? {
            Entry::Occupied { generation, .. } if *generation == wanted => {}
            _ => return None,
        }
        let next_generation = wanted.wrapping_add(1);
        let retired = next_generation == 0;
        let vacant = Entry::Vacant {
            generation: next_generation,
            next_free: if retired { None } else { self.free_head },
        };
        let Entry::Occupied { value, .. } = std::mem::replace(&mut self.entries[index], vacant)
        else {
            return None;
        };
        if !retired {
            self.free_head = Some(index as u32);
        }
        Some(value)
    }

    #[cfg(test)]
    fn force_generation(&mut self, index: usize, generation: u32) {
        match &mut self.entries[index] {
            Entry::Occupied { generation: g, .. } | Entry::Vacant { generation: g, .. } => {
                *g = generation
            }
        }
    }
}
