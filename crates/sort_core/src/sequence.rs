//! The sequence being sorted and the shared handle the sort task and the
//! canvas both hold.

use std::sync::{Arc, Mutex, MutexGuard};

use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    values: Vec<u32>,
    max_value: u32,
}

impl Sequence {
    /// Draws `size` uniform values in `[1, max_value]`.
    pub fn generate<R: Rng + ?Sized>(size: usize, max_value: u32, rng: &mut R) -> Self {
        let max_value = max_value.max(1);
        let values = (0..size).map(|_| rng.gen_range(1..=max_value)).collect();
        Self { values, max_value }
    }

    pub fn from_values(values: Vec<u32>, max_value: u32) -> Self {
        Self {
            values,
            max_value: max_value.max(1),
        }
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    pub fn is_sorted(&self) -> bool {
        self.values.windows(2).all(|pair| pair[0] <= pair[1])
    }

    /// Panics if either index is out of range.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.values.swap(i, j);
    }

    pub fn into_values(self) -> Vec<u32> {
        self.values
    }
}

/// Result of one adjacent comparison against the shared sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Carries the values now at `index` and `index + 1`.
    Swapped { left: u32, right: u32 },
    InOrder,
    /// The sequence was regenerated after the caller captured its generation.
    Stale,
}

#[derive(Debug)]
struct Slot {
    sequence: Sequence,
    generation: u64,
}

/// Cloneable handle over the one sequence the application owns.
///
/// The sort task writes through [`SharedSequence::compare_and_swap_adjacent`]
/// and the canvas reads through [`SharedSequence::snapshot`]; each call holds
/// the lock for a single comparison or copy.
#[derive(Debug, Clone)]
pub struct SharedSequence {
    inner: Arc<Mutex<Slot>>,
}

impl SharedSequence {
    pub fn new(sequence: Sequence) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Slot {
                sequence,
                generation: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // Every mutation is a single swap or a wholesale replace, so a
        // poisoned guard still holds a valid sequence.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> Sequence {
        self.lock().sequence.clone()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn len(&self) -> usize {
        self.lock().sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the values wholesale and returns the new generation.
    pub fn replace(&self, sequence: Sequence) -> u64 {
        let mut slot = self.lock();
        slot.sequence = sequence;
        slot.generation = slot.generation.wrapping_add(1);
        slot.generation
    }

    pub fn compare_and_swap_adjacent(&self, generation: u64, index: usize) -> Step {
        let mut slot = self.lock();
        if slot.generation != generation {
            return Step::Stale;
        }
        let values = &slot.sequence.values;
        if index + 1 >= values.len() {
            return Step::InOrder;
        }
        if values[index] > values[index + 1] {
            slot.sequence.swap(index, index + 1);
            let values = &slot.sequence.values;
            Step::Swapped {
                left: values[index],
                right: values[index + 1],
            }
        } else {
            Step::InOrder
        }
    }
}
