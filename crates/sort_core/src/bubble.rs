//! Ascending bubble sort over a fixed comparison schedule.
//!
//! The schedule never short-circuits: a sequence of length `n` always sees
//! `n * (n - 1) / 2` comparisons, so an animation runs the same number of
//! passes whatever the input.

/// One scheduled comparison of `index` against `index + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub pass: usize,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct BubbleSchedule {
    len: usize,
    pass: usize,
    index: usize,
}

impl BubbleSchedule {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            pass: 0,
            index: 0,
        }
    }

    pub fn total_comparisons(len: usize) -> u64 {
        let len = len as u64;
        len * len.saturating_sub(1) / 2
    }
}

impl Iterator for BubbleSchedule {
    type Item = Comparison;

    fn next(&mut self) -> Option<Comparison> {
        while self.pass + 1 < self.len {
            let pass_end = self.len - 1 - self.pass;
            if self.index < pass_end {
                let comparison = Comparison {
                    pass: self.pass,
                    index: self.index,
                };
                self.index += 1;
                return Some(comparison);
            }
            self.pass += 1;
            self.index = 0;
        }
        None
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortStats {
    pub comparisons: u64,
    pub swaps: u64,
    pub passes: u64,
}

/// A swap of adjacent positions and the values right after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRecord {
    pub pass: usize,
    pub left: usize,
    pub right: usize,
    pub after: Vec<u32>,
}

impl std::fmt::Display for SwapRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.after.iter().map(u32::to_string).collect();
        write!(f, "swap({},{})->[{}]", self.left, self.right, values.join(","))
    }
}

pub fn bubble_sort(values: &mut [u32]) -> SortStats {
    bubble_sort_traced(values, |_| {})
}

pub fn bubble_sort_traced<F>(values: &mut [u32], mut on_swap: F) -> SortStats
where
    F: FnMut(SwapRecord),
{
    let mut stats = SortStats {
        passes: values.len().saturating_sub(1) as u64,
        ..SortStats::default()
    };
    for Comparison { pass, index } in BubbleSchedule::new(values.len()) {
        stats.comparisons += 1;
        if values[index] > values[index + 1] {
            values.swap(index, index + 1);
            stats.swaps += 1;
            on_swap(SwapRecord {
                pass,
                left: index,
                right: index + 1,
                after: values.to_vec(),
            });
        }
    }
    stats
}
