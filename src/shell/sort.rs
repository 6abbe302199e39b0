//! Sorting programs
//!
//! `run fordjohnson` hands its numbers to a [`Sorter`]. The default is the
//! Ford-Johnson merge-insertion sort, which keeps a log of every comparison
//! and insertion so a visualizer can replay the run.

use std::collections::HashMap;

/// Sorting collaborator
pub trait Sorter {
    fn sort(&self, numbers: &[i64]) -> Vec<i64>;
}

/// One recorded step of a sort. Indices refer to positions in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStep {
    /// `left` and `right` were compared
    Compare { left: usize, right: usize },
    /// Input element `index` was inserted at `position` of the main chain
    Insert { index: usize, position: usize },
}

/// Result of a traced sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortTrace {
    pub sorted: Vec<i64>,
    pub steps: Vec<SortStep>,
}

impl SortTrace {
    pub fn comparisons(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, SortStep::Compare { .. }))
            .count()
    }
}

/// Merge-insertion sort
#[derive(Debug, Clone, Copy, Default)]
pub struct FordJohnsonSorter;

impl FordJohnsonSorter {
    pub fn new() -> Self {
        Self
    }

    /// Sort and keep the step log
    pub fn trace(&self, numbers: &[i64]) -> SortTrace {
        let mut run = Run {
            values: numbers,
            steps: Vec::new(),
        };
        let order = run.sort((0..numbers.len()).collect());
        SortTrace {
            sorted: order.into_iter().map(|i| numbers[i]).collect(),
            steps: run.steps,
        }
    }
}

impl Sorter for FordJohnsonSorter {
    fn sort(&self, numbers: &[i64]) -> Vec<i64> {
        self.trace(numbers).sorted
    }
}

struct Run<'a> {
    values: &'a [i64],
    steps: Vec<SortStep>,
}

impl Run<'_> {
    fn less(&mut self, a: usize, b: usize) -> bool {
        self.steps.push(SortStep::Compare { left: a, right: b });
        self.values[a] < self.values[b]
    }

    /// Sorts input indices. Indices are unique, which keeps the pairing of
    /// equal values unambiguous.
    fn sort(&mut self, items: Vec<usize>) -> Vec<usize> {
        if items.len() <= 1 {
            return items;
        }

        // Pair up, larger element first
        let mut pairs = Vec::with_capacity(items.len() / 2);
        let mut chunks = items.chunks_exact(2);
        for pair in &mut chunks {
            if self.less(pair[0], pair[1]) {
                pairs.push((pair[1], pair[0]));
            } else {
                pairs.push((pair[0], pair[1]));
            }
        }
        let straggler = chunks.remainder().first().copied();
        let partner: HashMap<usize, usize> = pairs.iter().copied().collect();

        // Sort the larger elements recursively
        let mains = self.sort(pairs.iter().map(|&(big, _)| big).collect());

        // The partner of the smallest main element goes in front for free
        let mut chain = Vec::with_capacity(items.len());
        chain.push(partner[&mains[0]]);
        chain.extend(&mains);

        // pend[k] pairs with mains[k + 1]; the straggler has no bound
        let pend: Vec<usize> = mains[1..]
            .iter()
            .map(|m| partner[m])
            .chain(straggler)
            .collect();

        for k in insertion_order(pend.len()) {
            let item = pend[k];
            let bound = match mains.get(k + 1) {
                Some(main) => chain.iter().position(|x| x == main).unwrap_or(chain.len()),
                None => chain.len(),
            };
            let position = self.search(&chain[..bound], item);
            self.steps.push(SortStep::Insert {
                index: item,
                position,
            });
            chain.insert(position, item);
        }

        chain
    }

    /// Binary search for the insertion point of `item` (after equal values)
    fn search(&mut self, chain: &[usize], item: usize) -> usize {
        let (mut lo, mut hi) = (0, chain.len());
        while lo < hi {
            let mid = (lo + hi) / 2;
            if self.less(item, chain[mid]) {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        lo
    }
}

/// Order in which the `count` pending elements get inserted.
///
/// Pending element `k` is b(k+2) in the usual notation. Groups end at the
/// Jacobsthal numbers 3, 5, 11, 21, ... and each group goes in descending
/// order, so every binary search covers at most 2^n - 1 elements.
fn insertion_order(count: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(count);
    let last = count + 1;
    let (mut prev_j, mut j) = (1usize, 3usize);
    let mut done = 1usize;

    while done < last {
        let upper = j.min(last);
        for b in (done + 1..=upper).rev() {
            order.push(b - 2);
        }
        done = upper;
        let next = j + 2 * prev_j;
        prev_j = j;
        j = next;
    }

    order
}
