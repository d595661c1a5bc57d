//! Bounded top-K candidate selection.

/// A palette index with its raw distance to the pixel being mapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub index: usize,
    pub distance: f64,
}

impl Candidate {
    /// Ordering key: distance first, then palette index.
    #[inline]
    fn ranks_before(&self, other: &Candidate) -> bool {
        self.distance < other.distance
            || (self.distance == other.distance && self.index < other.index)
    }
}

/// Keeps the `capacity` smallest candidates seen so far.
///
/// Candidates are offered in palette order. Once full, a new candidate
/// replaces the current worst only if it ranks strictly before it, so among
/// equal distances the lower palette index survives.
///
/// The buffer is reused across pixels via [`clear`](Self::clear).
///
/// # Example
///
/// ```
/// use tile_quant::Shortlist;
///
/// let mut shortlist = Shortlist::with_capacity(2);
/// for (index, distance) in [5.0, 1.0, 3.0, 1.0].into_iter().enumerate() {
///     shortlist.offer(index, distance);
/// }
/// let ranked: Vec<usize> = shortlist.ranked().iter().map(|c| c.index).collect();
/// assert_eq!(ranked, vec![1, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct Shortlist {
    capacity: usize,
    items: Vec<Candidate>,
    /// Position of the worst item in `items`, valid when full.
    worst: usize,
}

impl Shortlist {
    /// Capacity below 1 is treated as 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            items: Vec::with_capacity(capacity),
            worst: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.worst = 0;
    }

    /// Offer a candidate.
    pub fn offer(&mut self, index: usize, distance: f64) {
        let candidate = Candidate { index, distance };
        if self.items.len() < self.capacity {
            self.items.push(candidate);
            if self.items.len() == self.capacity {
                self.worst = self.find_worst();
            }
            return;
        }
        if candidate.ranks_before(&self.items[self.worst]) {
            self.items[self.worst] = candidate;
            self.worst = self.find_worst();
        }
    }

    /// Sort in place by (distance, index) and return the candidates.
    pub fn ranked(&mut self) -> &[Candidate] {
        self.items.sort_by(|x, y| {
            x.distance
                .total_cmp(&y.distance)
                .then(x.index.cmp(&y.index))
        });
        self.worst = self.items.len().saturating_sub(1);
        &self.items
    }

    fn find_worst(&self) -> usize {
        let mut worst = 0;
        for (i, c) in self.items.iter().enumerate().skip(1) {
            if self.items[worst].ranks_before(c) {
                worst = i;
            }
        }
        worst
    }
}
