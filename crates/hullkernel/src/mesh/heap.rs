//! Binary max-heap over facet ids with a position map for arbitrary removal.

/// Max-heap of `(priority, id)`; ties go to the smaller id so pops are reproducible.
#[derive(Clone, Debug, Default)]
pub(crate) struct IndexedHeap {
    heap: Vec<(f64, usize)>,
    pos: Vec<Option<usize>>,
}

impl IndexedHeap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[inline]
    pub(crate) fn contains(&self, id: usize) -> bool {
        self.pos.get(id).copied().flatten().is_some()
    }

    /// Insert `id`, or update its priority when already present.
    pub(crate) fn push(&mut self, id: usize, priority: f64) {
        if id >= self.pos.len() {
            self.pos.resize(id + 1, None);
        }
        match self.pos[id] {
            Some(at) => {
                let old = self.heap[at].0;
                self.heap[at].0 = priority;
                if priority > old {
                    self.sift_up(at);
                } else {
                    self.sift_down(at);
                }
            }
            None => {
                self.heap.push((priority, id));
                let at = self.heap.len() - 1;
                self.pos[id] = Some(at);
                self.sift_up(at);
            }
        }
    }

    pub(crate) fn peek(&self) -> Option<(usize, f64)> {
        self.heap.first().map(|&(p, id)| (id, p))
    }

    /// Remove and return the entry with the largest priority.
    pub(crate) fn pop(&mut self) -> Option<(usize, f64)> {
        let (id, p) = self.peek()?;
        self.remove(id);
        Some((id, p))
    }

    /// Remove `id` wherever it sits; returns its priority if it was present.
    pub(crate) fn remove(&mut self, id: usize) -> Option<f64> {
        let at = self.pos.get(id).copied().flatten()?;
        let last = self.heap.len() - 1;
        self.swap(at, last);
        let (priority, _) = self.heap.pop()?;
        self.pos[id] = None;
        if at < self.heap.len() {
            self.sift_down(at);
            self.sift_up(at);
        }
        Some(priority)
    }

    #[inline]
    fn beats(a: (f64, usize), b: (f64, usize)) -> bool {
        a.0 > b.0 || (a.0 == b.0 && a.1 < b.1)
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.pos[self.heap[i].1] = Some(i);
        self.pos[self.heap[j].1] = Some(j);
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !Self::beats(self.heap[i], self.heap[parent]) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let (l, r) = (2 * i + 1, 2 * i + 2);
            let mut best = i;
            if l < n && Self::beats(self.heap[l], self.heap[best]) {
                best = l;
            }
            if r < n && Self::beats(self.heap[r], self.heap[best]) {
                best = r;
            }
            if best == i {
                break;
            }
            self.swap(i, best);
            i = best;
        }
    }
}
