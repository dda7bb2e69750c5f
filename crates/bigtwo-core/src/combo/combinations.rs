/// Iterates every `k`-element subset of a slice in lexicographic index order.
///
/// Indices into the pool are advanced in place: the rightmost index that can
/// still move is bumped and every index after it is reset to follow it.
#[derive(Debug, Clone)]
pub struct Combinations<'a, T> {
    pool: &'a [T],
    indices: Vec<usize>,
    started: bool,
    exhausted: bool,
}

impl<'a, T: Copy> Combinations<'a, T> {
    pub fn new(pool: &'a [T], k: usize) -> Self {
        Self {
            pool,
            indices: (0..k).collect(),
            started: false,
            exhausted: k > pool.len(),
        }
    }

    fn current(&self) -> Vec<T> {
        self.indices.iter().map(|&i| self.pool[i]).collect()
    }

    fn advance(&mut self) -> bool {
        let k = self.indices.len();
        let n = self.pool.len();
        let Some(pivot) = (0..k).rev().find(|&i| self.indices[i] != i + n - k) else {
            return false;
        };
        self.indices[pivot] += 1;
        for j in pivot + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        true
    }
}

impl<T: Copy> Iterator for Combinations<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.current());
        }
        if self.advance() {
            Some(self.current())
        } else {
            self.exhausted = true;
            None
        }
    }
}
