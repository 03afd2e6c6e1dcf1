//! Composition generator: every way to write `n` as an ordered sum of `m` positive parts.
//!
//! Enumeration order matches a depth-first search that picks the first part from 1
//! upward and recurses on the remainder: compositions come out in ascending
//! lexicographic order. `Compositions` walks that order with an explicit state vector
//! instead of recursion, so memory stays at one composition regardless of `n`.

/// Word counts per line, in line order.
pub type Composition = Vec<usize>;

/// Lazy iterator over the compositions of `total` into `parts` positive integers.
#[derive(Debug, Clone)]
pub struct Compositions {
    total: usize,
    /// The next composition to yield; `None` once exhausted.
    next: Option<Composition>,
}

impl Compositions {
    pub fn new(total: usize, parts: usize) -> Self {
        let next = if parts == 0 {
            // The empty sum only composes zero.
            (total == 0).then(Vec::new)
        } else if parts > total {
            None
        } else {
            let mut first = vec![1; parts];
            first[parts - 1] = total - (parts - 1);
            Some(first)
        };
        Compositions { total, next }
    }
}

impl Iterator for Compositions {
    type Item = Composition;

    fn next(&mut self) -> Option<Composition> {
        let current = self.next.take()?;
        self.next = successor(&current, self.total);
        Some(current)
    }
}

/// Lexicographic successor: bump the rightmost non-final part whose tail can spare a
/// word, reset the parts after it to 1 and give the last part the remainder.
fn successor(current: &[usize], total: usize) -> Option<Composition> {
    let m = current.len();
    if m < 2 {
        return None;
    }

    let mut tail_sum = current[m - 1];
    for i in (0..m - 1).rev() {
        let tail_len = m - 1 - i;
        if tail_sum > tail_len {
            let mut next = current[..=i].to_vec();
            next[i] += 1;
            next.extend(std::iter::repeat(1).take(tail_len - 1));
            let used: usize = next.iter().sum();
            next.push(total - used);
            return Some(next);
        }
        tail_sum += current[i];
    }
    None
}

/// Eagerly collects every composition of `total` into `parts` positive integers.
///
/// Returns an empty list when `parts > total`.
pub fn compositions(total: usize, parts: usize) -> Vec<Composition> {
    Compositions::new(total, parts).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
