use std::collections::HashMap;

/// Levenshtein edit distance over chars, two-row O(min(m,n)) space.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    let (m, n) = (a.len(), b.len());

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Keep the shorter string in the inner loop to minimise allocation.
    let (a, b, m, n) = if m <= n { (a, b, m, n) } else { (b, a, n, m) };

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// `1 - distance / longer length`, in [0.0, 1.0].
pub fn levenshtein_ratio(s1: &str, s2: &str) -> f64 {
    let max_len = s1.chars().count().max(s2.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(s1, s2) as f64 / max_len as f64
}

/// Ratcliff/Obershelp similarity `2·M / T`, where `M` counts chars in the
/// matching blocks and `T` is the combined length. Two empty strings score 1.
///
/// Blocks are found by taking the longest common run (earliest in `a`, then
/// earliest in `b`) and recursing on the pieces either side of it.
pub struct SequenceRatio {
    b: Vec<char>,
    b_index: HashMap<char, Vec<usize>>,
    b_counts: HashMap<char, usize>,
}

impl SequenceRatio {
    /// Indexes `b` once so it can be scored against many `a`s.
    pub fn new(b: &str) -> Self {
        let b: Vec<char> = b.chars().collect();
        let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
        let mut b_counts: HashMap<char, usize> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b_index.entry(c).or_default().push(j);
            *b_counts.entry(c).or_default() += 1;
        }
        Self { b, b_index, b_counts }
    }

    pub fn ratio(&self, a: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let matches = self.matching_chars(&a);
        score(matches, a.len() + self.b.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from lengths alone.
    pub fn real_quick_ratio(&self, a: &str) -> f64 {
        let la = a.chars().count();
        score(la.min(self.b.len()), la + self.b.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from shared character counts.
    pub fn quick_ratio(&self, a: &str) -> f64 {
        let mut available = self.b_counts.clone();
        let mut shared = 0;
        let mut la = 0;
        for c in a.chars() {
            la += 1;
            if let Some(n) = available.get_mut(&c) {
                if *n > 0 {
                    *n -= 1;
                    shared += 1;
                }
            }
        }
        score(shared, la + self.b.len())
    }

    fn matching_chars(&self, a: &[char]) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }

    /// Longest run with `a[i..i+k] == b[j..j+k]` inside the given window.
    fn longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
        // run length of the match ending at b[j], for the previous row of a
        let mut run_at: HashMap<usize, usize> = HashMap::new();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next_run = HashMap::new();
            if let Some(positions) = self.b_index.get(c) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j.checked_sub(1).and_then(|p| run_at.get(&p)).copied().unwrap_or(0) + 1;
                    next_run.insert(j, k);
                    if k > best_k {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_k = k;
                    }
                }
            }
            run_at = next_run;
        }
        (best_i, best_j, best_k)
    }
}

fn score(matches: usize, length: usize) -> f64 {
    if length == 0 {
        return 1.0;
    }
    2.0 * matches as f64 / length as f64
}
