use std::ops::Range;

/// ワーカー 1 つが担当する連続した行範囲 `[lo, hi)`。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    pub lo: usize,
    pub hi: usize,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.hi - self.lo
    }

    pub fn is_empty(&self) -> bool {
        self.lo == self.hi
    }

    pub fn rows(&self) -> Range<usize> {
        self.lo..self.hi
    }
}

/// `n` 行を `workers` 個の連続区間にほぼ均等に分割する。
///
/// 余り `n % workers` 行は先頭のワーカーから 1 行ずつ配る。
/// `workers > n` の場合、後ろのパーティションは空になる。
pub fn partition_rows(n: usize, workers: usize) -> Vec<Partition> {
    if workers == 0 {
        return Vec::new();
    }
    let base = n / workers;
    let extra = n % workers;

    let mut parts = Vec::with_capacity(workers);
    let mut lo = 0;
    for w in 0..workers {
        let len = base + usize::from(w < extra);
        parts.push(Partition { lo, hi: lo + len });
        lo += len;
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn remainder_goes_to_first_workers() {
        let parts = partition_rows(10, 4);
        let lens: Vec<usize> = parts.iter().map(Partition::len).collect();
        assert_eq!(lens, vec![3, 3, 2, 2]);
        assert_eq!(parts[0], Partition { lo: 0, hi: 3 });
        assert_eq!(parts[3], Partition { lo: 8, hi: 10 });
    }

    #[test]
    fn more_workers_than_rows() {
        let parts = partition_rows(3, 5);
        assert_eq!(parts.len(), 5);
        assert_eq!(parts.iter().filter(|p| p.is_empty()).count(), 2);
        assert_eq!(parts.last().map(|p| p.rows()), Some(3..3));
    }

    #[test]
    fn zero_workers_gives_no_partitions() {
        assert!(partition_rows(8, 0).is_empty());
    }

    proptest! {
        #[test]
        fn partitions_cover_rows_exactly_once(n in 1usize..400, w_seed in 0usize..400) {
            let workers = 1 + w_seed % n;
            let parts = partition_rows(n, workers);
            prop_assert_eq!(parts.len(), workers);

            // 連続していれば互いに素かつ和集合が [0, n)
            let mut next = 0;
            for p in &parts {
                prop_assert_eq!(p.lo, next);
                prop_assert!(p.lo <= p.hi);
                next = p.hi;
            }
            prop_assert_eq!(next, n);

            let max = parts.iter().map(Partition::len).max().unwrap();
            let min = parts.iter().map(Partition::len).min().unwrap();
            prop_assert!(max - min <= 1);
        }
    }
}
