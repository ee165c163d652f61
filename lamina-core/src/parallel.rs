//! Thread-parallel execution over disjoint output blocks.
//!
//! Uses `std::thread::scope` for scoped parallelism: no runtime, no pool
//! living between calls. Each worker owns a disjoint [`MatMut`] obtained with
//! `split_at_mut`, so no two workers can write the same element.

use crate::addressing::MatMut;
use crate::scalar::Scalar;

/// Split `out` along its outer axis into at most `threads` blocks and run
/// `f(first_outer_index, block)` on each, in parallel.
///
/// Block sizes are rounded up to a multiple of `align` (a microkernel tile
/// edge) so only the last block carries a partial tile. With one thread, or
/// an outer extent not worth splitting, `f` runs inline on the whole view.
pub fn for_each_outer_block<T, F>(out: MatMut<'_, T>, threads: usize, align: usize, f: F)
where
    T: Scalar,
    F: Fn(usize, MatMut<'_, T>) + Sync,
{
    let outer = out.outer_dim();
    let align = align.max(1);
    if threads <= 1 || outer <= align {
        f(0, out);
        return;
    }
    let per = outer.div_ceil(threads).div_ceil(align) * align;
    if per >= outer {
        f(0, out);
        return;
    }

    let mut blocks = Vec::with_capacity(threads);
    let mut rest = out;
    let mut start = 0;
    while rest.outer_dim() > per {
        let (head, tail) = rest.split_outer(per);
        blocks.push((start, head));
        start += per;
        rest = tail;
    }
    blocks.push((start, rest));

    std::thread::scope(|s| {
        let f = &f;
        for (start, block) in blocks {
            s.spawn(move || f(start, block));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_blocks_cover_every_column_once() {
        let mut data = vec![0.0f64; 4 * 37];
        let out = MatMut::new(&mut data, 4, 37, Layout::ColMajor, 4);
        let calls = AtomicUsize::new(0);
        for_each_outer_block(out, 4, 3, |start, mut block| {
            calls.fetch_add(1, Ordering::Relaxed);
            for j in 0..block.cols() {
                for i in 0..block.rows() {
                    *block.at_mut(i, j) += (start + j) as f64;
                }
            }
        });
        assert!(calls.load(Ordering::Relaxed) > 1);
        for j in 0..37 {
            for i in 0..4 {
                assert_eq!(data[j * 4 + i], j as f64);
            }
        }
    }

    #[test]
    fn test_single_thread_runs_inline() {
        let mut data = vec![1.0f32; 6];
        let out = MatMut::new(&mut data, 2, 3, Layout::RowMajor, 3);
        let calls = AtomicUsize::new(0);
        for_each_outer_block(out, 1, 1, |start, block| {
            assert_eq!(start, 0);
            assert_eq!(block.rows(), 2);
            calls.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_empty_output() {
        let mut data: Vec<f64> = Vec::new();
        let out = MatMut::new(&mut data, 0, 0, Layout::ColMajor, 1);
        for_each_outer_block(out, 8, 4, |_, block| assert_eq!(block.cols(), 0));
    }
}
