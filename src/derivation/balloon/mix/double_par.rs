//! Parallel double buffer.
//!
//! Same graph as the double-buffer strategy, except that the destination
//! half is split into `n_threads` contiguous ranges, one per worker. Each
//! worker owns a private stream, seeded at construction from the main
//! stream in worker order, so the output does not depend on scheduling.
//!
//! Ranges only meet through the join block: the first block of every range
//! uses it as its predecessor, and after each pass it becomes the
//! compression of every range's last block, in worker order.

use core::ops::Range;

use zeroize::Zeroizing;

use super::{Strategy, draw_neighbors, expand};
use crate::derivation::balloon::memory::{Half, Memory, block, split_at_block};
use crate::derivation::balloon::params::Options;
use crate::error::Error;
use crate::hash::{Combination, compress};
use crate::rng::RandomStream;
use crate::rng::binomial::RowWeights;

/// Bytes drawn from the main stream to seed each worker.
const WORKER_SEED_LEN: usize = 32;

pub(crate) struct DoublePar {
    src: Half,
    workers: Vec<Worker>,
    join: Zeroizing<Vec<u8>>,
}

struct Worker {
    stream: RandomStream,
    /// Per-block degree sampler, only in XOR mode without a fixed degree.
    weights: Option<RowWeights>,
}

impl DoublePar {
    pub(crate) fn new(
        opts: &Options,
        n_blocks: u64,
        stream: &mut RandomStream,
    ) -> Result<Self, Error> {
        let xor = opts.combination == Combination::Xor;
        if xor && opts.n_neighbors != 0 {
            tracing::warn!(
                n_neighbors = opts.n_neighbors,
                "using a non-standard neighbor count with xor combination"
            );
        }

        let mut workers = Vec::with_capacity(opts.n_threads as usize);
        for idx in 0..opts.n_threads as u16 {
            let mut seed = Zeroizing::new([0u8; WORKER_SEED_LEN]);
            stream.fill_buffer(&mut seed[..])?;

            let mut worker_stream = RandomStream::new();
            worker_stream.seed_add(&seed[..])?;
            worker_stream.seed_add(&idx.to_le_bytes())?;
            worker_stream.seed_finalize()?;

            workers.push(Worker {
                stream: worker_stream,
                weights: (xor && opts.n_neighbors == 0).then(|| RowWeights::new(n_blocks / 2)),
            });
        }

        Ok(Self {
            src: Half::First,
            workers,
            join: Zeroizing::new(vec![0u8; opts.block_size()]),
        })
    }
}

impl Worker {
    fn mix_range(
        &mut self,
        range: &mut [u8],
        src: &[u8],
        join: &[u8],
        bs: usize,
        opts: &Options,
    ) -> Result<(), Error> {
        let half = (src.len() / bs) as u64;
        let mut neighbors = Vec::new();

        for j in 0..range.len() / bs {
            let degree = match &self.weights {
                Some(weights) => weights.sample(&mut self.stream)? as usize,
                None => opts.n_neighbors as usize,
            };
            draw_neighbors(&mut self.stream, &mut neighbors, degree, half, opts)?;

            let (done, cur) = split_at_block(range, bs, j);
            let prev = if j == 0 { join } else { block(done, bs, j - 1) };

            let mut blocks = Vec::with_capacity(neighbors.len() + 1);
            blocks.push(prev);
            blocks.extend(neighbors.iter().map(|&n| block(src, bs, n as usize)));

            compress(cur, &blocks, opts.combination, opts.primitive)?;
        }

        Ok(())
    }
}

/// Block ranges of one half, one per worker; the last takes the remainder.
fn worker_ranges(half: usize, n_workers: usize) -> Vec<Range<usize>> {
    let per = half / n_workers;
    (0..n_workers)
        .map(|t| {
            let end = if t + 1 == n_workers { half } else { (t + 1) * per };
            t * per..end
        })
        .collect()
}

fn split_ranges<'a>(
    mut span: &'a mut [u8],
    ranges: &[Range<usize>],
    bs: usize,
) -> Vec<&'a mut [u8]> {
    let mut chunks = Vec::with_capacity(ranges.len());
    for range in ranges {
        let (head, tail) = core::mem::take(&mut span).split_at_mut(range.len() * bs);
        chunks.push(head);
        span = tail;
    }
    chunks
}

/// Runs every job on its own scoped thread and returns the first error in
/// job order. A panicking job becomes [`Error::Thread`].
fn run_workers<F>(jobs: Vec<F>) -> Result<(), Error>
where
    F: FnOnce() -> Result<(), Error> + Send,
{
    std::thread::scope(|scope| {
        let handles: Vec<_> = jobs.into_iter().map(|job| scope.spawn(job)).collect();

        let mut result = Ok(());
        for handle in handles {
            let outcome = handle.join().unwrap_or(Err(Error::Thread));
            if result.is_ok() {
                result = outcome;
            }
        }
        result
    })
}

impl Strategy for DoublePar {
    fn fill(
        &mut self,
        mem: &mut Memory,
        _opts: &Options,
        password: &[u8],
        salt: &[u8],
    ) -> Result<(), Error> {
        let bs = mem.block_size();
        let half = mem.half_blocks();
        let ranges = worker_ranges(half, self.workers.len());

        let chunks = split_ranges(mem.half_mut(self.src), &ranges, bs);
        let jobs: Vec<_> = chunks
            .into_iter()
            .enumerate()
            .map(|(idx, chunk)| {
                move || expand(chunk, &[password, salt, &(idx as u16).to_le_bytes()[..]])
            })
            .collect();
        run_workers(jobs)?;

        self.join.copy_from_slice(block(mem.half(self.src), bs, half - 1));
        Ok(())
    }

    fn mix(
        &mut self,
        mem: &mut Memory,
        opts: &Options,
        _stream: &mut RandomStream,
    ) -> Result<(), Error> {
        let bs = mem.block_size();
        let half = mem.half_blocks();
        let ranges = worker_ranges(half, self.workers.len());

        {
            let (src, dst) = mem.split(self.src);
            let join: &[u8] = &self.join;
            let jobs: Vec<_> = split_ranges(dst, &ranges, bs)
                .into_iter()
                .zip(self.workers.iter_mut())
                .map(|(chunk, worker)| move || worker.mix_range(chunk, src, join, bs, opts))
                .collect();
            run_workers(jobs)?;
        }

        let dst = mem.half(self.src.other());
        let lasts: Vec<&[u8]> = ranges.iter().map(|r| block(dst, bs, r.end - 1)).collect();
        compress(&mut self.join[..], &lasts, opts.combination, opts.primitive)?;

        self.src = self.src.other();
        Ok(())
    }

    fn extract(&self, mem: &Memory, _opts: &Options, out: &mut [u8]) -> Result<(), Error> {
        expand(out, &[mem.half(self.src)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_cover_the_half() {
        let ranges = worker_ranges(16, 3);
        assert_eq!(ranges, vec![0..5, 5..10, 10..16]);

        let ranges = worker_ranges(16, 1);
        assert_eq!(ranges, vec![0..16]);
    }

    #[test]
    fn first_error_wins_in_job_order() {
        let jobs: Vec<Box<dyn FnOnce() -> Result<(), Error> + Send>> = vec![
            Box::new(|| Ok(())),
            Box::new(|| Err(Error::MaxTooSmall)),
            Box::new(|| Err(Error::Entropy)),
        ];
        assert_eq!(run_workers(jobs), Err(Error::MaxTooSmall));
    }
}
