// glsample is a neighbor sampling library for graph learning systems
// Copyright (C) 2022 Jacob Konrad
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Mini-batch iteration over a seed universe.
//!
//! Every batch draws from its own generator keyed by `(seed, epoch, batch)`,
//! so an epoch sampled on a thread pool is identical to the same epoch sampled
//! one batch at a time.

use std::{iter::Enumerate, vec};

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{trace, warn};

use crate::{
    error::{ConfigError, SampleError},
    sampler::{NeighborSampler, SampleBatch},
    SamplerConfig, CSR,
};

const SHUFFLE_DOMAIN: u8 = 0;
const BATCH_DOMAIN: u8 = 1;

pub struct NeighborLoader<'a>
{
    sampler: NeighborSampler<'a>,
    seeds: Vec<u32>,
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    seed: u64,
    pool: rayon::ThreadPool,
}

impl<'a> NeighborLoader<'a>
{
    pub fn new(csr: &'a CSR, seeds: Vec<u32>, config: &SamplerConfig) -> Result<Self, ConfigError>
    {
        config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads.unwrap_or_else(num_cpus::get))
            .build()?;

        Ok(Self {
            sampler: NeighborSampler::from_config(csr, config),
            seeds,
            batch_size: config.batch_size,
            shuffle: config.shuffle,
            drop_last: config.drop_last,
            seed: config.seed.unwrap_or_else(|| rand::thread_rng().gen()),
            pool,
        })
    }

    pub fn sampler(&self) -> &NeighborSampler<'a>
    {
        &self.sampler
    }

    pub fn num_batches(&self) -> usize
    {
        if self.drop_last {
            self.seeds.len() / self.batch_size
        }
        else {
            (self.seeds.len() + self.batch_size - 1) / self.batch_size
        }
    }

    /// The seeds of every batch of `epoch`, in batch order.
    pub fn batches(&self, epoch: u64) -> Vec<Vec<u32>>
    {
        let mut order = self.seeds.clone();

        if self.shuffle {
            order.shuffle(&mut self.rng(SHUFFLE_DOMAIN, epoch, 0));
        }

        order
            .chunks(self.batch_size)
            .take(self.num_batches())
            .map(<[u32]>::to_vec)
            .collect()
    }

    /// Sample the batches of `epoch` lazily, one at a time.
    pub fn iter(&self, epoch: u64) -> Iter<'_, 'a>
    {
        Iter {
            loader: self,
            batches: self.batches(epoch).into_iter().enumerate(),
            epoch,
        }
    }

    /// Sample every batch of `epoch` on the loader's thread pool. A failed
    /// batch only loses its own entry.
    pub fn sample_epoch(&self, epoch: u64) -> Vec<Result<SampleBatch, SampleError>>
    {
        let batches = self.batches(epoch);

        self.pool.install(|| {
            batches
                .par_iter()
                .enumerate()
                .map(|(index, batch)| {
                    let sampled = self.sample_batch(epoch, index, &batch[..]);
                    if let Err(err) = &sampled {
                        warn!(epoch, index, %err, "batch failed");
                    }
                    sampled
                })
                .collect()
        })
    }

    fn sample_batch(&self, epoch: u64, index: usize, batch: &[u32]) -> Result<SampleBatch, SampleError>
    {
        trace!(epoch, index, batch_size = batch.len(), "sampling batch");
        self.sampler
            .sample(batch, &mut self.rng(BATCH_DOMAIN, epoch, index as u64))
    }

    fn rng(&self, domain: u8, epoch: u64, stream: u64) -> ChaCha8Rng
    {
        let mut key = [0u8; 32];
        key[..8].copy_from_slice(&self.seed.to_le_bytes());
        key[8..16].copy_from_slice(&epoch.to_le_bytes());
        key[16] = domain;
        let mut rng = ChaCha8Rng::from_seed(key);
        rng.set_stream(stream);
        rng
    }
}

pub struct Iter<'l, 'a>
{
    loader: &'l NeighborLoader<'a>,
    batches: Enumerate<vec::IntoIter<Vec<u32>>>,
    epoch: u64,
}

impl<'l, 'a> Iterator for Iter<'l, 'a>
{
    type Item = Result<SampleBatch, SampleError>;

    fn next(&mut self) -> Option<Self::Item>
    {
        let (index, batch) = self.batches.next()?;
        Some(self.loader.sample_batch(self.epoch, index, &batch[..]))
    }

    fn size_hint(&self) -> (usize, Option<usize>)
    {
        self.batches.size_hint()
    }
}

impl<'l, 'a> ExactSizeIterator for Iter<'l, 'a> {}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::Fanout;

    fn ring(n: u32) -> CSR
    {
        let edges = (0..n).flat_map(|v| [[v, (v + 1) % n], [v, (v + n - 1) % n]]).collect();
        CSR::from_edges(n as usize, edges).unwrap()
    }

    #[test]
    fn batch_counts()
    {
        let csr = ring(10);
        let config = SamplerConfig::new(vec![Fanout::All]).batch_size(4).seed(1);
        let loader = NeighborLoader::new(&csr, (0..10).collect(), &config).unwrap();
        assert_eq!(3, loader.num_batches());
        assert_eq!(vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7], vec![8, 9]], loader.batches(0));

        let loader = NeighborLoader::new(&csr, (0..10).collect(), &config.drop_last(true)).unwrap();
        assert_eq!(2, loader.num_batches());
        assert_eq!(2, loader.batches(0).len());
    }

    #[test]
    fn shuffle_is_a_permutation_fixed_per_epoch()
    {
        let csr = ring(100);
        let config = SamplerConfig::new(vec![Fanout::All])
            .batch_size(7)
            .shuffle(true)
            .seed(3);
        let loader = NeighborLoader::new(&csr, (0..100).collect(), &config).unwrap();
        let first = loader.batches(0);
        assert_eq!(first, loader.batches(0));
        assert_ne!(first, loader.batches(1));
        let mut seen: Vec<u32> = first.concat();
        seen.sort_unstable();
        assert_eq!((0..100).collect::<Vec<_>>(), seen);
    }

    #[test]
    fn rejects_invalid_config()
    {
        let csr = ring(4);
        let config = SamplerConfig::new(vec![Fanout::All]).batch_size(0);
        assert!(matches!(
            NeighborLoader::new(&csr, vec![0], &config),
            Err(ConfigError::ZeroBatchSize)
        ));
    }
}
