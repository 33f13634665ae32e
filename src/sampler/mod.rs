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

//! GraphSAGE style multi-hop neighbor sampling.
//!
//! Starting from a batch of seed vertices every hop samples the neighbors of
//! all vertices discovered so far. Hops are handed out in reverse sampling
//! order: `adjs[0]` is the widest hop, the one the first message passing layer
//! consumes, and the last entry reduces into the seeds.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{config::Fanout, error::SampleError, remap::NodeRemapper, SamplerConfig, CSR};

mod assemble;
mod hop;

pub use assemble::assemble;
pub use hop::sample_hop;

/// One hop of a sampled batch in local ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adj
{
    edge: Vec<[u32; 2]>,
    size: (usize, usize),
}

impl Adj
{
    /// `[src, dst]` pairs: messages are gathered from `src` and reduced into
    /// `dst`.
    pub fn edge(&self) -> &[[u32; 2]]
    {
        &self.edge[..]
    }

    /// `(num_src, num_dst)`. The destinations are the first `num_dst` sources.
    pub fn size(&self) -> (usize, usize)
    {
        self.size
    }

    pub fn num_src(&self) -> usize
    {
        self.size.0
    }

    pub fn num_dst(&self) -> usize
    {
        self.size.1
    }

    pub fn len(&self) -> usize
    {
        self.edge.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.edge.is_empty()
    }

    pub fn src(&self) -> impl Iterator<Item = u32> + '_
    {
        self.edge.iter().map(|&[s, _]| s)
    }

    pub fn dst(&self) -> impl Iterator<Item = u32> + '_
    {
        self.edge.iter().map(|&[_, d]| d)
    }

    /// The edges as `[sources, destinations]`, the layout gather and scatter
    /// kernels index with.
    pub fn edge_index(&self) -> [Vec<u32>; 2]
    {
        [self.src().collect(), self.dst().collect()]
    }

    pub fn into_parts(self) -> (Vec<[u32; 2]>, (usize, usize))
    {
        (self.edge, self.size)
    }
}

/// Everything a training step needs for one batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleBatch
{
    /// The batch as it was given.
    pub seed_nodes: Vec<u32>,
    /// One entry per hop in reverse sampling order.
    pub adjs: Vec<Adj>,
    /// Global ids of every vertex in the batch, indexed by local id.
    pub all_nodes: Vec<u32>,
}

impl SampleBatch
{
    /// Number of distinct seeds, they occupy local ids `0..batch_size`.
    pub fn batch_size(&self) -> usize
    {
        self.adjs
            .last()
            .map_or(self.all_nodes.len(), |adj| adj.num_dst())
    }
}

pub struct NeighborSampler<'a>
{
    csr: &'a CSR,
    fanouts: Vec<Fanout>,
    replace: bool,
}

impl<'a> NeighborSampler<'a>
{
    /// `fanouts` has one entry per hop, the outermost layer first.
    pub fn new(csr: &'a CSR, fanouts: &[Fanout]) -> Self
    {
        Self {
            csr,
            fanouts: fanouts.to_vec(),
            replace: false,
        }
    }

    pub fn from_config(csr: &'a CSR, config: &SamplerConfig) -> Self
    {
        Self::new(csr, &config.fanouts[..]).replace(config.replace)
    }

    pub fn replace(self, replace: bool) -> Self
    {
        Self { replace, ..self }
    }

    pub fn csr(&self) -> &'a CSR
    {
        self.csr
    }

    pub fn fanouts(&self) -> &[Fanout]
    {
        &self.fanouts[..]
    }

    pub fn sample_seeded(&self, batch: &[u32], seed: u64) -> Result<SampleBatch, SampleError>
    {
        self.sample(batch, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn sample<R>(&self, batch: &[u32], rng: &mut R) -> Result<SampleBatch, SampleError>
    where
        R: Rng + ?Sized,
    {
        let mut remap = NodeRemapper::with_capacity(self.capacity_hint(batch.len()));
        remap.extend(batch.iter().copied());

        let mut adjs = Vec::with_capacity(self.fanouts.len());

        for (hop, &fanout) in self.fanouts.iter().enumerate() {
            let dst_nodes = remap.keys_in_order().to_vec();

            let e_ids = sample_hop(self.csr, &dst_nodes[..], fanout, self.replace, &mut remap, rng)?;
            let adj = assemble(self.csr, &remap, &e_ids[..], dst_nodes.len())?;

            debug!(
                hop,
                %fanout,
                num_dst = adj.num_dst(),
                num_src = adj.num_src(),
                num_edges = adj.len(),
                "sampled hop"
            );

            adjs.push(adj);
        }

        adjs.reverse();

        Ok(SampleBatch {
            seed_nodes: batch.to_vec(),
            adjs,
            all_nodes: remap.into_keys(),
        })
    }

    fn capacity_hint(&self, batch_size: usize) -> usize
    {
        self.fanouts
            .iter()
            .try_fold(batch_size, |n, fanout| match fanout {
                Fanout::Sample(k) => k.checked_add(1).and_then(|k| n.checked_mul(k)),
                Fanout::All => None,
            })
            .unwrap_or(batch_size)
            .min(self.csr.order())
    }
}
