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

//! Multi-hop neighbor sampling over CSR graphs for mini-batch GNN training.
//!
//! A [`CSR`] holds the graph, a [`NeighborSampler`] expands a batch of seed
//! nodes hop by hop into per-layer [`Adj`] subgraphs, and a [`NeighborLoader`]
//! drives the sampler over a whole seed universe, optionally in parallel.

pub mod config;
pub mod csr;
pub mod error;
pub mod iter;
pub mod loader;
pub mod par;
pub mod remap;
pub mod sampler;

#[cfg(any(feature = "csv", feature = "npy"))]
pub mod io;

pub use config::{Fanout, SamplerConfig};
pub use csr::{CSRBuilder, CSR};
pub use error::{ConfigError, ConstructionError, SampleError};
pub use loader::NeighborLoader;
pub use remap::NodeRemapper;
pub use sampler::{Adj, NeighborSampler, SampleBatch};

/// An edge stored as `[target, neighbor]`.
///
/// Row `target` of a [`CSR`] lists the edges whose first endpoint is `target`,
/// during aggregation the message flows from `neighbor` into `target`.
pub type Edge = [u32; 2];

pub const EDGE_BYTES: usize = std::mem::size_of::<Edge>();
