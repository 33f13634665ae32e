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

use thiserror::Error;

/// A malformed CSR adjacency. Raised at construction, never recovered.
#[derive(Debug, Error)]
pub enum ConstructionError
{
    #[error("row pointer has {got} entries, expected {expected} for {num_nodes} vertices")]
    RowPtrLength {
        num_nodes: usize,
        expected: usize,
        got: usize,
    },
    #[error("row pointer must start at 0, found {0}")]
    RowPtrStart(usize),
    #[error("row pointer decreases at vertex {vertex}: {prev} > {next}")]
    NonMonotonic {
        vertex: usize,
        prev: usize,
        next: usize,
    },
    #[error("row pointer ends at {end} but there are {num_edges} edges")]
    EdgeCountMismatch {
        end: usize,
        num_edges: usize,
    },
    #[error("edge {position} references vertex {vertex}, the graph has {num_nodes} vertices")]
    VertexOutOfRange {
        position: usize,
        vertex: u32,
        num_nodes: usize,
    },
    #[error("too many vertices, cannot handle more than {} vertices", u32::MAX)]
    TooManyVertices,
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A failure while sampling one batch. Only that batch's record is lost.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError
{
    #[error("cannot sample with replacement from vertex {vertex}, it has no neighbors")]
    EmptyNeighborhood {
        vertex: u32,
    },
    #[error("endpoint {vertex} of edge {position} has no local index")]
    UnresolvedNode {
        vertex: u32,
        position: usize,
    },
    #[error("vertex {vertex} is not in the graph, which has {num_nodes} vertices")]
    UnknownNode {
        vertex: u32,
        num_nodes: usize,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError
{
    #[error("invalid fanout {0}, expected -1 or a positive integer")]
    InvalidFanout(i64),
    #[error("cannot parse fanout {0:?}")]
    BadFanout(String),
    #[error("batch size must be positive")]
    ZeroBatchSize,
    #[error("number of threads must be positive")]
    ZeroThreads,
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[cfg(any(feature = "csv", feature = "npy"))]
#[derive(Debug, Error)]
pub enum LoadError
{
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("bad path: {0:?}")]
    BadPath(std::path::PathBuf),
    #[error("bad row {line}: {row:?}")]
    BadRow {
        line: usize,
        row: String,
    },
    #[error("bad row {line}: {source}")]
    ParseInt {
        line: usize,
        source: std::num::ParseIntError,
    },
    #[error("{array} holds {value} at index {index}, which does not fit")]
    ValueOutOfRange {
        array: &'static str,
        index: usize,
        value: i64,
    },
    #[error("expected an edge array of shape [num_edges, 2], found {0:?}")]
    EdgeShape(Vec<usize>),
    #[cfg(feature = "npy")]
    #[error(transparent)]
    Npy(#[from] ndarray_npy::ViewNpyError),
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}
