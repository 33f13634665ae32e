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

//! Compressed Sparse Row representation of directed graphs. Row `v` holds the
//! edges `[v, u]` whose messages flow from `u` into `v`.

use std::{cmp, ops::Range};

use rayon::prelude::*;
use tracing::debug;

use crate::{error::ConstructionError, par as rpar, Edge, EDGE_BYTES};

mod par;

pub struct CSRBuilder
{
    num_threads: usize,
    num_nodes: Option<usize>,
}

impl CSRBuilder
{
    pub fn new() -> Self
    {
        Self {
            num_threads: num_cpus::get(),
            num_nodes: None,
        }
    }

    pub fn num_threads(self, num_threads: usize) -> Self
    {
        Self {
            num_threads,
            num_nodes: self.num_nodes,
        }
    }

    /// Fix the number of vertices. Without it the graph has one vertex more
    /// than the largest endpoint seen.
    pub fn num_nodes(self, num_nodes: usize) -> Self
    {
        Self {
            num_threads: self.num_threads,
            num_nodes: Some(num_nodes),
        }
    }

    pub fn build<I>(self, iter: I) -> Result<CSR, ConstructionError>
    where
        I: IntoIterator<Item = Edge>,
    {
        let edges: Vec<Edge> = iter.into_iter().collect();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build()?;

        pool.install(move || {
            let num_nodes = match self.num_nodes {
                Some(n) => n,
                None => rpar::max(edges.par_iter().map(|&[v, u]| cmp::max(v, u)))
                    .map_or(0, |v| v as usize + 1),
            };
            CSR::from_edges(num_nodes, edges)
        })
    }
}

impl Default for CSRBuilder
{
    fn default() -> Self
    {
        Self::new()
    }
}

/// The Compressed Sparse Row struct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CSR
{
    rowptr: Vec<usize>,
    edges: Vec<Edge>,
}

impl CSR
{
    /// An empty graph without vertices.
    pub fn new() -> Self
    {
        Self {
            rowptr: vec![0],
            edges: vec![],
        }
    }

    /// Wrap an existing row pointer and edge array after checking that they
    /// describe a well formed CSR.
    ///
    /// # Examples
    ///
    /// ```
    /// use glsample_core::csr::CSR;
    ///
    /// let csr = CSR::from_parts(
    ///     4,
    ///     vec![0, 2, 3, 5, 5],
    ///     vec![[0, 1], [0, 2], [1, 2], [2, 0], [2, 1]],
    /// ).unwrap();
    ///
    /// assert_eq!(Some(3..5), csr.neighbors_of(2));
    /// assert_eq!(vec![0, 1], csr.neighbors(2).collect::<Vec<_>>());
    ///
    /// assert!(CSR::from_parts(4, vec![0, 2, 1, 5, 5], vec![[0, 1]; 5]).is_err());
    /// ```
    pub fn from_parts(num_nodes: usize, rowptr: Vec<usize>, edges: Vec<Edge>) -> Result<Self, ConstructionError>
    {
        if num_nodes > u32::MAX as usize {
            return Err(ConstructionError::TooManyVertices);
        }

        if rowptr.len() != num_nodes + 1 {
            return Err(ConstructionError::RowPtrLength {
                num_nodes,
                expected: num_nodes + 1,
                got: rowptr.len(),
            });
        }

        if rowptr[0] != 0 {
            return Err(ConstructionError::RowPtrStart(rowptr[0]));
        }

        if let Some((vertex, win)) = rowptr.windows(2).enumerate().find(|(_, win)| win[0] > win[1]) {
            return Err(ConstructionError::NonMonotonic {
                vertex,
                prev: win[0],
                next: win[1],
            });
        }

        if rowptr[num_nodes] != edges.len() {
            return Err(ConstructionError::EdgeCountMismatch {
                end: rowptr[num_nodes],
                num_edges: edges.len(),
            });
        }

        if let Some((position, vertex)) = edges
            .iter()
            .enumerate()
            .flat_map(|(i, e)| e.iter().map(move |&v| (i, v)))
            .find(|&(_, v)| v as usize >= num_nodes)
        {
            return Err(ConstructionError::VertexOutOfRange {
                position,
                vertex,
                num_nodes,
            });
        }

        debug!(num_nodes, num_edges = edges.len(), "csr constructed");

        Ok(Self { rowptr, edges })
    }

    /// Group an unsorted edge list into rows. Within a row, edges keep the
    /// order they had in `edges`.
    ///
    /// # Examples
    ///
    /// ```
    /// use glsample_core::csr::CSR;
    ///
    /// let csr = CSR::from_edges(4, vec![
    ///     [2, 0],
    ///     [0, 1],
    ///     [1, 2],
    ///     [0, 2],
    ///     [2, 1],
    /// ]).unwrap();
    ///
    /// assert_eq!(&[0, 2, 3, 5, 5], csr.rowptr());
    /// assert_eq!(vec![1, 2], csr.neighbors(0).collect::<Vec<_>>());
    /// assert_eq!(0, csr.degree(3));
    /// ```
    pub fn from_edges(num_nodes: usize, mut edges: Vec<Edge>) -> Result<Self, ConstructionError>
    {
        if num_nodes > u32::MAX as usize {
            return Err(ConstructionError::TooManyVertices);
        }

        if let Some((position, &[v, u])) = edges
            .iter()
            .enumerate()
            .find(|(_, [v, u])| *v as usize >= num_nodes || *u as usize >= num_nodes)
        {
            return Err(ConstructionError::VertexOutOfRange {
                position,
                vertex: if v as usize >= num_nodes { v } else { u },
                num_nodes,
            });
        }

        let rowptr = par::edgelist_to_rowptr(num_nodes, &mut edges[..]);

        debug!(num_nodes, num_edges = edges.len(), "csr built from edge list");

        Ok(Self { rowptr, edges })
    }

    /// The number of vertices in the graph.
    pub fn order(&self) -> usize
    {
        self.rowptr.len() - 1
    }

    /// The number of edges in the graph.
    pub fn size(&self) -> usize
    {
        self.edges.len()
    }

    pub fn rowptr(&self) -> &[usize]
    {
        &self.rowptr[..]
    }

    pub fn edges(&self) -> &[Edge]
    {
        &self.edges[..]
    }

    /// The half-open range of positions in [`CSR::edges`] holding the edges
    /// of `vertex`, or `None` if the vertex is not in the graph.
    #[inline]
    pub fn neighbors_of(&self, vertex: u32) -> Option<Range<usize>>
    {
        let i = vertex as usize;
        let start = *self.rowptr.get(i)?;
        let end = *self.rowptr.get(i + 1)?;
        Some(start..end)
    }

    pub fn degree(&self, vertex: u32) -> usize
    {
        self.neighbors_of(vertex).map_or(0, |r| r.len())
    }

    /// The neighbors of a vertex, in row order.
    pub fn neighbors(&self, vertex: u32) -> impl Iterator<Item = u32> + '_
    {
        self.neighbors_of(vertex)
            .into_iter()
            .flat_map(move |r| self.edges[r].iter().map(|&[_, u]| u))
    }

    pub fn nbytes(&self) -> usize
    {
        let mut bytes = std::mem::size_of_val(self);
        bytes += std::mem::size_of_val(&self.rowptr[..]);
        bytes += self.edges.len() * EDGE_BYTES;
        bytes
    }
}

impl Default for CSR
{
    fn default() -> Self
    {
        Self::new()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn toy() -> CSR
    {
        CSR::from_parts(
            4,
            vec![0, 2, 3, 5, 5],
            vec![[0, 1], [0, 2], [1, 2], [2, 0], [2, 1]],
        )
        .unwrap()
    }

    #[test]
    fn neighbor_ranges()
    {
        let csr = toy();
        assert_eq!(4, csr.order());
        assert_eq!(5, csr.size());
        assert_eq!(Some(0..2), csr.neighbors_of(0));
        assert_eq!(Some(2..3), csr.neighbors_of(1));
        assert_eq!(Some(5..5), csr.neighbors_of(3));
        assert_eq!(None, csr.neighbors_of(4));
        assert_eq!(0, csr.degree(4));
        assert_eq!(vec![2], csr.neighbors(1).collect::<Vec<_>>());
        assert!(csr.neighbors(9).next().is_none());
    }

    #[test]
    fn rejects_wrong_rowptr_length()
    {
        let err = CSR::from_parts(3, vec![0, 1], vec![[0, 1]]).unwrap_err();
        assert!(matches!(
            err,
            ConstructionError::RowPtrLength { num_nodes: 3, expected: 4, got: 2 }
        ));
    }

    #[test]
    fn rejects_non_monotonic_rowptr()
    {
        let err = CSR::from_parts(3, vec![0, 2, 1, 2], vec![[0, 1], [0, 2]]).unwrap_err();
        assert!(matches!(
            err,
            ConstructionError::NonMonotonic { vertex: 1, prev: 2, next: 1 }
        ));
    }

    #[test]
    fn rejects_bad_start_and_count()
    {
        assert!(matches!(
            CSR::from_parts(1, vec![1, 1], vec![[0, 0]]),
            Err(ConstructionError::RowPtrStart(1))
        ));
        assert!(matches!(
            CSR::from_parts(2, vec![0, 1, 1], vec![[0, 1], [1, 0]]),
            Err(ConstructionError::EdgeCountMismatch { end: 1, num_edges: 2 })
        ));
    }

    #[test]
    fn rejects_out_of_range_endpoints()
    {
        assert!(matches!(
            CSR::from_parts(2, vec![0, 1, 1], vec![[0, 5]]),
            Err(ConstructionError::VertexOutOfRange { position: 0, vertex: 5, num_nodes: 2 })
        ));
        assert!(matches!(
            CSR::from_edges(2, vec![[0, 1], [3, 0]]),
            Err(ConstructionError::VertexOutOfRange { position: 1, vertex: 3, num_nodes: 2 })
        ));
    }

    #[test]
    fn empty_graph()
    {
        let csr = CSR::new();
        assert_eq!(0, csr.order());
        assert_eq!(0, csr.size());
        assert_eq!(csr, CSR::from_edges(0, vec![]).unwrap());
    }

    #[test]
    fn from_edges_is_stable_within_rows()
    {
        let csr = CSR::from_edges(3, vec![[1, 2], [0, 2], [1, 0], [0, 1], [1, 1]]).unwrap();
        assert_eq!(&[0, 2, 5, 5], csr.rowptr());
        assert_eq!(&[[0, 2], [0, 1], [1, 2], [1, 0], [1, 1]], csr.edges());
    }

    #[test]
    fn builder_infers_vertex_count()
    {
        let csr = CSRBuilder::new()
            .num_threads(2)
            .build(vec![[0, 4], [2, 1]])
            .unwrap();
        assert_eq!(5, csr.order());
        assert_eq!(vec![4], csr.neighbors(0).collect::<Vec<_>>());

        let csr = CSRBuilder::new().num_nodes(8).build(vec![[0, 4]]).unwrap();
        assert_eq!(8, csr.order());

        let csr = CSRBuilder::new().build(Vec::new()).unwrap();
        assert_eq!(0, csr.order());
    }

    #[test]
    fn builder_matches_from_edges_on_larger_graphs()
    {
        let edges: Vec<Edge> = (0..20_000u32).map(|i| [(i * 7919) % 997, (i * 31) % 997]).collect();
        let a = CSRBuilder::new().num_threads(4).num_nodes(997).build(edges.clone()).unwrap();
        let b = CSR::from_edges(997, edges).unwrap();
        assert_eq!(a, b);
        assert_eq!(20_000, a.size());
        assert!(a.edges().windows(2).all(|w| w[0][0] <= w[1][0]));
    }
}
