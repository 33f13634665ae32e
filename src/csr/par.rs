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

use rayon::prelude::*;

use crate::{par as rpar, Edge};

/// Sorts `edgelist` by target in place and returns the matching row pointer.
/// Every endpoint must already be `< num_nodes`.
pub(super) fn edgelist_to_rowptr(num_nodes: usize, edgelist: &mut [Edge]) -> Vec<usize>
{
    // stable, row order is the input order
    edgelist.par_sort_by_key(|&[v, _]| v);

    let mut rowptr = vec![0usize; num_nodes + 1];

    // one run per non-empty row
    let runs: Vec<(u32, usize)> = rpar::chunk_by(edgelist, |[u, _], [v, _]| u == v)
        .map(|run| (run[0][0], run.len()))
        .collect();

    for (v, degree) in runs {
        rowptr[v as usize + 1] = degree;
    }

    for v in 0..num_nodes {
        rowptr[v + 1] += rowptr[v];
    }

    rowptr
}
