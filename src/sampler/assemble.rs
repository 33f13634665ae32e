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

use super::Adj;
use crate::{error::SampleError, remap::NodeRemapper, CSR};

/// Renumber the edges at `e_ids` into local ids.
///
/// Each edge `[target, neighbor]` becomes `[local(neighbor), local(target)]`,
/// i.e. gather from the first id and reduce into the second.
pub fn assemble(csr: &CSR, remap: &NodeRemapper, e_ids: &[usize], num_dst: usize) -> Result<Adj, SampleError>
{
    let edges = csr.edges();
    let local = |vertex: u32, position: usize| {
        remap
            .get(vertex)
            .ok_or(SampleError::UnresolvedNode { vertex, position })
    };

    let edge = e_ids
        .iter()
        .map(|&e| {
            let [target, neighbor] = edges[e];
            Ok([local(neighbor, e)?, local(target, e)?])
        })
        .collect::<Result<Vec<_>, SampleError>>()?;

    Ok(Adj {
        edge,
        size: (remap.len(), num_dst),
    })
}
