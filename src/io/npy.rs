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

//! CSR arrays exported with numpy: an `int64[num_nodes + 1]` row pointer and
//! an `int64[num_edges, 2]` edge array, both little endian.

use std::{fs::File, path::Path};

use memmap2::Mmap;
use ndarray::{ArrayView1, ArrayView2};
use ndarray_npy::ViewNpyExt;

use super::LoadError;
use crate::{Edge, CSR};

fn map<P: AsRef<Path>>(path: P) -> Result<Mmap, LoadError>
{
    let file = File::open(path)?;
    // SAFETY: the mapping is read only and does not outlive the loader using it
    let mmap = unsafe { Mmap::map(&file)? };
    Ok(mmap)
}

fn to_usize(array: &'static str, index: usize, value: i64) -> Result<usize, LoadError>
{
    usize::try_from(value).map_err(|_| LoadError::ValueOutOfRange { array, index, value })
}

fn to_u32(array: &'static str, index: usize, value: i64) -> Result<u32, LoadError>
{
    u32::try_from(value).map_err(|_| LoadError::ValueOutOfRange { array, index, value })
}

pub fn load_rowptr<P: AsRef<Path>>(path: P) -> Result<Vec<usize>, LoadError>
{
    let mmap = map(path)?;
    let view = ArrayView1::<i64>::view_npy(&mmap[..])?;
    view.iter()
        .enumerate()
        .map(|(i, &x)| to_usize("rowptr", i, x))
        .collect()
}

pub fn load_edges<P: AsRef<Path>>(path: P) -> Result<Vec<Edge>, LoadError>
{
    let mmap = map(path)?;
    let view = ArrayView2::<i64>::view_npy(&mmap[..])?;
    if view.ncols() != 2 {
        return Err(LoadError::EdgeShape(view.shape().to_vec()));
    }
    view.rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| -> Result<Edge, LoadError> {
            Ok([to_u32("edge_index", i, row[0])?, to_u32("edge_index", i, row[1])?])
        })
        .collect()
}

/// Load and validate a CSR; the vertex count is `rowptr.len() - 1`.
pub fn load_csr<P, Q>(rowptr: P, edge_index: Q) -> Result<CSR, LoadError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let rowptr = load_rowptr(rowptr)?;
    let edges = load_edges(edge_index)?;
    let num_nodes = rowptr.len().saturating_sub(1);
    Ok(CSR::from_parts(num_nodes, rowptr, edges)?)
}
