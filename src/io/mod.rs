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

//! Getting graphs off disk: `.csv` / `.csv.gz` edge lists behind the `csv`
//! feature, `.npy` row pointer and edge arrays behind the `npy` feature.

pub use crate::error::LoadError;

#[cfg(feature = "csv")]
mod csv;

#[cfg(feature = "npy")]
pub mod npy;

#[cfg(feature = "csv")]
pub use self::csv::Iter;

/// Stream the edges of a `.csv` or `.csv.gz` file, one `target,neighbor`
/// pair per line.
#[cfg(feature = "csv")]
pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Iter, LoadError>
{
    csv::load(path)
}

/// Load an edge list with [`load`] and group it into a CSR.
#[cfg(feature = "csv")]
pub fn load_csr<P: AsRef<std::path::Path>>(path: P, num_nodes: Option<usize>) -> Result<crate::CSR, LoadError>
{
    let edges = load(path)?.collect::<Result<Vec<_>, _>>()?;
    let builder = crate::CSRBuilder::new();
    let builder = match num_nodes {
        Some(n) => builder.num_nodes(n),
        None => builder,
    };
    Ok(builder.build(edges)?)
}
