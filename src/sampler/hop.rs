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

use rand::Rng;

use crate::{
    config::Fanout,
    error::SampleError,
    iter::{IteratorReservoirSamplingExt, RangeWithReplacementExt},
    remap::NodeRemapper,
    CSR,
};

/// Select edge positions around every vertex of `dst_nodes` and register the
/// neighbors they reach in `remap`.
///
/// Every vertex of `dst_nodes` must already have a local id. The returned
/// positions index [`CSR::edges`] and are grouped by destination, in the order
/// of `dst_nodes`.
pub fn sample_hop<R>(
    csr: &CSR,
    dst_nodes: &[u32],
    fanout: Fanout,
    replace: bool,
    remap: &mut NodeRemapper,
    rng: &mut R,
) -> Result<Vec<usize>, SampleError>
where
    R: Rng + ?Sized,
{
    // grown per row, a fanout may be far larger than any degree
    let mut e_ids = Vec::new();
    let mut scratch = Vec::new();

    for &v in dst_nodes {
        let row = csr.neighbors_of(v).ok_or(SampleError::UnknownNode {
            vertex: v,
            num_nodes: csr.order(),
        })?;

        let start = e_ids.len();

        match fanout {
            Fanout::All => e_ids.extend(row),
            Fanout::Sample(k) if replace => {
                if k == 0 {
                    continue;
                }
                let draws = row
                    .sample_with_replacement(rng, k)
                    .ok_or(SampleError::EmptyNeighborhood { vertex: v })?;
                e_ids.extend(draws);
            }
            Fanout::Sample(k) if k >= row.len() => e_ids.extend(row),
            Fanout::Sample(k) => {
                scratch.clear();
                row.reservoir_sample_into(rng, k, &mut scratch);
                e_ids.extend_from_slice(&scratch[..]);
            }
        }

        let edges = csr.edges();
        for &e in &e_ids[start..] {
            remap.get_or_assign(edges[e][1]);
        }
    }

    Ok(e_ids)
}

#[cfg(test)]
mod tests
{
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

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

    fn star(degree: u32) -> CSR
    {
        CSR::from_edges(degree as usize + 1, (1..=degree).map(|u| [0, u]).collect()).unwrap()
    }

    fn seeded(dst: &[u32]) -> NodeRemapper
    {
        let mut remap = NodeRemapper::new();
        remap.extend(dst.iter().copied());
        remap
    }

    #[test]
    fn all_takes_every_row_edge_in_order()
    {
        let csr = toy();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut remap = seeded(&[2, 0]);
        let e_ids = sample_hop(&csr, &[2, 0], Fanout::All, true, &mut remap, &mut rng).unwrap();
        assert_eq!(vec![3, 4, 0, 1], e_ids);
        assert_eq!(&[2, 0, 1], remap.keys_in_order());
    }

    #[test]
    fn without_replacement_caps_at_degree()
    {
        let csr = toy();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut remap = seeded(&[1]);
        let e_ids = sample_hop(&csr, &[1], Fanout::Sample(2), false, &mut remap, &mut rng).unwrap();
        assert_eq!(vec![2], e_ids);
        assert_eq!(&[1, 2], remap.keys_in_order());
    }

    #[test]
    fn without_replacement_draws_distinct_positions()
    {
        let csr = star(50);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..50 {
            let mut remap = seeded(&[0]);
            let e_ids = sample_hop(&csr, &[0], Fanout::Sample(10), false, &mut remap, &mut rng).unwrap();
            assert_eq!(10, e_ids.len());
            assert_eq!(10, e_ids.iter().collect::<HashSet<_>>().len());
            assert_eq!(11, remap.len());
        }
    }

    #[test]
    fn with_replacement_draws_exactly_k()
    {
        let csr = toy();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut remap = seeded(&[1]);
        let e_ids = sample_hop(&csr, &[1], Fanout::Sample(5), true, &mut remap, &mut rng).unwrap();
        assert_eq!(vec![2; 5], e_ids);
        assert_eq!(2, remap.len());
    }

    #[test]
    fn with_replacement_rejects_isolated_vertices()
    {
        let csr = toy();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut remap = seeded(&[0, 3]);
        assert_eq!(
            Err(SampleError::EmptyNeighborhood { vertex: 3 }),
            sample_hop(&csr, &[0, 3], Fanout::Sample(1), true, &mut remap, &mut rng)
        );
    }

    #[test]
    fn isolated_vertices_are_fine_without_replacement()
    {
        let csr = toy();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut remap = seeded(&[3]);
        assert!(sample_hop(&csr, &[3], Fanout::Sample(4), false, &mut remap, &mut rng)
            .unwrap()
            .is_empty());
        assert!(sample_hop(&csr, &[3], Fanout::All, true, &mut remap, &mut rng)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn unknown_vertices_are_reported()
    {
        let csr = toy();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut remap = seeded(&[9]);
        assert_eq!(
            Err(SampleError::UnknownNode { vertex: 9, num_nodes: 4 }),
            sample_hop(&csr, &[9], Fanout::All, false, &mut remap, &mut rng)
        );
    }
}
