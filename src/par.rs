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

//! Parallel run grouping and reductions used to assemble CSR row pointers.

use rayon::{iter::plumbing::*, prelude::*};

// Searches outward from the middle for the first position where two
// neighbouring elements belong to different chunks.
fn find_boundary<T, F>(xs: &[T], pred: &F) -> Option<usize>
where
    F: Fn(&T, &T) -> bool,
{
    let n = xs.len() / 2;

    for (start, end) in (0u32..).scan(true, |cont, i| {
        if *cont {
            let offset = 1usize << i;
            let start = n.saturating_sub(offset);
            let end = n + offset;
            Some(
                if !(1..xs.len()).contains(&start) || !(2..xs.len()).contains(&end) {
                    *cont = false;
                    (0, xs.len())
                }
                else {
                    (start, end)
                },
            )
        }
        else {
            None
        }
    }) {
        if let Some(i) = xs[start..end]
            .windows(2)
            .position(|win| !pred(&win[0], &win[1]))
        {
            return Some(start + i);
        }
    }
    None
}

struct ChunkByProducer<'data, 'p, T, P>
{
    pred: &'p P,
    slice: &'data [T],
}

impl<'data, 'p, T, P> UnindexedProducer for ChunkByProducer<'data, 'p, T, P>
where
    T: Sync,
    P: Fn(&T, &T) -> bool + Send + Sync,
{
    type Item = &'data [T];

    fn split(self) -> (Self, Option<Self>)
    {
        match find_boundary(self.slice, self.pred) {
            Some(i) => {
                let (ys, zs) = self.slice.split_at(i + 1);
                (
                    Self {
                        pred: self.pred,
                        slice: ys,
                    },
                    Some(Self {
                        pred: self.pred,
                        slice: zs,
                    }),
                )
            }
            None => (self, None),
        }
    }

    fn fold_with<F>(self, folder: F) -> F
    where
        F: Folder<Self::Item>,
    {
        folder.consume_iter(self.slice.chunk_by(self.pred))
    }
}

/// Parallel counterpart of [`slice::chunk_by`]: runs of consecutive elements
/// for which `pred` holds pairwise. Splits only happen on chunk boundaries, so
/// no run is ever cut in two.
pub struct ChunkBy<'data, T, F>
where
    T: Sync,
    F: Fn(&T, &T) -> bool + Send + Sync,
{
    pred: F,
    slice: &'data [T],
}

impl<'data, T, F> ParallelIterator for ChunkBy<'data, T, F>
where
    T: Sync,
    F: Fn(&T, &T) -> bool + Send + Sync,
{
    type Item = &'data [T];

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        bridge_unindexed(
            ChunkByProducer {
                pred: &self.pred,
                slice: self.slice,
            },
            consumer,
        )
    }
}

pub fn chunk_by<T, F>(slice: &[T], pred: F) -> ChunkBy<'_, T, F>
where
    T: Sync,
    F: Fn(&T, &T) -> bool + Sync + Send,
{
    ChunkBy { slice, pred }
}

pub fn max<T, I>(xs: I) -> Option<T>
where
    T: Ord + Copy + Sync + Send,
    I: IntoParallelIterator<Item = T>,
{
    xs.into_par_iter().max()
}
