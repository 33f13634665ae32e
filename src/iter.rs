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

use std::ops::Range;

use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};

/// https://en.m.wikipedia.org/wiki/Reservoir_sampling#An_optimal_algorithm
///
/// Draws `min(k, len)` distinct items uniformly. Skips are taken with `nth`,
/// which is constant time on ranges, so sampling edge positions out of a CSR
/// row costs `O(k (1 + log(len / k)))` regardless of the degree.
pub trait IteratorReservoirSamplingExt: Iterator + Sized
{
    fn reservoir_sample<R: Rng + ?Sized>(self, rng: &mut R, k: usize) -> Vec<Self::Item>
    {
        let mut buf = Vec::with_capacity(k.min(self.size_hint().0));
        self.reservoir_sample_into(rng, k, &mut buf);
        buf
    }

    /// Same as `reservoir_sample` but appends to `buf`, so a caller sampling
    /// many rows can reuse one allocation.
    fn reservoir_sample_into<R: Rng + ?Sized>(self, rng: &mut R, k: usize, buf: &mut Vec<Self::Item>);
}

impl<I> IteratorReservoirSamplingExt for I
where
    I: Iterator + Sized,
{
    fn reservoir_sample_into<R: Rng + ?Sized>(mut self, rng: &mut R, k: usize, buf: &mut Vec<Self::Item>)
    {
        if k == 0 {
            return;
        }

        let base = buf.len();

        for _ in 0..k {
            match self.next() {
                Some(x) => buf.push(x),
                None => return,
            }
        }

        let indexing_range = Uniform::new(base, base + k);

        let open_unit_interval = Uniform::new(f64::MIN_POSITIVE, 1.0);

        let k = k as f64;

        let mut w = (open_unit_interval.sample(rng).ln() / k).exp();

        loop {
            let skip = (open_unit_interval.sample(rng).ln() / (1.0 - w).ln()).floor() as usize;
            match self.nth(skip) {
                Some(x) => {
                    buf[indexing_range.sample(rng)] = x;
                    w *= (open_unit_interval.sample(rng).ln() / k).exp()
                }
                None => break,
            }
        }
    }
}

/// `k` positions drawn uniformly with replacement from a range.
pub struct WithReplacement<'r, R: ?Sized>
{
    dist: Uniform<usize>,
    rng: &'r mut R,
    remaining: usize,
}

impl<'r, R> Iterator for WithReplacement<'r, R>
where
    R: Rng + ?Sized,
{
    type Item = usize;

    fn next(&mut self) -> Option<usize>
    {
        if self.remaining == 0 {
            None
        }
        else {
            self.remaining -= 1;
            Some(self.dist.sample(&mut *self.rng))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>)
    {
        (self.remaining, Some(self.remaining))
    }
}

impl<'r, R> ExactSizeIterator for WithReplacement<'r, R> where R: Rng + ?Sized {}

pub trait RangeWithReplacementExt
{
    /// `None` when the range is empty, there is nothing to draw from.
    fn sample_with_replacement<'r, R: Rng + ?Sized>(
        self,
        rng: &'r mut R,
        k: usize,
    ) -> Option<WithReplacement<'r, R>>;
}

impl RangeWithReplacementExt for Range<usize>
{
    fn sample_with_replacement<'r, R: Rng + ?Sized>(
        self,
        rng: &'r mut R,
        k: usize,
    ) -> Option<WithReplacement<'r, R>>
    {
        if self.is_empty() {
            None
        }
        else {
            Some(WithReplacement {
                dist: Uniform::new(self.start, self.end),
                rng,
                remaining: k,
            })
        }
    }
}
