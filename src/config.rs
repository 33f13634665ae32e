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

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How many neighbors to take per vertex in one hop.
///
/// Written as an integer in configuration files: `-1` for every neighbor, a
/// positive `k` for a sample of `k`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Fanout
{
    All,
    Sample(usize),
}

impl TryFrom<i64> for Fanout
{
    type Error = ConfigError;

    fn try_from(k: i64) -> Result<Self, Self::Error>
    {
        match k {
            -1 => Ok(Self::All),
            k if k > 0 => usize::try_from(k)
                .map(Self::Sample)
                .map_err(|_| ConfigError::InvalidFanout(k)),
            k => Err(ConfigError::InvalidFanout(k)),
        }
    }
}

impl From<Fanout> for i64
{
    fn from(fanout: Fanout) -> i64
    {
        match fanout {
            Fanout::All => -1,
            Fanout::Sample(k) => i64::try_from(k).unwrap_or(i64::MAX),
        }
    }
}

impl FromStr for Fanout
{
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<i64>()
            .map_err(|_| ConfigError::BadFanout(s.to_owned()))
            .and_then(Self::try_from)
    }
}

impl fmt::Display for Fanout
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::All => write!(f, "-1"),
            Self::Sample(k) => write!(f, "{}", k),
        }
    }
}

fn default_batch_size() -> usize
{
    512
}

/// Sampler and loader options, usually embedded in a training config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerConfig
{
    /// One entry per hop, outermost layer first.
    pub fanouts: Vec<Fanout>,
    #[serde(default)]
    pub replace: bool,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub drop_last: bool,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub num_threads: Option<usize>,
}

impl SamplerConfig
{
    pub fn new(fanouts: Vec<Fanout>) -> Self
    {
        Self {
            fanouts,
            replace: false,
            batch_size: default_batch_size(),
            shuffle: false,
            drop_last: false,
            seed: None,
            num_threads: None,
        }
    }

    pub fn replace(self, replace: bool) -> Self
    {
        Self { replace, ..self }
    }

    pub fn batch_size(self, batch_size: usize) -> Self
    {
        Self { batch_size, ..self }
    }

    pub fn shuffle(self, shuffle: bool) -> Self
    {
        Self { shuffle, ..self }
    }

    pub fn drop_last(self, drop_last: bool) -> Self
    {
        Self { drop_last, ..self }
    }

    pub fn seed(self, seed: u64) -> Self
    {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    pub fn num_threads(self, num_threads: usize) -> Self
    {
        Self {
            num_threads: Some(num_threads),
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError>
    {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.num_threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        if self.fanouts.contains(&Fanout::Sample(0)) {
            return Err(ConfigError::InvalidFanout(0));
        }
        Ok(())
    }
}
