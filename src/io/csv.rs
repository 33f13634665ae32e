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

use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    iter::Enumerate,
    path::Path,
};

use flate2::read::GzDecoder;

use super::LoadError;
use crate::Edge;

fn parse_edge(line: usize, row: String) -> Result<Edge, LoadError>
{
    let bad_row = || LoadError::BadRow {
        line,
        row: row.clone(),
    };
    let mut iter = row.split(',');
    let x = iter.next().ok_or_else(bad_row)?;
    let y = iter.next().ok_or_else(bad_row)?;
    if iter.next().is_some() {
        return Err(bad_row());
    }
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|source| LoadError::ParseInt { line, source })
    };
    Ok([parse(x)?, parse(y)?])
}

/// Edges read line by line from a plain or gzipped csv file. Blank lines are
/// skipped, line numbers in errors start at 1.
pub enum Iter
{
    Csv(Enumerate<Lines<BufReader<File>>>),
    CsvGz(Enumerate<Lines<BufReader<GzDecoder<File>>>>),
}

impl Iterator for Iter
{
    type Item = Result<Edge, LoadError>;

    fn next(&mut self) -> Option<Self::Item>
    {
        loop {
            let (i, row) = match self {
                Self::Csv(lines) => lines.next()?,
                Self::CsvGz(lines) => lines.next()?,
            };
            match row {
                Ok(row) if row.trim().is_empty() => continue,
                Ok(row) => break Some(parse_edge(i + 1, row)),
                Err(e) => break Some(Err(e.into())),
            }
        }
    }
}

pub(super) fn load<P: AsRef<Path>>(p: P) -> Result<Iter, LoadError>
{
    let path = p.as_ref();
    let bad_path = || LoadError::BadPath(path.to_path_buf());

    match path.extension() {
        Some(ext) if ext == "csv" => {
            let f = File::open(path)?;
            Ok(Iter::Csv(BufReader::new(f).lines().enumerate()))
        }
        Some(ext) if ext == "gz" => {
            let inner = path
                .file_stem()
                .map(Path::new)
                .and_then(|stem| stem.extension())
                .ok_or_else(bad_path)?;
            if inner == "csv" {
                let f = File::open(path)?;
                Ok(Iter::CsvGz(BufReader::new(GzDecoder::new(f)).lines().enumerate()))
            }
            else {
                Err(bad_path())
            }
        }
        _ => Err(bad_path()),
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn parses_rows()
    {
        assert_eq!([3, 4], parse_edge(1, " 3, 4 ".to_owned()).unwrap());
        assert!(matches!(
            parse_edge(2, "3".to_owned()),
            Err(LoadError::BadRow { line: 2, .. })
        ));
        assert!(matches!(
            parse_edge(3, "3,4,5".to_owned()),
            Err(LoadError::BadRow { line: 3, .. })
        ));
        assert!(matches!(
            parse_edge(4, "3,-4".to_owned()),
            Err(LoadError::ParseInt { line: 4, .. })
        ));
    }

    #[test]
    fn rejects_unknown_extensions()
    {
        assert!(matches!(load("edges.tsv"), Err(LoadError::BadPath(_))));
        assert!(matches!(load("edges.tsv.gz"), Err(LoadError::BadPath(_))));
        assert!(matches!(load("edges"), Err(LoadError::BadPath(_))));
    }
}
