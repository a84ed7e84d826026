//! Instance reader.
//!
//! # Format
//!
//! ```text
//! <visits> <start>
//! <group name>            \
//! <region> <region> ...   / repeated <visits> times
//! <from> <to> <day> <cost>  (any number of lines)
//! ```
//!
//! Day `0` marks a cost that applies on every day without its own entry.
//! Blank lines are skipped anywhere.

use crate::error::ParseError;
use crate::model::{CostTableBuilder, Instance, RegionGroups, RegionId, RegionIndex};
use rayon::prelude::*;
use std::io::BufRead;
use std::str::FromStr;

/// Cost lines handed to one parallel task.
const COST_CHUNK: usize = 4096;

/// Reads a full instance from `reader`.
///
/// Cost lines are parsed in parallel. Lines naming a region that is neither
/// the start nor a member of some group are skipped: no route can use them.
pub fn parse_instance<R: BufRead>(reader: R) -> Result<Instance, ParseError> {
    let mut lines = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push((i + 1, line));
        }
    }
    let mut lines = lines.into_iter();

    let (header_no, header) = lines.next().ok_or(ParseError::MissingHeader)?;
    let mut fields = header.split_whitespace();
    let (visits, start) = match (fields.next(), fields.next(), fields.next()) {
        (Some(visits), Some(start), None) => (number::<usize>(header_no, visits)?, start),
        _ => {
            return Err(ParseError::MalformedLine {
                line: header_no,
                expected: "`<visits> <start>`",
                content: header.clone(),
            })
        }
    };

    let mut regions = RegionIndex::new();
    let mut groups = RegionGroups::new();
    let start = regions.intern(start);

    for found in 0..visits {
        let truncated = || ParseError::TruncatedGroups {
            expected: visits,
            found,
        };
        let (_, name) = lines.next().ok_or_else(truncated)?;
        let (_, members) = lines.next().ok_or_else(truncated)?;
        let members: Vec<RegionId> = members
            .split_whitespace()
            .map(|m| regions.intern(m))
            .collect();
        groups.add_region(name.trim(), &members);
    }

    let cost_lines: Vec<(usize, String)> = lines.collect();
    let builder = CostTableBuilder::new();
    cost_lines.par_chunks(COST_CHUNK).try_for_each(|chunk| {
        let mut batch = Vec::with_capacity(chunk.len());
        for (no, line) in chunk {
            if let Some(entry) = cost_entry(&regions, *no, line)? {
                batch.push(entry);
            }
        }
        builder.add_costs(batch);
        Ok::<(), ParseError>(())
    })?;
    let costs = builder.build();

    log::debug!(
        "parsed {} groups, {} regions, {} cost entries",
        groups.len(),
        groups.total_regions(),
        costs.len()
    );

    Ok(Instance {
        total_regions: groups.total_regions(),
        required_visits: visits,
        regions,
        groups,
        costs,
        start,
    })
}

fn cost_entry(
    regions: &RegionIndex,
    no: usize,
    line: &str,
) -> Result<Option<(RegionId, RegionId, u32, i64)>, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [from, to, day, cost] = fields.as_slice() else {
        return Err(ParseError::MalformedLine {
            line: no,
            expected: "`<from> <to> <day> <cost>`",
            content: line.to_owned(),
        });
    };
    let day = number::<u32>(no, day)?;
    let cost = number::<i64>(no, cost)?;
    Ok(match (regions.get(from), regions.get(to)) {
        (Some(from), Some(to)) => Some((from, to, day, cost)),
        _ => None,
    })
}

fn number<T: FromStr>(line: usize, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        line,
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
3 PRG
cz
PRG BRQ
de
TXL MUC

es
BCN
PRG TXL 1 100
PRG MUC 1 80
TXL BCN 2 50
MUC BCN 0 70
BCN PRG 3 40
PRG OSL 1 5
";

    #[test]
    fn test_parse_sample() {
        let instance = parse_instance(SAMPLE.as_bytes()).unwrap();
        let id = |n: &str| instance.regions.get(n).unwrap();

        assert_eq!(instance.required_visits, 3);
        assert_eq!(instance.total_regions, 5);
        assert!(instance.is_multi_zone());
        assert_eq!(instance.regions.name(instance.start), "PRG");
        assert_eq!(instance.groups.group_of(id("MUC")), Some("de"));
        assert_eq!(instance.costs.get_cost(id("PRG"), id("TXL"), 1), Some(100));
        assert_eq!(instance.costs.get_cost(id("MUC"), id("BCN"), 2), Some(70));
        // OSL is in no group
        assert_eq!(instance.regions.get("OSL"), None);
        assert_eq!(instance.costs.len(), 5);
    }

    #[test]
    fn test_missing_header() {
        let err = parse_instance("\n\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::MissingHeader));
    }

    #[test]
    fn test_bad_header() {
        let err = parse_instance("x PRG\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line: 1, .. }));
        let err = parse_instance("2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn test_truncated_groups() {
        let err = parse_instance("2 A\nhome\nA\nrest\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::TruncatedGroups {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_bad_cost_line() {
        let text = "1 A\nhome\nA B\nA B one 10\n";
        let err = parse_instance(text.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line: 4, .. }));

        let text = "1 A\nhome\nA B\nA B 1\n";
        let err = parse_instance(text.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { line: 4, .. }));
    }
}
