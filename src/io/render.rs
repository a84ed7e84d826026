//! Route report for display.
//!
//! The report prices legs on its own: a leg without a cost entry is shown
//! as `-1` and contributes `-1` to the printed total. This is deliberately
//! different from the optimizer, which charges the route's default cost for
//! such a leg. The printed total therefore flags missing legs instead of
//! hiding them behind a penalty.

use crate::model::{CostTable, RegionId, RegionIndex};
use std::io::{self, Write};

/// Cost printed for a leg the table does not know.
pub const MISSING_COST: i64 = -1;

/// One travelled leg.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub from: RegionId,
    pub to: RegionId,
    pub day: u32,
    /// `None` when the cost table has no entry for this leg.
    pub cost: Option<i64>,
}

impl Leg {
    /// Cost as printed, with [`MISSING_COST`] for unknown legs.
    pub fn display_cost(&self) -> i64 {
        self.cost.unwrap_or(MISSING_COST)
    }
}

/// Per-leg breakdown of a route.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    pub total: i64,
    pub legs: Vec<Leg>,
}

impl Itinerary {
    /// Reprices `regions` leg by leg.
    pub fn new(regions: &[RegionId], costs: &CostTable) -> Self {
        let legs: Vec<Leg> = regions
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let day = (i + 1) as u32;
                Leg {
                    from: pair[0],
                    to: pair[1],
                    day,
                    cost: costs.get_cost(pair[0], pair[1], day),
                }
            })
            .collect();
        let total = legs.iter().map(Leg::display_cost).sum();
        Self { total, legs }
    }

    /// Whether some leg has no cost entry.
    pub fn has_missing_legs(&self) -> bool {
        self.legs.iter().any(|leg| leg.cost.is_none())
    }

    /// Writes the total, then one `<from> <to> <day> <cost>` line per leg.
    pub fn write_to<W: Write>(&self, regions: &RegionIndex, mut out: W) -> io::Result<()> {
        writeln!(out, "{}", self.total)?;
        for leg in &self.legs {
            writeln!(
                out,
                "{} {} {} {}",
                regions.name(leg.from),
                regions.name(leg.to),
                leg.day,
                leg.display_cost()
            )?;
        }
        out.flush()
    }
}

/// Prices `route` and writes the report to `out`.
pub fn render_route<W: Write>(
    route: &[RegionId],
    costs: &CostTable,
    regions: &RegionIndex,
    out: W,
) -> io::Result<()> {
    Itinerary::new(route, costs).write_to(regions, out)
}
