//! Problem data: regions, groups, costs and routes.
//!
//! Region names are interned once at load time; everything downstream works
//! on [`RegionId`] handles and borrows the immutable [`CostTable`].

mod cost;
mod groups;
mod instance;
mod region;
mod route;

pub use cost::{CostTable, CostTableBuilder, ANY_DAY, DEFAULT_COST};
pub use groups::RegionGroups;
pub use instance::Instance;
pub use region::{RegionId, RegionIndex};
pub use route::Route;
