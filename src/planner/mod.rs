mod calendar;
mod filter;
mod layout;
mod state;
mod store;
mod types;

pub use calendar::MonthView;
pub use filter::{group_by_environment, teams, EnvironmentGroup, Filters};
pub use layout::{layout_bar, BarLayout};
pub use state::{Planner, PlannerError};
pub use store::{DirStorage, MemoryStorage, PlannerStore};
pub use types::*;
