mod aggregation;
mod category;
mod chart;
mod filter;
mod money;
mod sorting;
mod totals;
mod transaction;
mod validation;

pub use aggregation::*;
pub use category::*;
pub use chart::*;
pub use filter::*;
pub use money::*;
pub use sorting::*;
pub use totals::*;
pub use transaction::*;
pub use validation::*;
