pub mod analysis;
pub mod market;
pub mod price;
pub mod profitability;
pub mod signals;

pub use analysis::*;
pub use market::*;
pub use price::*;
pub use profitability::*;
pub use signals::*;
