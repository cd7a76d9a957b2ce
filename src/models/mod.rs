pub mod booking;
pub mod ids;
pub mod listing;
pub mod time;

pub use booking::*;
pub use ids::*;
pub use listing::*;
pub use time::*;
