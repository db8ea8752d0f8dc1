//! Domain types for schedule query results.
//!
//! These types represent validated data only: times are parsed at the
//! boundary, records are fully populated at construction, and transfer
//! itineraries can only exist if their connection is feasible.

mod error;
mod time;
mod train;
mod transfer;
mod window;

pub use error::InputError;
pub use time::{DayTime, TimeError};
pub use train::{ClassFilter, SeatClass, SeatCount, Train, TrainClass};
pub use transfer::Transfer;
pub use window::TimeWindow;
