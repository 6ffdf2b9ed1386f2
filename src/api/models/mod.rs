mod trip_row;

pub use trip_row::{from_remote_row, to_remote_row, TripRow};
