pub mod aggregation;
pub mod attendance;
pub mod day_board;
pub mod overlap;
pub mod roster;
