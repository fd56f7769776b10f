pub mod attendance_handlers;
pub mod attendance_models;
