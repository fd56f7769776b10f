pub mod staff_handlers;
pub mod staff_models;
