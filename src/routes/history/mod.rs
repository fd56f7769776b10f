pub mod history_handlers;
pub mod history_models;
