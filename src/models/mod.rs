// src/models/mod.rs

pub mod staff_member;
pub mod task;
pub mod time_slot;
