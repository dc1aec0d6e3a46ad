// src/load/mod.rs

pub mod flat_file;

pub use flat_file::{commit_csv, format_amount, stage_csv, write_records};
