// src/transform/mod.rs

pub mod convert;
pub mod rates;

pub use convert::{convert, round2, TARGET_CURRENCIES};
pub use rates::RateTable;
