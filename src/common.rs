// src/common.rs

pub mod error;

#[cfg(test)]
pub mod test_utils;
