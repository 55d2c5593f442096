//! Ready-made line configurations.

pub mod bottling;

pub use bottling::bottling_line;
