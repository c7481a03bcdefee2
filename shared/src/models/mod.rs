//! Domain models for marketplace reporting

mod records;
mod report;

pub use records::*;
pub use report::*;
