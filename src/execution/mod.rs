//! Execution: evaluating compiled trees and statements against records

pub mod aggregator;
pub mod expression;
pub mod select;

pub use aggregator::{create_accumulator, Accumulator, DistinctCollector};
pub use expression::{evaluate, evaluate_with_registrar, is_match};
pub use select::execute_select;
