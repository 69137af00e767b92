//! Scenario integration tests

pub mod adding_test;
pub mod editing_test;
pub mod failure_test;
pub mod navigation_test;
pub mod queries_test;
