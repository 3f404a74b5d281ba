//! Tests for the executor
//!
//! Organized by feature area

mod helpers;

mod assign_tests;
mod operator_tests;
mod short_circuit_tests;
mod sleep_tests;
mod while_tests;
