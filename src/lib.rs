// Library target exists for criterion benchmarks and integration tests.
// The binary entry point is main.rs; this file re-declares the module tree so
// that harnesses can import types via `quizdr::quiz::*` / `quizdr::question::*`.
// Most code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

// Public: used by benchmarks and integration tests
pub mod config;
pub mod error;
pub mod question;
pub mod quiz;
pub mod store;

// Private: required transitively by the app shell (won't compile without them)
mod app;
mod ui;
