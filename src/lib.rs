//! Drives a Tenable.io agent scan end to end and turns the result into a
//! CI gate: create, launch, wait, export, upload to S3, count top-severity
//! findings, pass or fail.

pub mod cli;
pub mod config;
pub mod errors;
pub mod gate;
pub mod models;
pub mod pipeline;
pub mod storage;
pub mod tenable;
