//! Scenario tests across modules

mod options_files;
mod support;
