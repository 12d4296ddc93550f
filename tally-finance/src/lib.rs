//! tally-finance: statement loading, categorization and correction behind one workbench

pub mod workbench;

pub use workbench::{Statement, Workbench};
