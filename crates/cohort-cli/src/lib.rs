//! Library side of the `dhs-cohort` command-line tool.

pub mod logging;
pub mod pipeline;
