//! Runtime module — process lifecycle: logging, CLI, config boot, shutdown.

pub mod boot;
pub mod cli;
pub mod stop;
