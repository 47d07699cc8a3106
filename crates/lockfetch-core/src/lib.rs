pub mod config;
pub mod logging;

pub mod checksum;
pub mod fetcher;
pub mod locator;
pub mod lockfile;
pub mod orchestrator;
pub mod preflight;
pub mod report;
pub mod result;
pub mod run;
pub mod verify;
