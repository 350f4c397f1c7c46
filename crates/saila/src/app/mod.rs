mod bootstrap;
mod config;
mod gameplay;
mod headless;
mod loop_runner;

pub(crate) use bootstrap::{build_app, init_tracing, parse_args, usage_text, CliCommand};
pub(crate) use loop_runner::run;
