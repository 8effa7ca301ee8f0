#![allow(clippy::enum_variant_names)]

use tracing::debug;
use tracing::level_filters::LevelFilter;

use crate::{
    application::{Application, ApplicationError, data::LogLevel},
    cli::Cli,
};

mod application;
mod cli;
mod ext;
mod filesystem;
mod renamer;
mod sanitize;

#[snafu::report]
fn main() -> Result<(), ApplicationError> {
    let cli_args = Cli::parse_or_exit();
    setup_tracing(cli_args.log_level);
    debug!("Parsed CLI arguments: {cli_args:?}");

    Application::run(cli_args)?;

    Ok(())
}

fn setup_tracing(level: LogLevel) {
    if level != LogLevel::Silent {
        tracing_subscriber::fmt()
            .with_max_level(LevelFilter::from(level))
            .with_writer(std::io::stderr)
            .without_time()
            .compact()
            .init();
    }
}
