use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info, trace};

use crate::application::{ConfigError, RuntimeConfig};
use crate::filesystem::{DiscoveryError, FsRenamer, discover};
use crate::renamer::{
    ConsoleReport, RenameEngine, RenameError, RenameSummary, ReportSink, RunMode, SilentReport,
};

pub struct Application;

impl Application {
    pub fn run(
        runtime_config: impl TryInto<RuntimeConfig, Error = ConfigError>,
    ) -> Result<RenameSummary, ApplicationError> {
        let config: RuntimeConfig = runtime_config.try_into().context(ConfigSnafu)?;
        debug!("Runtime config: {:?}", config);

        let mut tree = discover(&config.root, &config.skip_set).context(DiscoverySnafu)?;
        info!(
            "Found {} entries below {}",
            tree.len(),
            config.root.display()
        );
        trace!("Discovered entries: {:?}", tree.paths_decorated());

        let mut report: Box<dyn ReportSink> = if config.suppress_report() {
            Box::new(SilentReport)
        } else {
            Box::new(ConsoleReport::detect())
        };
        let mut renamer = FsRenamer;

        let summary = RenameEngine::new(&config.rename, &mut renamer, report.as_mut())
            .run(&mut tree)
            .context(RenameSnafu)?;

        let verb = match config.rename.mode {
            RunMode::Preview => "would be",
            RunMode::Commit => "were",
        };
        info!(
            "Processed {} entries: {} {verb} renamed, {} moved along with a parent, {} unmodified",
            summary.total(),
            summary.renamed,
            summary.moved,
            summary.unmodified
        );
        Ok(summary)
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Invalid configuration"))]
    ConfigError { source: ConfigError },
    #[snafu(display("Critical failure encountered while discovering entries"))]
    DiscoveryError { source: DiscoveryError },
    #[snafu(display("Critical failure encountered while renaming entries"))]
    RenameError { source: RenameError },
}
