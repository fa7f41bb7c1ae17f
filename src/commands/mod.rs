pub mod run;
pub mod steps;
pub mod update;

use anyhow::Result;
use hostkit::{DryRunner, Host, Invocation, Runner};

use crate::catalog::Catalog;
use crate::cli::SourceArgs;
use crate::config::BootstrapConfig;
use crate::ui;

/// Config plus the catalog it selects
pub(crate) fn load_sources(source: &SourceArgs) -> Result<(BootstrapConfig, Catalog)> {
    let config = BootstrapConfig::load(source.config.as_deref())?;
    let custom = source.catalog.clone().or_else(|| config.catalog_path());
    let catalog = Catalog::load(custom.as_deref())?;
    Ok((config, catalog))
}

/// A host that really runs commands, or one that only prints them
pub(crate) fn host(dry_run: bool) -> Host<'static> {
    if dry_run {
        Host::with_runner(Preview::default())
    } else {
        Host::system()
    }
}

/// Dry-run gateway that echoes each command to the console
#[derive(Default)]
struct Preview {
    recorder: DryRunner,
}

impl Runner for Preview {
    fn run(&self, invocation: &Invocation) -> hostkit::Result<()> {
        ui::dim(&format!("$ {invocation}"));
        self.recorder.run(invocation)
    }
}
