//! `rigup bootstrap` command

use anyhow::Result;

use rigup::ops::{bootstrap, BootstrapOptions};
use rigup::util::config::Config;
use rigup::util::context::GlobalContext;

use crate::cli::{BootstrapArgs, Cli};

pub fn execute(args: BootstrapArgs, cli: &Cli) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config_path = args.config.unwrap_or_else(|| ctx.config_path());
    let config = Config::load_or_default(&config_path);
    let shell = cli.shell();

    let options = BootstrapOptions {
        dry_run: args.dry_run,
    };

    if let Err(failure) = bootstrap(&ctx, &config, &shell, &options) {
        // Single marked error line, then a non-zero exit. Earlier steps'
        // effects stay on disk; the run is safe to retry from the top.
        shell.error(format!("{:#}", anyhow::Error::new(failure)));
        std::process::exit(1);
    }

    Ok(())
}
