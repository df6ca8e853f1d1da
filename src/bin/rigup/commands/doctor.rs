//! `rigup doctor` command

use anyhow::Result;

use rigup::ops::{doctor, format_report, DoctorOptions};
use rigup::util::config::Config;
use rigup::util::context::GlobalContext;

use crate::cli::{Cli, DoctorArgs};

pub fn execute(args: DoctorArgs, cli: &Cli) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config_path = args.config.unwrap_or_else(|| ctx.config_path());
    let config = Config::load_or_default(&config_path);

    let options = DoctorOptions {
        verbose: cli.verbose,
    };

    let report = doctor(&ctx, &config, &options)?;
    print!("{}", format_report(&report, cli.verbose));

    // Exit non-zero if a required collaborator is missing.
    if !report.all_required_passed() {
        std::process::exit(1);
    }

    Ok(())
}
