//! `aci man`: render roff man pages from the clap definitions.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;

use crate::cli::{Cli, GlobalOpts, ManArgs};
use crate::error::CliError;

pub fn handle(args: &ManArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cmd = Cli::command();

    let Some(ref dir) = args.out_dir else {
        let mut stdout = io::stdout().lock();
        clap_mangen::Man::new(cmd).render(&mut stdout)?;
        stdout.flush()?;
        return Ok(());
    };

    fs::create_dir_all(dir)?;
    let written = write_pages(&cmd, dir)?;
    if !global.quiet {
        eprintln!("Wrote {written} man pages to {}", dir.display());
    }
    Ok(())
}

/// Write `{name}.1` for `cmd` and every visible subcommand, recursively.
/// Subcommand pages are named `aci-get.1`, `aci-config-show.1`, ...
fn write_pages(cmd: &clap::Command, dir: &Path) -> io::Result<usize> {
    let name = cmd.get_name().to_owned();

    let mut buf = Vec::new();
    clap_mangen::Man::new(cmd.clone()).render(&mut buf)?;
    fs::write(dir.join(format!("{name}.1")), buf)?;

    let mut written = 1;
    for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
        let sub = sub.clone().name(format!("{name}-{}", sub.get_name()));
        written += write_pages(&sub, dir)?;
    }
    Ok(written)
}
