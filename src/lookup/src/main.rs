mod api;
mod args;

use std::io::Write;

use anyhow::Result;
use clap::Parser;

use crate::api::Api;
use crate::args::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    let api = Api::new(args.url)?;
    let teams = api.fetch_mapping()?;

    let mut stdout = std::io::stdout();
    for package in teams.packages_for(&args.team) {
        write!(stdout, "{} ", package)?;
    }
    stdout.flush()?;

    Ok(())
}
