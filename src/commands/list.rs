use anyhow::Result;

use crate::cli::{Cli, ListArgs};

use super::open_source;

pub fn run(cli: &Cli, args: &ListArgs) -> Result<()> {
    let source = open_source(&args.source, args.stats.as_deref())?;

    if cli.verbose > 0 {
        eprintln!("[list] source={}", args.source);
    }

    for name in source.list()? {
        println!("{name}");
    }

    Ok(())
}
