use clap::Parser;
use freg_logger::{LevelFilter, Logger};
use freg_shell::{Cli, run};
use std::io::Write;

#[freg_runtime::main(memory_efficient)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the JSON result, so logging stays off unless asked for.
    let level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::OFF };
    let _log = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level).init()?;

    let output = run(cli).await?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output)?;
    writeln!(stdout)?;
    Ok(())
}
