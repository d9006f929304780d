//! A small multi-action tool built on bindery.
//!
//! ```text
//! bindery-demo greet ada /g:Hi /shout
//! bindery-demo sum 1+2+3
//! bindery-demo span 01-01-2024 /to:31-12-2024
//! bindery-demo help greet
//! ```
//!
//! Set `RUST_LOG=bindery=debug` to trace the dispatch.

use anyhow::Context;
use bindery::{BoundArgs, Catalog, ConsoleMessenger, Dispatcher, Messenger};
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

const CATALOG: &str = include_str!("catalog.yaml");

fn greet(args: &BoundArgs) -> anyhow::Result<()> {
    let name: String = args.get("name")?;
    let greeting: String = args.get("greeting")?;
    let shout: bool = args.get("shout")?;
    let line = format!("{greeting}, {name}!");
    if shout {
        println!("{}", line.to_uppercase());
    } else {
        println!("{line}");
    }
    Ok(())
}

fn sum(args: &BoundArgs) -> anyhow::Result<()> {
    let numbers: Vec<i32> = args.get("numbers")?;
    let total = numbers
        .iter()
        .try_fold(0i32, |acc, n| acc.checked_add(*n))
        .context("sum does not fit in 32 bits")?;
    println!("{total}");
    Ok(())
}

fn span(args: &BoundArgs) -> anyhow::Result<()> {
    let from: NaiveDate = args.get("from")?;
    let to: NaiveDate = args.get("to")?;
    println!("{} days", (to - from).num_days());
    Ok(())
}

fn build(messenger: impl Messenger + 'static) -> anyhow::Result<Dispatcher> {
    let catalog = Catalog::from_yaml_str(CATALOG).context("embedded catalog is invalid")?;
    let dispatcher = Dispatcher::builder()
        .messenger(messenger)
        .catalog(&catalog)
        .handler("greet", greet)
        .handler("sum", sum)
        .handler("span", span)
        .build()?;
    Ok(dispatcher)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let mut dispatcher = build(ConsoleMessenger)?;
    dispatcher.run()?;
    std::process::exit(bindery::exit_code());
}
