use std::fs;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use log::LevelFilter;
use tech_digest::{init_logging, parse_headlines, render};

#[derive(Parser, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default)]
#[command(author, version, about)]
/// Renders a saved top headlines response as the newsletter HTML, nothing is fetched or sent
struct Cli {
    /// Specifies the saved JSON response to be read in
    #[arg(value_name = "PATH")]
    response_filename: String,

    /// Date shown in the newsletter header (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Skipped articles and API errors are reported as warnings on stderr
    init_logging(LevelFilter::Warn, None)?;
    let body = fs::read_to_string(&cli.response_filename)
        .with_context(|| format!("Failed to read {:?}", cli.response_filename))?;
    let articles = parse_headlines(&body)?;
    let today = cli.date.unwrap_or_else(|| Local::now().date_naive());
    println!("{}", render(&articles, today));
    Ok(())
}
