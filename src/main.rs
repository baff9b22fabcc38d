// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Error};
use clap::{Parser, Subcommand};
use stamp::{
    markup::to_markup,
    process_template::render_template,
    template::Template,
    value::parse_data_str,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stamp")]
#[command(about = "Compile markup templates once and bind them to data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template against one or more YAML data files
    Render {
        /// Path to the markup template
        template: PathBuf,

        /// YAML data file. Every document is applied as a successive update
        #[arg(short, long)]
        data: Vec<PathBuf>,

        /// Print the markup after every update, not just the last one
        #[arg(long)]
        all: bool,
    },

    /// Print a template's compiled skeleton and updater descriptors
    Inspect {
        /// Path to the markup template
        template: PathBuf,
    },
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render { template, data, all } => render(&template, &data, all),
        Commands::Inspect { template } => inspect(&template),
    }
}

fn read_file(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn render(template: &Path, data: &[PathBuf], all: bool) -> Result<(), Error> {
    let template_string = read_file(template)?;
    let mut values = Vec::new();
    for path in data {
        let docs = parse_data_str(&read_file(path)?).with_context(|| format!("failed to parse {}", path.display()))?;
        values.extend(docs);
    }

    let renders = render_template(template_string.trim_end(), &values)?;
    let skip = if all { 0 } else { renders.len().saturating_sub(1) };
    for render in renders.iter().skip(skip) {
        println!("{}", render);
    }
    Ok(())
}

fn inspect(template: &Path) -> Result<(), Error> {
    let template_string = read_file(template)?;
    let template = Template::from_markup(template_string.trim_end()).context("failed to parse template")?;

    let (skeleton, root) = template.skeleton();
    println!("skeleton: {}", to_markup(skeleton, root));
    println!("descriptors:");
    for descriptor in template.descriptors() {
        println!("  {}", descriptor);
    }
    Ok(())
}
