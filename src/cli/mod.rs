pub mod aralia;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mef-translate",
    about = "Translate fault tree descriptions into the Open-PSA Model Exchange Format",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert an Aralia fault tree description into MEF XML
    Aralia {
        /// Input file with the Aralia notation
        input: PathBuf,
        /// Allow multiple top gates
        #[arg(long = "multi-top")]
        multi_top: bool,
        /// Output file; defaults to the input file name with the .xml extension, '-' for stdout
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
        /// Levels of argument gates written inline as nested formulas
        #[arg(long, default_value_t = 0)]
        nest: usize,
        /// Spaces per indentation level (0 writes a single line)
        #[arg(long, default_value_t = 2)]
        indent: usize,
    },
}
