use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use wordtap::LayoutParams;

/// Print the words of PDF picture books with their boxes as page percentages.
#[derive(Debug, Parser)]
#[command(name = "wordtap", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print word boxes of each page as a JSON array
    Words {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print a book object (title, optional id and the words of every page)
    Book {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Book title. Default: derived from the file name
        #[arg(long)]
        title: Option<String>,

        /// Book identifier to include in the output
        #[arg(long)]
        id: Option<String>,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Dump text boxes and lines for tuning layout parameters
    Layout {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        #[command(flatten)]
        layout: LayoutArgs,
    },
}

/// Layout analysis thresholds shared by all subcommands.
#[derive(Debug, Clone, Copy, Args)]
pub struct LayoutArgs {
    /// Gap, relative to glyph size, that separates two words (default: 0.1)
    #[arg(long, default_value_t = 0.1)]
    pub word_margin: f64,

    /// Horizontal distance, relative to glyph width, that ends a line (default: 2.0)
    #[arg(long, default_value_t = 2.0)]
    pub char_margin: f64,

    /// Vertical overlap, relative to glyph height, needed to share a line (default: 0.5)
    #[arg(long, default_value_t = 0.5)]
    pub line_overlap: f64,

    /// Vertical distance, relative to line height, that ends a box (default: 0.5)
    #[arg(long, default_value_t = 0.5)]
    pub line_margin: f64,
}

impl LayoutArgs {
    pub fn params(&self) -> LayoutParams {
        LayoutParams {
            word_margin: self.word_margin,
            char_margin: self.char_margin,
            line_overlap: self.line_overlap,
            line_margin: self.line_margin,
        }
    }
}
