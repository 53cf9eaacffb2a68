//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Castscript - turn video transcripts into narration scripts
#[derive(Parser, Debug)]
#[command(name = "castscript")]
#[command(about = "Turn video transcripts into narration scripts with Gemini", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Send prompts to a castscript server instead of calling Gemini directly
    #[arg(long, global = true, value_name = "URL")]
    pub gateway: Option<String>,

    /// Extra configuration file, applied over the standard locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Turn one transcript into a script
    Process {
        /// Transcript file, or `-` for stdin
        input: PathBuf,

        /// Bundled profile name or profile file
        #[arg(long)]
        profile: Option<String>,

        /// Also write the script as text
        #[arg(long, value_name = "PATH")]
        txt: Option<PathBuf>,

        /// Also write the script as a Word document
        #[arg(long, value_name = "PATH")]
        docx: Option<PathBuf>,
    },

    /// Process every pending transcript in a spreadsheet
    Batch {
        /// Workbook with a `transcript` column
        input: PathBuf,

        /// Where to write the results workbook
        #[arg(long, value_name = "PATH", default_value = "processed_transcripts.xlsx")]
        output: PathBuf,

        /// Also write a Word report of every item
        #[arg(long, value_name = "PATH")]
        docx: Option<PathBuf>,

        /// Bundled profile name or profile file
        #[arg(long)]
        profile: Option<String>,
    },

    /// Run the HTTP service
    Serve {
        /// Listen address, overriding `[server] bind`
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
}
