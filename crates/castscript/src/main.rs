//! Castscript CLI binary.
//!
//! This binary provides command-line access to castscript:
//! - Turn a transcript into a script
//! - Process a spreadsheet of transcripts
//! - Run the HTTP service

use castscript::{ObservabilityConfig, Settings, build_generator, init_observability};
use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, ProcessOutputs, process_transcript, run_batch, run_server};

    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    init_observability(
        &ObservabilityConfig::default()
            .with_log_level(log_level)
            .with_json_logs(cli.json_logs),
    )?;

    let settings = Settings::load(cli.config.as_deref())?;
    let generator = build_generator(&settings, cli.gateway.as_deref())?;

    let outcome = match cli.command {
        Commands::Process {
            input,
            profile,
            txt,
            docx,
        } => {
            let outputs = ProcessOutputs { txt, docx };
            process_transcript(&settings, generator, &input, profile.as_deref(), &outputs).await
        }

        Commands::Batch {
            input,
            output,
            docx,
            profile,
        } => {
            run_batch(
                &settings,
                generator,
                &input,
                &output,
                docx.as_deref(),
                profile.as_deref(),
            )
            .await
        }

        Commands::Serve { bind } => run_server(&settings, generator, bind).await,
    };

    castscript::shutdown_observability();

    outcome.map_err(|e| e.user_message().into())
}
