use clap::{Parser, Subcommand};
use ctxsnap::{InspectorConfig, RepairMode, SnapshotInspector};
use ctxsnap_cli::commands::describe::OutputFormat;
use ctxsnap_cli::commands::{describe, repair, verify};
use ctxsnap_cli::console::ConsoleSink;
use ctxsnap_cli::telemetry::init_telemetry;
use ctxsnap_cli::utils::parse_buffer_size;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ctxsnap", version)]
#[command(about = "Inspect and repair the header checksum of V8 context snapshot blobs", long_about = None)]
struct Cli {
    /// Read buffer used while hashing the payload (e.g. 4096, 64K, 1M)
    #[arg(long, global = true, value_parser = parse_buffer_size, default_value = "64K")]
    buffer_size: usize,

    /// Only print outcome lines
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every header field
    Describe {
        /// Snapshot file, usually snapshot_blob.bin or v8_context_snapshot.bin
        snapshot_path: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Recompute the payload checksum and compare it with the stored one
    Verify {
        snapshot_path: Option<PathBuf>,
    },
    /// Overwrite the stored checksum with the recomputed one
    Repair {
        snapshot_path: Option<PathBuf>,

        /// Patch the file directly instead of writing a copy and renaming it
        #[arg(long)]
        in_place: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_telemetry(cli.verbose);

    let mut config = InspectorConfig::default().with_read_buffer_size(cli.buffer_size);
    if let Commands::Repair { in_place: true, .. } = cli.command {
        config = config.with_repair_mode(RepairMode::InPlace);
    }
    let inspector = SnapshotInspector::new(config);
    let mut sink = ConsoleSink::new().quiet(cli.quiet);

    // An absent path is reported by the inspector as "nothing selected".
    let result = match cli.command {
        Commands::Describe {
            snapshot_path,
            format,
        } => describe::run(&inspector, &snapshot_path.unwrap_or_default(), format, &mut sink),
        Commands::Verify { snapshot_path } => {
            verify::run(&inspector, &snapshot_path.unwrap_or_default(), &mut sink)
        }
        Commands::Repair { snapshot_path, .. } => {
            repair::run(&inspector, &snapshot_path.unwrap_or_default(), &mut sink).map(|_| ())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Already surfaced as a status line.
            tracing::debug!(error = %format!("{err:#}"), "command failed");
            ExitCode::FAILURE
        }
    }
}
