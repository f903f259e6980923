use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

mod commands;
mod config;

/// Inspection tool for the h5nif HDF5 datatype bridge.
///
/// Lists the datatype names the bridge understands, inspects a datatype end
/// to end, and dispatches single calls through the host function table.
///
/// EXAMPLES:
///     h5nif types                               List supported type names
///     h5nif inspect H5T_NATIVE_INT              Copy, query and close a type
///     h5nif --backend memory inspect H5T_NATIVE_DOUBLE --json
///     h5nif call h5tcopy H5T_NATIVE_INT         Call one host function
///
/// ENVIRONMENT VARIABLES:
///     H5NIF_LIBRARY   HDF5 library name or path
///     H5NIF_BACKEND   'hdf5' or 'memory'
///     H5NIF_LOG       Default log level (RUST_LOG takes precedence)
///     H5NIF_JSON      Set to '1' for JSON output by default
///     NO_COLOR        Set to disable colored output
#[derive(Parser)]
#[command(name = "h5nif")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Datatype backend (overrides h5nif.toml and H5NIF_BACKEND)
    #[arg(long, global = true, value_parser = ["hdf5", "memory"])]
    backend: Option<String>,

    /// HDF5 library name or path (overrides h5nif.toml and H5NIF_LIBRARY)
    #[arg(long, global = true)]
    library: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported type names
    ///
    /// EXAMPLES:
    ///     h5nif types           Table of names, classes and sizes
    ///     h5nif types --json    Same, as JSON
    #[command(visible_alias = "t")]
    Types {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy a predefined type, query it and close it
    ///
    /// Runs the full bridge path: resolve the name, copy the type, read
    /// its class, byte order and size, then close the copy.
    ///
    /// EXAMPLES:
    ///     h5nif inspect H5T_NATIVE_INT
    ///     h5nif inspect H5T_NATIVE_DOUBLE --json
    #[command(visible_alias = "i")]
    Inspect {
        /// Type name, e.g. H5T_NATIVE_INT
        type_name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Call one host function
    ///
    /// Arguments are parsed as host terms: integers, "quoted strings", or
    /// atoms. Exits non-zero when the result is an error tuple.
    ///
    /// EXAMPLES:
    ///     h5nif call h5tcopy H5T_NATIVE_INT
    ///     h5nif call get_size 42
    ///     h5nif call h5tcopy '"H5T_NATIVE_INT"'
    #[command(visible_alias = "c")]
    Call {
        /// Function name (h5tcopy, copy, h5tclose, ...)
        function: String,
        /// Arguments
        #[arg(allow_negative_numbers = true)]
        args: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    ///
    /// EXAMPLES:
    ///     h5nif completions bash > ~/.bash_completions/h5nif.bash
    ///     h5nif completions zsh > ~/.zfunc/_h5nif
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cli_config = config::Config::from_env();
    cli_config.apply_color();

    let overrides = config::BackendOverrides {
        backend: cli.backend,
        library: cli.library,
    };

    match cli.command {
        Commands::Types { json } => {
            commands::types::run(json || cli_config.default_json)?;
        }
        Commands::Inspect { type_name, json } => {
            let settings = config::load(&overrides)?;
            commands::inspect::run(&settings, &type_name, json || cli_config.default_json)?;
        }
        Commands::Call {
            function,
            args,
            json,
        } => {
            let settings = config::load(&overrides)?;
            commands::call::run(&settings, &function, &args, json || cli_config.default_json)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "h5nif", &mut io::stdout());
        }
    }

    Ok(())
}
