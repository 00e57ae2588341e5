mod commands;
mod context;
mod view;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    name = "shadowscope",
    version,
    about = "Navigate between Robolectric shadows and the framework classes they replace",
    long_about = "Shadowscope indexes the shadow classes of a project (classes annotated with \
                  @Implements) and answers which framework methods a shadow method replaces, \
                  and which shadow methods replace a framework method. Framework sources come \
                  from the project or from a versioned android-all source archive."
)]
pub struct Cli {
    /// API level whose framework archives are active
    #[arg(long, global = true, value_name = "LEVEL")]
    pub api_level: Option<u32>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the shadow index and print it
    Index {
        /// Project root. Defaults to the current directory.
        #[arg(value_name = "PROJECT_PATH")]
        path: Option<PathBuf>,
    },
    /// Framework methods replaced by a shadow method
    #[command(long_about = "Selectors look like a.b.Class#name(type1,type2). Omitting the \
                            parameter list selects every overload.")]
    Framework {
        #[arg(value_name = "SELECTOR")]
        selector: String,
        #[arg(long, value_name = "PROJECT_PATH")]
        path: Option<PathBuf>,
    },
    /// Shadow methods replacing a framework method
    Shadows {
        #[arg(value_name = "SELECTOR")]
        selector: String,
        #[arg(long, value_name = "PROJECT_PATH")]
        path: Option<PathBuf>,
    },
    /// Gutter markers of one source file
    Markers {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long, value_name = "PROJECT_PATH")]
        path: Option<PathBuf>,
    },
    /// List the known SDKs and whether their archives are installed
    Sdks {
        #[arg(long, value_name = "PROJECT_PATH")]
        path: Option<PathBuf>,
    },
    /// Locate the source of a framework class or method
    Source {
        /// Fully qualified class name
        #[arg(value_name = "CLASS")]
        class: String,
        /// Method as `name(type1,type2)`, or just `name` for every overload
        #[arg(long, value_name = "METHOD")]
        method: Option<String>,
        #[arg(long, value_name = "PROJECT_PATH")]
        path: Option<PathBuf>,
    },
    /// Keep the index up to date while sources change
    Watch {
        #[arg(value_name = "PROJECT_PATH")]
        path: Option<PathBuf>,
    },
}

fn project_root(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

pub fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let component = match &cli.command {
        Commands::Watch { .. } => "watch",
        _ => "cli",
    };
    // Tables go to stdout; keep log lines off it unless watching.
    let _guard = shadowscope_core::logging::init_logging(
        component,
        matches!(cli.command, Commands::Watch { .. }),
    );

    let output = view::Output { json: cli.json };
    let api_level = cli.api_level;

    match cli.command {
        Commands::Index { path } => commands::index(&project_root(path), api_level, &output),
        Commands::Framework { selector, path } => {
            commands::framework(&project_root(path), api_level, &selector, &output)
        }
        Commands::Shadows { selector, path } => {
            commands::shadows(&project_root(path), api_level, &selector, &output)
        }
        Commands::Markers { file, path } => {
            commands::markers(&project_root(path), api_level, &file, &output)
        }
        Commands::Sdks { path } => commands::sdks(&project_root(path), api_level, &output),
        Commands::Source {
            class,
            method,
            path,
        } => commands::source(&project_root(path), api_level, &class, method.as_deref(), &output),
        Commands::Watch { path } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(commands::watch(project_root(path), api_level))
        }
    }
}
