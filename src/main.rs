use clap::Parser;
use std::io;
use std::path::Path;
use tagsmith::application::ModifyTagsService;
use tagsmith::cli::{format_error, format_report, Cli, LogLevel};
use tagsmith::error::TagsmithError;
use tagsmith::infrastructure::{Config, FileSystemRepository, OverlayRepository};

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.log_level);

    let result = run(cli);

    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("{}", format_error(&e));
            std::process::exit(e.exit_code());
        }
    }
}

fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), TagsmithError> {
    let config = Config::discover(Path::new(&cli.file))?;
    let options = cli.modify_options(&config)?;

    let report = if cli.modified {
        // Unsaved buffers arrive on stdin
        let repo = OverlayRepository::from_reader(io::stdin().lock())?;
        ModifyTagsService::new(repo).execute(options)?
    } else {
        ModifyTagsService::new(FileSystemRepository::new()).execute(options)?
    };

    if !cli.quiet {
        print!("{}", format_report(&report));
    }

    Ok(())
}
