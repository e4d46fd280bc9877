use clap::{App, Arg};
use runeseries::build::build_series;
use runeseries::config::Config;
use std::error::Error;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = App::new("runeseries")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("PROJECT_DIR")
                .help("The project directory, or any directory beneath it")
                .default_value(".")
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("DIR")
                .takes_value(true)
                .help("The output directory (defaults to `_output` in the project)"),
        )
        .arg(
            Arg::with_name("series")
                .short("s")
                .long("series")
                .value_name("NAME")
                .takes_value(true)
                .help("Build only the page for this series"),
        )
        .get_matches();

    if let Err(e) = run(
        Path::new(matches.value_of("PROJECT_DIR").unwrap_or(".")),
        matches.value_of("output").map(Path::new),
        matches.value_of("series"),
    ) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(project_dir: &Path, output: Option<&Path>, series: Option<&str>) -> Result<(), Box<dyn Error>> {
    let config = Config::from_directory(project_dir, output)?;
    build_series(&config, series)?;
    Ok(())
}
