use std::io;
use std::process;

use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(err) = parfind::cli::run(&args, io::stdout(), io::stderr()) {
        eprintln!("{err}");
        process::exit(1);
    }
}
