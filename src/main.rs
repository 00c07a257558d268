use clap::Parser;
use multifield::cli::commands::Cli;
use multifield::cli::handlers;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
