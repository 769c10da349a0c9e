mod app;
mod auth;
mod browser;
mod cli;
mod config;
mod consts;
mod error;
mod logging;
mod session;
mod workspace;

#[cfg(test)]
mod test_support;

use clap::Parser;

use cli::Cli;
use config::Config;

fn main() {
    let cli = Cli::parse();
    let loaded = Config::load();
    let cli = cli.with_config(&loaded.config);

    if let Err(e) = logging::init(cli.debug) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    loaded.report();

    if let Err(e) = app::run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
