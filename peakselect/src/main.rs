use clap::Parser;
use log::{error, info};
use peakselect::{Args, peakselect};
use simple_logger::init_with_level;

fn main() {
    let args = Args::parse();

    init_with_level(args.level).unwrap_or_else(|e| panic!("{}", e));
    info!("Starting peakselect with args: {}", args);

    if let Err(e) = peakselect(args) {
        error!("{}", e);
        eprintln!("Exiting, see above message");
        std::process::exit(1);
    }
}
