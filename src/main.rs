use std::env;
use std::process;

use listing_optimizer::cli::{init_logging, run_with_args};

fn main() {
    init_logging();
    let args: Vec<String> = env::args().collect();
    process::exit(run_with_args(&args));
}
