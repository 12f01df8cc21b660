pub use util::*;

use clap::Parser;

mod util;

solutions![d12, d13, d14, d15, d16, d17, d18, d19];

fn main() {
    let args: Args = Args::parse();

    solutions().run(&args);
}
