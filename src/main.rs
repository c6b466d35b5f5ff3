use std::env;
use std::process;

use ffsock::app;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() != 1 {
        process::exit(1);
    }

    let ok = match args[0].as_str() {
        "-s" => app::server(),
        "-c" => app::client(),
        _ => process::exit(1),
    };

    process::exit(if ok { 0 } else { 1 });
}
