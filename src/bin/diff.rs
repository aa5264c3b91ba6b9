use std::env;
use std::io;
use std::process;

use png_diff::cli::{parse_args, run};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().skip(1).collect();

    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            println!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&invocation, &mut io::stdout().lock()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
