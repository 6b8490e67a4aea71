use std::path::PathBuf;
use std::{env, process};

use loxrs::Lox;

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut lox = Lox::new();

    let exit_code = match args.len() {
        n if n > 2 => {
            eprintln!("Usage: {} [script]", env!("CARGO_PKG_NAME"));
            64
        }
        2 => lox.run_file(&PathBuf::from(&args[1])),
        _ => lox.run_prompt(),
    };

    process::exit(exit_code);
}
