//! shellglue: expand `$VAR` references in text read from stdin.
//!
//! Usage: `shellglue [--dump-config] [--env KEY=VALUE]... [KEY=VALUE]...`
//!
//! Positional `KEY=VALUE` arguments become local variables, `--env` pairs
//! become process environment variables; the expanded template goes to stdout.

use std::io::Read;

use shellglue::Session;
use shellglue::config::Config;

fn main() {
    let mut locals = Vec::new();
    let mut envs = Vec::new();
    let mut dump_config = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dump-config" => dump_config = true,
            "--env" => match args.next() {
                Some(pair) => envs.push(pair),
                None => {
                    eprintln!("shellglue: --env requires KEY=VALUE");
                    std::process::exit(2);
                }
            },
            _ => locals.push(arg),
        }
    }

    let config = Config::load();

    if dump_config {
        match config.to_toml() {
            Ok(text) => print!("{text}"),
            Err(e) => {
                eprintln!("shellglue: cannot render config: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    shellglue::logging::init(&config.logging);

    let session = Session::with_config(config);
    session.vars(&locals).envs(&envs);
    if let Some(err) = session.err() {
        session.prog().exit(1, &format!("shellglue: {err}"));
    }

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("shellglue: failed to read stdin: {e}");
        std::process::exit(1);
    }

    print!("{}", session.eval(&input));
}
