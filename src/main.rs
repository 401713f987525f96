use std::io::{BufRead, Write};
use std::process::ExitCode;
use clap::Parser as ClapParser;
use basic_lang::{Config, Session};

const PROMPT: &str = "basic > ";

fn main() -> ExitCode {
    let config: Config = Config::parse();
    basic_lang::init_tracing(config.verbose);

    match config.input {
        Some(path) => {
            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(err) => {
                    eprintln!("Could not read {}: {}", path.display(), err);
                    return ExitCode::FAILURE;
                },
            };

            match basic_lang::run(&path.display().to_string(), &source) {
                Ok(value) => {
                    if let Some(value) = value {
                        println!("{}", value);
                    }

                    ExitCode::SUCCESS
                },
                Err(err) => {
                    eprintln!("{}", err);
                    ExitCode::FAILURE
                },
            }
        },
        None => match repl() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{}", err);
                ExitCode::FAILURE
            },
        },
    }
}

fn repl() -> Result<(), std::io::Error> {
    let session = Session::new();
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, "{}", PROMPT)?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            writeln!(stdout)?;
            return Ok(());
        }

        if line.trim().is_empty() {
            continue;
        }

        match session.run("<stdin>", line.trim_end()) {
            Ok(Some(value)) => writeln!(stdout, "{}", value)?,
            Ok(None) => {},
            Err(err) => eprintln!("{}", err),
        }
    }
}
