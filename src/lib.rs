use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Once;
use clap::Parser as ClapParser;
use crate::compiler::environment::Context;
use crate::compiler::error::LangResult;
use crate::compiler::interpreter::{Evaluation, Interpreter};
use crate::compiler::lexer::{Lexer, SourceFile};
use crate::compiler::number::Number;
use crate::compiler::parser::Parser;

pub mod util;
pub mod compiler;

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(help = "Script to run; starts an interactive prompt if omitted")]
    pub input: Option<PathBuf>,

    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
}

static TRACING_INIT: Once = Once::new();

/// Installs the log subscriber. `RUST_LOG` takes precedence over `verbose`.
/// Log output goes to stderr so it never mixes with evaluation results.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}

/// Top-level program state shared by consecutive runs, so that variables assigned
/// on one prompt line are visible on the next.
#[derive(Debug)]
pub struct Session {
    context: Rc<Context>,
    interpreter: Interpreter,
}

impl Session {
    pub fn new() -> Session {
        Session { context: Context::new_program(), interpreter: Interpreter::new() }
    }

    pub fn context(&self) -> &Rc<Context> {
        &self.context
    }

    pub fn run(&self, file_name: &str, source: &str) -> Evaluation {
        let _span = tracing::debug_span!("run", file = file_name).entered();

        let tokens = Lexer::new(SourceFile::new(file_name, source)).make_tokens()?;
        let node = Parser::new(tokens).parse()?;

        self.interpreter.visit(&node, &self.context)
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

/// Lexes, parses and evaluates `source` in a fresh program context.
///
/// Returns `Ok(None)` for expressions that produce no value, such as loops.
pub fn run(file_name: &str, source: &str) -> LangResult<Option<Number>> {
    Session::new().run(file_name, source)
}
