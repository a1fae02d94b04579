use anyhow::{Context, Result};
use log::debug;
use rpnstack::{format_value, tokenize, Engine, EngineConfig, StackDisplay};
use std::io::BufRead;
use structopt::clap::AppSettings;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(
    name = "rpnstack",
    about = "Evaluate RPN expressions on an HP-style register stack",
    setting = AppSettings::AllowNegativeNumbers
)]
struct Options {
    /// Expression to evaluate, e.g. `5 4 2 / -`.
    ///
    /// Without an expression, lines are read from stdin and evaluated one
    /// after another on the same stack.
    expr: Vec<String>,

    /// Print the whole register stack instead of X.
    #[structopt(long = "stack")]
    stack: bool,

    /// Keep at most this many registers. 4 behaves like an HP-35.
    #[structopt(long = "depth")]
    depth: Option<usize>,

    /// Number of decimals to print.
    #[structopt(long = "precision")]
    precision: Option<usize>,
}

fn show(engine: &Engine, options: &Options) {
    if options.stack {
        println!("{}", StackDisplay::new(engine, options.precision));
    } else {
        println!("{}", format_value(engine.x(), options.precision));
    }
}

fn interactive(engine: &mut Engine, options: &Options) -> Result<()> {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        // a bad line is reported and leaves the stack as it was
        match tokenize(&line).and_then(|tokens| engine.run(&tokens)) {
            Ok(_) => show(engine, options),
            Err(err) => eprintln!("error: {}", err),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::builder().format_timestamp(None).init();

    let options = Options::from_args();
    let config = EngineConfig {
        max_depth: options.depth,
    };
    debug!("{:?}", config);
    let mut engine = Engine::with_config(config).context("bad --depth")?;

    if options.expr.is_empty() {
        return interactive(&mut engine, &options);
    }

    let expr = options.expr.join(" ");
    let tokens = tokenize(&expr).with_context(|| format!("cannot read `{}`", expr))?;
    engine
        .run(&tokens)
        .with_context(|| format!("cannot evaluate `{}`", expr))?;
    show(&engine, &options);
    Ok(())
}
