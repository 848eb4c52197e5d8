use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use optree_syntax::lexer::Lexer;
use optree_syntax::{Node, ParseContext, ParserConfig, TokenKind, render};
use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "optree")]
#[command(about = "Parse TeX math into operator trees", long_about = None)]
struct Cli {
    /// JSON file with parser limits
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse expressions and print their trees
    Parse {
        /// Expression to parse; reads one expression per line from stdin when omitted
        #[arg(value_name = "TEX")]
        tex: Option<String>,

        #[arg(long, value_enum, default_value_t = Format::Tree)]
        format: Format,
    },
    /// Print the token stream of an expression
    Tokens {
        #[arg(value_name = "TEX")]
        tex: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Tree,
    Sexpr,
    Json,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ParserConfig> {
    let Some(path) = path else {
        return Ok(ParserConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))?;
    log::info!("loaded parser config from {}", path.display());
    Ok(config)
}

fn print_tree(tree: &Node, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Tree => print!("{}", render::pretty(tree)),
        Format::Sexpr => println!("{tree}"),
        Format::Json => println!("{}", serde_json::to_string_pretty(tree)?),
    }
    Ok(())
}

/// Column of a byte offset, counted in characters so the caret lines up
/// under non-ASCII input.
fn caret_column(input: &str, offset: usize) -> usize {
    input
        .get(..offset)
        .map_or(offset, |before| before.chars().count())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match &cli.command {
        Commands::Parse { tex, format } => {
            let mut ctx = ParseContext::open(config)?;
            let mut failures = 0usize;
            let inputs: Vec<String> = match tex {
                Some(tex) => vec![tex.clone()],
                None => io::stdin().lock().lines().collect::<Result<Vec<_>, _>>()?,
            };
            for input in inputs.iter().filter(|line| !line.trim().is_empty()) {
                match ctx.parse(input) {
                    Ok(tree) => print_tree(&tree, *format)?,
                    Err(err) => {
                        failures += 1;
                        eprintln!("{input}");
                        eprintln!("{}^ {err}", " ".repeat(caret_column(input, err.offset())));
                    }
                }
            }
            ctx.close();
            if failures > 0 {
                anyhow::bail!("{failures} expression(s) failed to parse");
            }
        }
        Commands::Tokens { tex } => {
            let mut lexer = Lexer::new(tex);
            loop {
                let token = lexer.next_token()?;
                println!("{:?} {:?} {:?}", token.range, token.kind, token.text);
                if token.kind == TokenKind::End {
                    break;
                }
            }
        }
    }
    Ok(())
}
