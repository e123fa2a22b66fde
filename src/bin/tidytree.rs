//! Command-line front end: lay out a tree and print it.
//!
//! Reads edge-list text (or relationship JSON with `--json`) from a file or
//! stdin, or generates a random tree with `--random`. Logging goes through
//! `env_logger`; set `RUST_LOG=debug` to watch the layout.

use anyhow::{Context as _, Result, anyhow};
use std::env;
use std::fs::read_to_string;
use std::io::{Read as _, Write as _, stderr, stdin, stdout};

use tidytree_core::generate::{GeneratorConfig, generate_tree};
use tidytree_core::output::TreeOutput;
use tidytree_core::{LayoutConfig, Tree, layout_tree, parse_source, parser, render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

struct Options {
    input: Option<String>,
    json_input: bool,
    random: Option<usize>,
    seed: u64,
    grid: bool,
    format: Format,
    layout: LayoutConfig,
}

fn print_usage() {
    drop(writeln!(
        stderr(),
        "Usage:\n  tidytree [FILE] [--json] [--min-distance D] [--grid] [--output text|json]\n  tidytree --random SIZE [--seed N] [--min-distance D] [--grid] [--output text|json]"
    ));
}

fn value<'a>(args: &'a [String], index: usize, flag: &str) -> Result<&'a str> {
    args.get(index + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{flag} needs a value"))
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut opts = Options {
        input: None,
        json_input: false,
        random: None,
        seed: 0,
        grid: false,
        format: Format::Text,
        layout: LayoutConfig::default(),
    };
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--json" => {
                opts.json_input = true;
                index += 1;
            }
            "--grid" => {
                opts.grid = true;
                index += 1;
            }
            "--min-distance" => {
                let v = value(args, index, "--min-distance")?;
                opts.layout.min_distance =
                    v.parse().with_context(|| format!("invalid --min-distance '{v}'"))?;
                index += 2;
            }
            "--random" => {
                let v = value(args, index, "--random")?;
                opts.random = Some(v.parse().with_context(|| format!("invalid --random '{v}'"))?);
                index += 2;
            }
            "--seed" => {
                let v = value(args, index, "--seed")?;
                opts.seed = v.parse().with_context(|| format!("invalid --seed '{v}'"))?;
                index += 2;
            }
            "--output" => {
                opts.format = match value(args, index, "--output")? {
                    "text" => Format::Text,
                    "json" => Format::Json,
                    other => return Err(anyhow!("unknown output format '{other}'")),
                };
                index += 2;
            }
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => {
                print_usage();
                return Err(anyhow!("unknown option '{flag}'"));
            }
            path => {
                if opts.input.replace(path.to_string()).is_some() {
                    return Err(anyhow!("only one input file is supported"));
                }
                index += 1;
            }
        }
    }
    opts.layout.validate()?;
    Ok(opts)
}

fn load_tree(opts: &Options) -> Result<Tree> {
    if let Some(size) = opts.random {
        let cfg = GeneratorConfig { size, ..GeneratorConfig::default() };
        return Ok(generate_tree(&cfg, opts.seed)?);
    }

    let source = match &opts.input {
        Some(path) => read_to_string(path).with_context(|| format!("reading {path}"))?,
        None => {
            let mut buf = String::new();
            stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };
    let name = opts.input.as_deref().unwrap_or("<stdin>");

    let tree = if opts.json_input {
        parser::parse_json(&source)
    } else {
        parse_source(&source)
    };
    tree.with_context(|| format!("loading {name}"))
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let opts = parse_args(&args)?;
    let mut tree = load_tree(&opts)?;
    let summary = layout_tree(&mut tree, &opts.layout);

    let mut out = stdout().lock();
    match opts.format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &TreeOutput::from_tree(&tree, &summary))?;
            writeln!(out)?;
        }
        Format::Text => {
            write!(out, "{}", render::render_edges(&tree))?;
            writeln!(out)?;
            write!(out, "{}", render::render_positions(&tree))?;
            if opts.grid {
                writeln!(out)?;
                write!(out, "{}", render::render_grid(&tree, 4))?;
            }
            writeln!(
                out,
                "\n{} nodes, width {}, depth {}",
                summary.nodes, summary.width, summary.depth
            )?;
        }
    }
    Ok(())
}
