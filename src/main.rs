use anyhow::Context;
use clap::{Parser, Subcommand};
use graphspec::{CompileOptions, Format};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "graphspec")]
#[command(about = "Compile graph specs into graph-construction code", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a spec file (validates it while compiling).
    Compile {
        #[arg(long)]
        spec: String,

        /// Variable the compiled graph is bound to.
        #[arg(long)]
        name: String,

        /// Persistence handle expression passed to compile(checkpointer=...).
        #[arg(long)]
        checkpointer: Option<String>,

        #[arg(long, value_enum, default_value_t = Format::Python)]
        format: Format,

        /// Prepend the imports the generated code relies on.
        #[arg(long)]
        imports: bool,

        #[arg(short = 'o', long)]
        out: Option<String>,
    },
    /// Parse a spec file and print its graph model as JSON.
    Inspect {
        #[arg(long)]
        spec: String,
    },
}

#[derive(Serialize)]
struct Inspection<'a> {
    start: &'a str,
    graph: &'a graphspec::GraphSpec,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Compile {
            spec,
            name,
            checkpointer,
            format,
            imports,
            out,
        } => {
            // 1) Read the spec file.
            let text = std::fs::read_to_string(&spec)
                .with_context(|| format!("read spec file {}", spec))?;

            // 2) Parse, plan, and render (fails fast on the first bad line).
            let opts = CompileOptions {
                graph_name: name,
                checkpointer,
                format,
                imports,
            };
            let code = graphspec::compile_with(&text, &opts)
                .with_context(|| format!("compile {}", spec))?;

            // 3) Write the output, or print it when no file was given.
            match out {
                Some(out) => {
                    std::fs::write(&out, code).with_context(|| format!("write {}", out))?;
                    println!("Wrote {}", out);
                }
                None => print!("{}", code),
            }
        }
        Commands::Inspect { spec } => {
            // 1) Read + parse the spec file.
            let text = std::fs::read_to_string(&spec)
                .with_context(|| format!("read spec file {}", spec))?;
            let (graph, start) =
                graphspec::parse(&text).with_context(|| format!("parse {}", spec))?;

            // 2) Dump the graph model as JSON.
            let json = serde_json::to_string_pretty(&Inspection {
                start: &start,
                graph: &graph,
            })?;
            println!("{}", json);
        }
    }

    Ok(())
}
