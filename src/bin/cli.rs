use std::fmt;
use std::sync::Arc;
use anyhow::{Result, Context, bail};
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::Editor;
use rustyline::history::DefaultHistory;

use relplan::catalog::Schema;
use relplan::query::planner::OptimizerConfig;
use relplan::query::{ProcessorConfig, QueryProcessor, QueryReport};

const HISTORY_FILE: &str = ".rpql_history";

#[derive(Parser)]
#[command(author, version, about = "rpql - validate, translate and optimize SQL queries")]
struct Cli {
    /// Schema file: a JSON object mapping table names to attribute lists
    #[arg(short, long, default_value = "metadata.json")]
    schema: String,

    /// Skip selection pushdown
    #[arg(long)]
    no_pushdown: bool,

    /// Skip projection insertion below joins
    #[arg(long)]
    no_projection: bool,

    /// Also print operator trees as Mermaid diagrams
    #[arg(short, long)]
    diagram: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive shell
    Shell,

    /// Process a single query
    Query {
        /// SQL query to process
        query: String,
    },

    /// List the tables in the schema
    Tables,
}

impl Cli {
    fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            optimizer: OptimizerConfig {
                selection_pushdown: !self.no_pushdown,
                projection_insertion: !self.no_projection,
            },
        }
    }
}

/// Everything the pipeline produced for one query
struct ReportView<'a> {
    report: &'a QueryReport,
    diagram: bool,
}

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.report.validation.diagnostics {
            writeln!(f, "{}", line)?;
        }

        let Some(output) = &self.report.output else {
            return Ok(());
        };

        writeln!(f)?;
        writeln!(f, "Relational algebra:")?;
        writeln!(f, "  {}", output.algebra)?;

        writeln!(f)?;
        writeln!(f, "Operator graph:")?;
        write!(f, "{}", output.operator_graph)?;
        if self.diagram {
            writeln!(f)?;
            write!(f, "{}", output.operator_graph_mermaid())?;
        }

        writeln!(f)?;
        writeln!(f, "Optimized graph:")?;
        write!(f, "{}", output.optimized_graph)?;
        if self.diagram {
            writeln!(f)?;
            write!(f, "{}", output.optimized_graph_mermaid())?;
        }

        writeln!(f)?;
        writeln!(f, "Execution plan:")?;
        write!(f, "{}", output.plan)
    }
}

struct TablesView<'a>(&'a Schema);

impl fmt::Display for TablesView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schema = self.0;
        for table in schema.table_names() {
            let attributes = schema.attributes(table).unwrap_or_default();
            writeln!(f, "{} ({})", table, attributes.join(", "))?;
        }
        writeln!(f, "({} tables)", schema.len())
    }
}

fn run_shell(processor: &QueryProcessor, diagram: bool) -> Result<()> {
    println!("Welcome to rpql. Type 'help' for assistance or 'exit' to quit.");

    let mut rl = Editor::<(), DefaultHistory>::new()?;
    if let Err(err) = rl.load_history(HISTORY_FILE) {
        if !err.to_string().contains("No such file or directory") {
            println!("Error loading history: {}", err);
        }
    }

    loop {
        let readline = rl.readline("rpql> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);

                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match line.to_lowercase().as_str() {
                    "exit" | "quit" => {
                        println!("Goodbye!");
                        break;
                    }
                    "help" => {
                        print_help();
                    }
                    "tables" => {
                        print!("{}", TablesView(processor.schema()));
                    }
                    _ => {
                        // Anything else is a query
                        let report = processor.process(line);
                        print!("{}", ReportView { report: &report, diagram });
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {}", err);
                break;
            }
        }
    }

    if let Err(err) = rl.save_history(HISTORY_FILE) {
        println!("Error saving history: {}", err);
    }
    Ok(())
}

fn print_help() {
    println!("Accepted queries:");
    println!("  SELECT <list> FROM <table>");
    println!("      [JOIN <table> ON <condition>]...");
    println!("      [WHERE <condition>]");
    println!();
    println!("Condition operators:");
    println!("  =  >  <  <=  >=  <>  AND  OR  ( )");
    println!();
    println!("Other commands:");
    println!("  tables                        - List the tables in the schema");
    println!("  help                          - Display this help message");
    println!("  exit                          - Exit the shell");
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let schema = Schema::from_json_file(&cli.schema)
        .with_context(|| format!("Failed to load schema from {}", cli.schema))?;
    let processor = QueryProcessor::with_config(Arc::new(schema), cli.processor_config());

    match &cli.command {
        Some(Commands::Shell) | None => {
            run_shell(&processor, cli.diagram)?;
        }
        Some(Commands::Query { query }) => {
            let report = processor.process(query);
            print!("{}", ReportView { report: &report, diagram: cli.diagram });
            if !report.is_accepted() {
                bail!("query rejected");
            }
        }
        Some(Commands::Tables) => {
            print!("{}", TablesView(processor.schema()));
        }
    }

    Ok(())
}
