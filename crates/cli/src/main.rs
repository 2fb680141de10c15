use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tpu-compat")]
#[command(about = "TPU compatibility checker for operation graphs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List op names valid on the TPU
    ListOps,
    /// Check a graph and report incompatible nodes
    Check(CheckArgs),
    /// Run a pass pipeline and write the annotated graph
    Annotate(AnnotateArgs),
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Input graph file (JSON or YAML)
    #[arg(long)]
    input: PathBuf,
    /// Optional format override (json, yaml)
    #[arg(long)]
    format: Option<String>,
}

#[derive(Args, Debug)]
struct AnnotateArgs {
    /// Input graph file (JSON or YAML)
    #[arg(long)]
    input: PathBuf,
    /// Output path for the annotated graph (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Optional format override for both input and output (json, yaml)
    #[arg(long)]
    format: Option<String>,
    /// Comma-separated list of passes (e.g., validate,compat)
    #[arg(long)]
    pipeline: Option<String>,
    /// Directory to dump intermediate artifacts (JSON/YAML/BIN)
    #[arg(long)]
    dump_dir: Option<PathBuf>,
    /// One or more dump formats: json, yaml, bin (repeat or comma-separated)
    #[arg(long = "dump-format", value_delimiter = ',')]
    dump_format: Vec<String>,
}

fn read_graph(input: &PathBuf, format: Option<&str>) -> Result<tc_graph::Graph, String> {
    // Detect format either from --format or file extension
    let fmt = format
        .map(|s| s.to_lowercase())
        .or_else(|| input.extension().and_then(|e| e.to_str()).map(|s| s.to_lowercase()));

    let data = fs::read_to_string(input).map_err(|e| format!("cannot read {input:?}: {e}"))?;

    match fmt.as_deref() {
        Some("yaml") | Some("yml") => tc_graph::Graph::from_yaml_str(&data).map_err(|e| e.to_string()),
        _ => tc_graph::Graph::from_json_str(&data).map_err(|e| e.to_string()),
    }
}

fn main() {
    let cli = Cli::parse();
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    match cli.command {
        Some(Command::ListOps) => {
            for op in tc_compat::TPU_ALLOWED_OPS {
                println!("{op}");
            }
        }
        Some(Command::Check(args)) => {
            let mut g = match read_graph(&args.input, args.format.as_deref()) {
                Ok(g) => g,
                Err(e) => {
                    eprintln!("check: {e}");
                    return;
                }
            };
            if let Err(e) = g.validate() {
                eprintln!("check: validation failed: {e}");
                return;
            }
            g.ensure_version_tag();
            tc_compat::check_ops_for_compatibility(&mut g);

            let mut visited = 0usize;
            let mut compatible = 0usize;
            let mut incompatible: Vec<(&str, &str)> = Vec::new();
            for node in g.nodes.values() {
                for n in std::iter::once(node)
                    .chain(node.in_embeddings.iter())
                    .chain(node.out_embeddings.iter())
                {
                    visited += 1;
                    if n.compatible {
                        compatible += 1;
                    } else {
                        incompatible.push((&n.name, &n.op));
                    }
                }
            }
            println!(
                "check ok: name={} nodes={} visited={} compatible={} incompatible={}",
                g.name,
                g.nodes.len(),
                visited,
                compatible,
                incompatible.len()
            );
            for (name, op) in incompatible {
                println!("incompatible: {name} op={op}");
            }
        }
        Some(Command::Annotate(args)) => {
            let g = match read_graph(&args.input, args.format.as_deref()) {
                Ok(g) => g,
                Err(e) => {
                    eprintln!("annotate: {e}");
                    return;
                }
            };

            let names: Vec<String> = args
                .pipeline
                .as_deref()
                .unwrap_or("validate,compat")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();

            let mut fmt: Vec<tc_compat::DumpFormat> = Vec::new();
            for f in args.dump_format.iter().map(|s| s.to_lowercase()) {
                match f.as_str() {
                    "json" => fmt.push(tc_compat::DumpFormat::Json),
                    "yaml" => fmt.push(tc_compat::DumpFormat::Yaml),
                    "bin" => {
                        #[cfg(feature = "bin-artifacts")]
                        {
                            fmt.push(tc_compat::DumpFormat::Bin);
                        }
                    }
                    _ => {}
                }
            }

            let cfg = tc_compat::PipelineConfig {
                passes: names,
                dump_dir: args.dump_dir.clone(),
                dump_formats: if fmt.is_empty() { vec![tc_compat::DumpFormat::Json] } else { fmt },
            };

            let mut pm = tc_compat::PassManager::new();
            if let Err(e) = tc_compat::build_pipeline(&mut pm, &cfg.passes) {
                eprintln!("annotate: {e}");
                return;
            }
            let out = match pm.run_with_config(g, &cfg) {
                Ok(g) => g,
                Err(e) => {
                    eprintln!("annotate failed: {e}");
                    return;
                }
            };

            let yaml_out = matches!(args.format.as_deref(), Some("yaml") | Some("yml"))
                || args
                    .output
                    .as_ref()
                    .and_then(|p| p.extension().and_then(|e| e.to_str()))
                    .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
                    .unwrap_or(false);
            let rendered = if yaml_out {
                out.to_yaml_string().map_err(|e| e.to_string())
            } else {
                out.to_json_string().map_err(|e| e.to_string())
            };
            match rendered {
                Ok(s) => {
                    if let Some(path) = &args.output {
                        if let Err(e) = fs::write(path, s) {
                            eprintln!("annotate: cannot write {path:?}: {e}");
                            return;
                        }
                        println!("annotate completed; graph written to {path:?}");
                    } else {
                        println!("{s}");
                    }
                }
                Err(e) => eprintln!("annotate: serialize failed: {e}"),
            }
        }
        None => {
            println!("Use --help for commands. Example: tpu-compat list-ops");
        }
    }
}
