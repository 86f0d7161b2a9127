//! treelang object tree CLI.
//!
//! Provides the `treelang` binary. `emit` builds the object tree from a JSON
//! declaration file, synthesizes initializers and writes the compiled tree
//! artifact. `lookup` answers a single resolution query against a class,
//! which is handy when debugging inheritance.
//!
//! Both subcommands run the same `ObjectTree::from_declarations` pipeline.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde_json::json;

use treelang_core::{ClassId, DeclarationFile, EmitOptions, ObjectTree};

/// Fallback output path for `emit` when `--output` is not given.
const OUTPUT_ENV: &str = "TREELANG_OUTPUT";

/// treelang object tree tools.
#[derive(Parser)]
#[command(name = "treelang", about = "treelang object tree tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Build the object tree and write the compiled artifact.
    Emit {
        /// Path to the JSON declaration file.
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (default: $TREELANG_OUTPUT, else stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON artifact.
        #[arg(long)]
        pretty: bool,
    },

    /// Resolve a name against a class as the compiler would.
    Lookup {
        /// Path to the JSON declaration file.
        #[arg(short, long)]
        input: PathBuf,

        /// Class path, e.g. /mob/player.
        #[arg(short, long)]
        class: String,

        /// Variable, proc or global name.
        #[arg(short, long)]
        name: String,
    },
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Emit {
            input,
            output,
            pretty,
        } => {
            let output = output.or_else(|| std::env::var_os(OUTPUT_ENV).map(PathBuf::from));
            run_emit(&input, output.as_deref(), EmitOptions { pretty })
        }
        Commands::Lookup { input, class, name } => run_lookup(&input, &class, &name),
    };
    process::exit(exit_code);
}

/// Reads and builds the tree, mapping failures to exit codes.
fn load_tree(input: &Path) -> Result<ObjectTree, i32> {
    let text = match std::fs::read_to_string(input) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: failed to read '{}': {}", input.display(), e);
            return Err(3);
        }
    };

    let file: DeclarationFile = match serde_json::from_str(&text) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: invalid declaration file '{}': {}", input.display(), e);
            return Err(1);
        }
    };

    ObjectTree::from_declarations(&file).map_err(|e| {
        eprintln!("Error: {}", e);
        1
    })
}

/// Execute the emit subcommand.
///
/// Returns exit code: 0 = success, 1 = structural error,
/// 2 = build errors, 3 = I/O error.
fn run_emit(input: &Path, output: Option<&Path>, options: EmitOptions) -> i32 {
    let mut tree = match load_tree(input) {
        Ok(t) => t,
        Err(code) => return code,
    };

    if let Err(e) = tree.finalize() {
        eprintln!("Error: {}", e);
        return 1;
    }

    let compiled = match tree.emit_tree() {
        Ok(c) => c,
        Err(errors) => {
            eprintln!("Build failed with {} error(s):", errors.len());
            for err in &errors {
                eprintln!("  - {}", err);
            }
            return 2;
        }
    };

    let json = match compiled.to_json(&options) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error: failed to serialize artifact: {}", e);
            return 1;
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, json) {
                eprintln!("Error: failed to write '{}': {}", path.display(), e);
                return 3;
            }
        }
        None => println!("{}", json),
    }
    0
}

/// Execute the lookup subcommand. Prints a JSON report to stdout.
fn run_lookup(input: &Path, class_path: &str, name: &str) -> i32 {
    let tree = match load_tree(input) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let class = match tree.lookup(class_path) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let report = lookup_report(&tree, class, name);

    match serde_json::to_string_pretty(&report) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: failed to serialize lookup result: {}", e);
            1
        }
    }
}

/// What `name` resolves to on `class`.
///
/// `return_type` is the override-aware resolution the compiler uses;
/// `last_return_type` is the annotation of the most recently declared proc.
fn lookup_report(tree: &ObjectTree, class: ClassId, name: &str) -> serde_json::Value {
    let class_path = tree.class(class).map(|node| node.path.to_string());

    let variable = tree.find_var(class, name).map(|var| {
        json!({
            "type": var.type_path.as_ref().map(|p| p.to_string()),
            "is_const": var.is_const,
            "value": var.try_as_json(),
            "declared_here": tree.declares_instance_var(class, name),
        })
    });
    let global = tree.find_global_var(class, name).map(|slot| {
        json!({
            "id": slot.id,
            "is_const": slot.is_const,
        })
    });
    let procs = tree.find_procs(class, name).map(|ids| ids.to_vec());
    let return_type = tree
        .proc_return_type(class, name)
        .map(|ty| ty.to_string());
    let last_return_type = procs
        .as_ref()
        .map(|_| tree.last_proc_return_type(class, name).to_string());

    json!({
        "class": class_path,
        "id": class,
        "kind": tree.value_kind(class).to_string(),
        "name": name,
        "variable": variable,
        "global": global,
        "procs": procs,
        "return_type": return_type,
        "last_return_type": last_return_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUMP: &str = r#"{ "classes": [
        { "path": "/a", "procs": [{ "name": "bump", "return_type": { "flags": 128 } }] },
        { "path": "/a/b", "procs": [{ "name": "bump", "is_override": true }] }
    ] }"#;

    fn bump_tree() -> ObjectTree {
        let file: DeclarationFile = serde_json::from_str(BUMP).unwrap();
        ObjectTree::from_declarations(&file).unwrap()
    }

    #[test]
    fn lookup_reports_override_aware_return_type() {
        let tree = bump_tree();
        let b = tree.lookup("/a/b").unwrap();

        let report = lookup_report(&tree, b, "bump");
        assert_eq!(report["class"], "/a/b");
        assert_eq!(report["procs"], json!([1]));
        assert_eq!(report["return_type"], "mob");
        assert_eq!(report["last_return_type"], "anything");
    }

    #[test]
    fn lookup_of_unknown_name_is_empty() {
        let tree = bump_tree();
        let a = tree.lookup("/a").unwrap();

        let report = lookup_report(&tree, a, "missing");
        assert!(report["variable"].is_null());
        assert!(report["procs"].is_null());
        assert!(report["return_type"].is_null());
    }
}
