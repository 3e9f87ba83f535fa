//! Command-line interface for xsd-compiler

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use xsd_compiler::{CompileOptions, Compiler, ElementRef, FallbackPolicy, ResolvedModel, Restriction};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xsdc")]
#[command(author, version, about = "XML Schema compiler front end", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile an XSD schema and display the resolved model
    Inspect {
        /// Path to the XSD schema file
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Show detailed information about a specific element or type
        #[arg(short, long)]
        element: Option<String>,

        /// Show all named elements and types
        #[arg(long)]
        elements: bool,

        /// Show all simple types
        #[arg(long)]
        types: bool,

        /// Fail instead of falling back to the string type
        #[arg(long)]
        strict: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Compile an XSD schema and report warnings
    Check {
        /// Path to the XSD schema file
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Fail instead of falling back to the string type
        #[arg(long)]
        strict: bool,

        /// Exit with an error when any warning is reported
        #[arg(long)]
        deny_warnings: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Inspect {
            schema,
            element,
            elements,
            types,
            strict,
            json,
        } => cmd_inspect(schema, element, elements, types, strict, json),
        Commands::Check {
            schema,
            strict,
            deny_warnings,
        } => cmd_check(schema, strict, deny_warnings),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn compile(schema_path: &std::path::Path, strict: bool) -> xsd_compiler::Result<ResolvedModel> {
    let fallback = if strict {
        FallbackPolicy::Strict
    } else {
        FallbackPolicy::Lenient
    };
    Compiler::with_options(CompileOptions::new().with_fallback(fallback)).compile_file(schema_path)
}

#[cfg(feature = "cli")]
fn cmd_inspect(
    schema_path: PathBuf,
    element: Option<String>,
    show_elements: bool,
    show_types: bool,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let model = compile(&schema_path, strict)?;

    if let Some(elem_name) = element {
        print_element_details(&model, &elem_name, json_output)?;
        return Ok(());
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&model.dump())?);
        return Ok(());
    }

    print_schema_summary(&model);

    let show_all = !show_elements && !show_types;

    if show_all || show_elements {
        println!("\n=== Named Elements ===");
        for elem in model.all_named_elements() {
            let kind = if elem.is_complex() { "complex" } else { "simple" };
            println!(
                "  {} : {} ({})",
                elem.name(),
                elem.type_name().unwrap_or("anonymous"),
                kind
            );
        }
    }

    if show_all || show_types {
        println!("\n=== Simple Types ===");
        for simple in model.simple_types() {
            println!("  {} : {}", simple.name, simple.base.as_deref().unwrap_or("(none)"));
        }
    }

    if !model.warnings().is_empty() {
        println!("\n=== Warnings ===");
        for warning in model.warnings() {
            println!("  {}", warning);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_check(
    schema_path: PathBuf,
    strict: bool,
    deny_warnings: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let model = compile(&schema_path, strict)?;

    for warning in model.warnings() {
        eprintln!("warning: {}", warning);
    }

    let count = model.warnings().len();
    if deny_warnings && count > 0 {
        return Err(format!("{} warning(s) reported", count).into());
    }

    println!(
        "OK: {} elements, {} simple types, {} warning(s)",
        model.all_named_elements().count(),
        model.simple_types().count(),
        count
    );
    Ok(())
}

#[cfg(feature = "cli")]
fn print_schema_summary(model: &ResolvedModel) {
    println!("xsd-compiler v{}", xsd_compiler::VERSION);
    println!();
    println!("Schema Information:");
    if let Some(ns) = model.target_namespace() {
        println!("  Target Namespace: {}", ns);
    } else {
        println!("  Target Namespace: (none)");
    }
    let prefix = model.xsd_prefix().trim_end_matches(':');
    println!("  XSD Prefix: {}", if prefix.is_empty() { "(none)" } else { prefix });
    println!();
    println!("Statistics:");
    println!("  Named Elements: {}", model.all_named_elements().count());
    println!("  Top-level Elements: {}", model.top_level_elements().count());
    println!("  Simple Types: {}", model.simple_types().count());
    println!("  Substitution Groups: {}", model.substitution_groups().len());
    println!("  Warnings: {}", model.warnings().len());
}

#[cfg(feature = "cli")]
fn print_element_details(
    model: &ResolvedModel,
    name: &str,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let elem = model
        .lookup_element(name)
        .or_else(|| model.lookup_simple_element(name))
        .ok_or_else(|| format!("Element '{}' not found in schema", name))?;

    if json_output {
        let dump = model.dump();
        match dump.element(name) {
            Some(info) => println!("{}", serde_json::to_string_pretty(info)?),
            None => println!("{}", serde_json::to_string_pretty(&element_json(elem))?),
        }
        return Ok(());
    }

    println!("Element: {}", elem.name());
    println!("  Clean Name: {}", elem.clean_name());
    println!("  Type: {}", elem.type_name().unwrap_or("anonymous"));
    println!("  Complex: {}", elem.is_complex());
    if let Some(base) = elem.base() {
        println!("  Base: {}", base);
    }
    println!("  Occurs: {}..{}", elem.min_occurs(), format_max(elem));
    println!("  Mixed: {}", elem.is_mixed());
    if elem.has_mixed_extension_error() {
        println!("  Mixed Extension Error: true");
    }
    println!("  Abstract: {}", elem.is_abstract());
    println!("  Extended: {}", elem.is_extended());
    match elem.restriction() {
        Restriction::Enumeration(values) => println!("  Enumeration: {}", values.join(", ")),
        Restriction::Range(range) => println!(
            "  Range: {}..{}",
            range.minimum.map(|d| d.to_string()).unwrap_or_default(),
            range.maximum.map(|d| d.to_string()).unwrap_or_default()
        ),
        Restriction::Unconstrained => {}
    }
    for attr in elem.attributes() {
        println!("  @{} : {} ({})", attr.name, attr.type_name(), attr.usage.as_str());
    }
    for child in elem.children() {
        println!(
            "  - {} : {} [{}..{}]",
            child.name(),
            child.type_name().unwrap_or("anonymous"),
            child.min_occurs(),
            format_max(child)
        );
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn element_json(elem: ElementRef<'_>) -> serde_json::Value {
    serde_json::json!({
        "name": elem.name(),
        "type": elem.type_name(),
        "is_complex": elem.is_complex(),
        "min_occurs": elem.min_occurs(),
        "max_occurs": if elem.is_unbounded() { None } else { Some(elem.max_occurs()) },
    })
}

#[cfg(feature = "cli")]
fn format_max(elem: ElementRef<'_>) -> String {
    if elem.is_unbounded() {
        "unbounded".to_string()
    } else {
        elem.max_occurs().to_string()
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
