//! The main entry point for the `mfr` command-line application.
//!
//! This file is responsible for parsing command-line arguments and dispatching
//! to the appropriate subcommand handler in the `mfr` library.

use mfr::cli::{self, Commands};
use mfr::errors::Result;
use mfr::{codec, prober, replacer};
use std::env;
use std::process;

/// The main function of the application.
///
/// It parses arguments and executes the corresponding command.
fn main() -> Result<()> {
    // Check if no arguments provided (just 'mfr')
    let args_vec: Vec<String> = env::args().collect();
    if args_vec.len() == 1 {
        println!("Probe and rewrite text files across encodings, BOMs, and line endings\n");
        println!("QUICK START EXAMPLES:");
        println!("  mfr probe -t TODO -o hits.txt docs/          # Which files mention TODO?");
        println!("  mfr replace -p TODO -r DONE -w utf-8 a.txt   # Replace and re-encode");
        println!("  mfr replace -w utf-8 --bom remove -n lf src/ # Normalize only");
        println!("  mfr encodings                                # Supported encodings\n");
        println!("Run 'mfr --help' for full command list");
        println!("Run 'mfr <command> --help' for detailed command help");
        process::exit(0);
    }

    // Check for specific commands with missing args and show examples
    if args_vec.len() == 2 {
        match args_vec[1].as_str() {
            "probe" => {
                eprintln!("Error: Missing required arguments: --term, --output, <INPUTS>\n");
                eprintln!("USAGE EXAMPLES:");
                eprintln!("  mfr probe -t TODO -o hits.txt docs/            # Probe a directory");
                eprintln!("  mfr probe -t apple,orange -o hits.txt *.txt    # Multiple terms (OR)");
                eprintln!("  mfr probe -t x -o h.txt -c shift_jis legacy/   # Explicit encoding");
                eprintln!("\nFor more options: mfr probe --help");
                process::exit(1);
            }
            "replace" => {
                eprintln!("Error: Missing required argument: --write-encoding <NAME>\n");
                eprintln!("USAGE EXAMPLES:");
                eprintln!("  mfr replace -p TODO -r DONE -w utf-8 notes.txt   # Single pair");
                eprintln!("  mfr replace --table pairs.yaml -w utf-8 docs/    # Ordered table");
                eprintln!("  mfr replace -w utf-8 -n lf --dry-run src/        # Preview only");
                eprintln!("\nFor more options: mfr replace --help");
                process::exit(1);
            }
            _ => {}
        }
    }

    let args = cli::parse_args();

    match args.command {
        Commands::Probe {
            terms,
            output,
            read_encoding,
            detection,
            format,
            report,
            files_from,
            workers,
            quiet,
            inputs,
        } => prober::run_probe(
            terms,
            output,
            read_encoding,
            detection.into(),
            format,
            report,
            files_from,
            inputs,
            workers,
            quiet,
        ),
        Commands::Replace {
            find,
            replace,
            table,
            read_encoding,
            write_encoding,
            bom,
            newline,
            detection,
            files_from,
            dry_run,
            verbose,
            workers,
            inputs,
        } => replacer::run_replace(
            find,
            replace,
            table,
            read_encoding,
            write_encoding,
            bom.into(),
            newline.map(|n| n.as_str()),
            detection.into(),
            files_from,
            inputs,
            dry_run,
            verbose,
            workers,
        ),
        Commands::Encodings => {
            print_encodings();
            Ok(())
        }
    }
}

/// Prints the codec table: canonical names, code pages, and width classes.
fn print_encodings() {
    println!("Supported encodings for -c/--read-encoding and -w/--write-encoding:");
    println!("{}", "=".repeat(60));
    for desc in codec::all() {
        println!(
            "  {:<14} cp{:<6} {:<12}{}",
            desc.name,
            desc.code_page,
            desc.width.as_str(),
            if desc.has_bom_form() { "BOM form" } else { "" }
        );
    }
    println!("\nNames are case-insensitive; the decimal code page is accepted too.");
}
