use mailcanvas::{render, Document, MailError, RenderOptions};
use std::env;
use std::fs;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: mailcanvas-render <document.json> [--check] [--context <context.json>] [--out <file.html>]");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  mailcanvas-render campaign.json");
        eprintln!("  mailcanvas-render campaign.json --context preview.json --out preview.html");
        eprintln!("  mailcanvas-render campaign.json --check");
        process::exit(1);
    }

    let mut document_path: Option<String> = None;
    let mut context_path: Option<String> = None;
    let mut out_path: Option<String> = None;
    let mut check_only = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--check" => check_only = true,
            "--context" => {
                i += 1;
                match args.get(i) {
                    Some(path) => context_path = Some(path.clone()),
                    None => {
                        eprintln!("✗ --context needs a file path");
                        process::exit(1);
                    }
                }
            }
            "--out" => {
                i += 1;
                match args.get(i) {
                    Some(path) => out_path = Some(path.clone()),
                    None => {
                        eprintln!("✗ --out needs a file path");
                        process::exit(1);
                    }
                }
            }
            flag if flag.starts_with("--") => {
                eprintln!("✗ unknown flag '{}'", flag);
                process::exit(1);
            }
            path => document_path = Some(path.to_string()),
        }
        i += 1;
    }

    let document_path = match document_path {
        Some(path) => path,
        None => {
            eprintln!("✗ no document file given");
            process::exit(1);
        }
    };

    if check_only {
        match check_file(&document_path) {
            Ok(blocks) => {
                println!("✓ {} is valid ({} blocks)", document_path, blocks);
            }
            Err(e) => {
                eprintln!("✗ {} has errors:", document_path);
                print_error(&e);
                process::exit(1);
            }
        }
        return;
    }

    match render_file(&document_path, context_path.as_deref()) {
        Ok(html) => match out_path {
            Some(out) => {
                if let Err(e) = fs::write(&out, html) {
                    eprintln!("✗ failed to write {}: {}", out, e);
                    process::exit(1);
                }
                println!("✓ wrote {}", out);
            }
            None => print!("{}", html),
        },
        Err(e) => {
            eprintln!("✗ {} failed to render:", document_path);
            print_error(&e);
            process::exit(1);
        }
    }
}

fn check_file(path: &str) -> Result<usize, MailError> {
    let content = fs::read_to_string(path)
        .map_err(|e| MailError::Document(format!("Failed to read file: {}", e)))?;
    let document = Document::from_json(&content)?;
    document.validate()?;
    Ok(document.block_count())
}

fn render_file(path: &str, context_path: Option<&str>) -> Result<String, MailError> {
    let content = fs::read_to_string(path)
        .map_err(|e| MailError::Document(format!("Failed to read file: {}", e)))?;
    let document = Document::from_json(&content)?;

    let options = match context_path {
        Some(context_path) => {
            let context = fs::read_to_string(context_path)
                .map_err(|e| MailError::Document(format!("Failed to read context file: {}", e)))?;
            serde_json::from_str::<RenderOptions>(&context)?
        }
        None => RenderOptions::default(),
    };

    Ok(render(&document, &options))
}

fn print_error(error: &MailError) {
    match error {
        MailError::Document(msg) => {
            eprintln!("  Document error:");
            eprintln!("    {}", msg);
        }
        MailError::Serialization(msg) => {
            eprintln!("  Serialization error:");
            eprintln!("    {}", msg);
        }
        MailError::DuplicateId { id } => {
            eprintln!("  Duplicate id '{}':", id);
            eprintln!("    Block ids must be unique within the document");
        }
        MailError::NestedContainer { id } => {
            eprintln!("  Nested container '{}':", id);
            eprintln!("    Containers cannot hold other containers");
        }
        e => {
            eprintln!("  {}", e);
        }
    }
}
