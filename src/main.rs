//! Bento CLI - Command-line tool for Bento documents.
//!
//! Converts between the binary, text and XML forms, prints documents,
//! audits binary payloads and merges documents.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use memmap2::Mmap;
use rayon::prelude::*;
use walkdir::WalkDir;

use bento::scanner::SizeAudit;
use bento::{parse_text, Node, NodeCursor};

/// Bento - hierarchical document conversion tool
#[derive(Parser)]
#[command(name = "bento")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document between formats
    Convert {
        /// Input document
        #[arg(short, long, env = "BENTO_INPUT")]
        input: PathBuf,

        /// Output document
        #[arg(short, long, env = "BENTO_OUTPUT")]
        output: PathBuf,

        /// Input format (inferred from the extension if omitted)
        #[arg(long)]
        from: Option<Format>,

        /// Output format (inferred from the extension if omitted)
        #[arg(long)]
        to: Option<Format>,

        /// Put every child node on its own indented line
        #[arg(short, long)]
        wrap: bool,
    },

    /// Print a document to stdout
    Dump {
        /// Input document
        #[arg(short, long, env = "BENTO_INPUT")]
        input: PathBuf,

        /// Input format (inferred from the extension if omitted)
        #[arg(long)]
        from: Option<Format>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        to: Format,

        /// Put every child node on its own indented line
        #[arg(short, long)]
        wrap: bool,
    },

    /// List every node path with its attribute and child counts
    Tree {
        /// Input document
        #[arg(short, long, env = "BENTO_INPUT")]
        input: PathBuf,

        /// Input format (inferred from the extension if omitted)
        #[arg(long)]
        from: Option<Format>,
    },

    /// Validate a binary document and report what it is made of
    Scan {
        /// Binary input document
        #[arg(short, long, env = "BENTO_INPUT")]
        input: PathBuf,
    },

    /// Merge an update document into a base document
    Merge {
        /// Base document
        #[arg(short, long, env = "BENTO_INPUT")]
        input: PathBuf,

        /// Document whose names, attributes and children win
        #[arg(short, long)]
        update: PathBuf,

        /// Output document
        #[arg(short, long, env = "BENTO_OUTPUT")]
        output: PathBuf,

        /// Output format (inferred from the extension if omitted)
        #[arg(long)]
        to: Option<Format>,

        /// Put every child node on its own indented line
        #[arg(short, long)]
        wrap: bool,
    },

    /// Convert every matching document under a directory
    Batch {
        /// Input directory
        #[arg(short, long, env = "BENTO_INPUT")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, env = "BENTO_OUTPUT")]
        output: PathBuf,

        /// Filter pattern for relative file paths (glob-style)
        #[arg(short, long)]
        filter: Option<String>,

        /// Output format
        #[arg(long, value_enum)]
        to: Format,

        /// Put every child node on its own indented line
        #[arg(short, long)]
        wrap: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Binary,
    Text,
    Xml,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "bento" | "bin" => Some(Self::Binary),
            "txt" | "bnt" => Some(Self::Text),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Binary => "bento",
            Self::Text => "bnt",
            Self::Xml => "xml",
        }
    }

    fn resolve(explicit: Option<Self>, path: &Path) -> Result<Self> {
        explicit
            .or_else(|| Self::from_path(path))
            .with_context(|| format!("Cannot infer format of {}; pass --from/--to", path.display()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            from,
            to,
            wrap,
        } => {
            cmd_convert(&input, &output, from, to, wrap)?;
        }
        Commands::Dump {
            input,
            from,
            to,
            wrap,
        } => {
            cmd_dump(&input, from, to, wrap)?;
        }
        Commands::Tree { input, from } => {
            cmd_tree(&input, from)?;
        }
        Commands::Scan { input } => {
            cmd_scan(&input)?;
        }
        Commands::Merge {
            input,
            update,
            output,
            to,
            wrap,
        } => {
            cmd_merge(&input, &update, &output, to, wrap)?;
        }
        Commands::Batch {
            input,
            output,
            filter,
            to,
            wrap,
        } => {
            cmd_batch(&input, &output, filter.as_deref(), to, wrap)?;
        }
    }

    Ok(())
}

fn load(path: &Path, format: Format) -> Result<Node> {
    match format {
        Format::Binary => {
            let data = fs::read(path).context("Failed to read input file")?;
            Node::from_bytes(&data).context("Failed to decode binary document")
        }
        Format::Text => {
            let text = fs::read_to_string(path).context("Failed to read input file")?;
            parse_text(&text).context("Failed to parse text document")
        }
        Format::Xml => bail!("XML is an output-only format"),
    }
}

fn render(node: &Node, format: Format, wrap: bool) -> Result<Vec<u8>> {
    let bytes = match format {
        Format::Binary => node.to_bytes().context("Failed to encode binary document")?,
        Format::Text => node.to_text(wrap).into_bytes(),
        Format::Xml => {
            let mut output = Vec::new();
            node.write_xml_document(&mut output, wrap)
                .context("Failed to write XML")?;
            output
        }
    };
    Ok(bytes)
}

fn save(node: &Node, path: &Path, format: Format, wrap: bool) -> Result<()> {
    let bytes = render(node, format, wrap)?;
    fs::write(path, bytes).context("Failed to write output file")
}

fn cmd_convert(
    input: &Path,
    output: &Path,
    from: Option<Format>,
    to: Option<Format>,
    wrap: bool,
) -> Result<()> {
    let from = Format::resolve(from, input)?;
    let to = Format::resolve(to, output)?;
    println!(
        "Converting: {} ({:?}) -> {} ({:?})",
        input.display(),
        from,
        output.display(),
        to
    );

    let start = Instant::now();
    let node = load(input, from)?;
    save(&node, output, to, wrap)?;

    println!(
        "Converted {} nodes in {:?}",
        node.subtree_len(),
        start.elapsed()
    );

    Ok(())
}

fn cmd_dump(input: &Path, from: Option<Format>, to: Format, wrap: bool) -> Result<()> {
    if to == Format::Binary {
        bail!("Refusing to write binary output to stdout; use convert");
    }
    let node = load(input, Format::resolve(from, input)?)?;
    let bytes = render(&node, to, wrap)?;
    println!("{}", String::from_utf8_lossy(&bytes));

    Ok(())
}

fn cmd_tree(input: &Path, from: Option<Format>) -> Result<()> {
    let node = load(input, Format::resolve(from, input)?)?;

    NodeCursor::new(&node).walk(&mut |cursor| {
        let current = cursor.node();
        println!(
            "{:indent$}{} ({} attributes, {} children)",
            "",
            cursor.path(),
            current.attributes().len(),
            current.children().len(),
            indent = cursor.depth() * 2
        );
    });

    Ok(())
}

fn cmd_scan(input: &Path) -> Result<()> {
    println!("Scanning: {}", input.display());

    let file = File::open(input).context("Failed to open input file")?;
    let mmap = unsafe { Mmap::map(&file)? };

    let start = Instant::now();
    let audit = SizeAudit::of(&mmap).context("Malformed binary document")?;
    println!("Scanned {} bytes in {:?}", mmap.len(), start.elapsed());

    if (audit.total_bytes as usize) < mmap.len() {
        eprintln!(
            "Warning: {} trailing bytes after the root node",
            mmap.len() - audit.total_bytes as usize
        );
    }
    if audit.unknown_attributes() > 0 {
        eprintln!(
            "Warning: {} attributes have types this build does not recognise",
            audit.unknown_attributes()
        );
    }

    println!();
    print!("{audit}");

    Ok(())
}

fn cmd_merge(
    input: &Path,
    update: &Path,
    output: &Path,
    to: Option<Format>,
    wrap: bool,
) -> Result<()> {
    println!(
        "Merging: {} + {} -> {}",
        input.display(),
        update.display(),
        output.display()
    );

    let mut base = load(input, Format::resolve(None, input)?).context("Failed to load base")?;
    let changes =
        load(update, Format::resolve(None, update)?).context("Failed to load update")?;

    base.update_from(&changes);
    save(&base, output, Format::resolve(to, output)?, wrap)?;

    println!("Merge complete: {} nodes", base.subtree_len());

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    filter: Option<&str>,
    to: Format,
    wrap: bool,
) -> Result<()> {
    let files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| matches!(Format::from_path(path), Some(Format::Binary | Format::Text)))
        .filter(|path| {
            let relative = path.strip_prefix(input).unwrap_or(path.as_path());
            filter.map_or(true, |pattern| {
                glob_match(pattern, &relative.to_string_lossy())
            })
        })
        .collect();

    println!("Converting {} documents to {}...", files.len(), output.display());

    fs::create_dir_all(output)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let errors = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        let relative = path.strip_prefix(input).unwrap_or(path.as_path());
        let output_path = output.join(relative).with_extension(to.extension());

        let result = (|| -> Result<()> {
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let format = Format::resolve(None, path)?;
            let node = load(path, format)?;
            save(&node, &output_path, to, wrap)
        })();

        if let Err(e) = result {
            pb.suspend(|| eprintln!("Error converting {}: {:#}", path.display(), e));
            errors.fetch_add(1, Ordering::Relaxed);
        }
        pb.inc(1);
    });

    pb.finish_with_message("Done");
    let errors = errors.into_inner();
    println!(
        "Converted {} documents in {:?} ({} errors)",
        files.len() - errors,
        start.elapsed(),
        errors
    );

    Ok(())
}

/// Simple glob matching for filtering.
fn glob_match(pattern: &str, name: &str) -> bool {
    let pattern = pattern.to_lowercase();
    let name = name.to_lowercase().replace('\\', "/");

    if !pattern.contains('*') {
        return name.contains(&pattern);
    }

    let parts: Vec<&str> = pattern.split('*').collect();
    let mut pos = 0;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        match name[pos..].find(part) {
            // Without a leading `*` the first part is anchored at the start.
            Some(found) if i == 0 && found != 0 => return false,
            Some(found) => pos += found + part.len(),
            None => return false,
        }
    }

    // Without a trailing `*` the whole name must be consumed.
    parts.last().map_or(true, |p| p.is_empty()) || pos == name.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_match() {
        assert!(glob_match("*.bento", "dir/file.bento"));
        assert!(glob_match("dir/*", "DIR/file.bnt"));
        assert!(!glob_match("dir/*.xml", "dir/file.bnt"));
        assert!(glob_match("file", "dir/file.bnt"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.BENTO")), Some(Format::Binary));
        assert_eq!(Format::from_path(Path::new("a.bnt")), Some(Format::Text));
        assert_eq!(Format::from_path(Path::new("a.xml")), Some(Format::Xml));
        assert_eq!(Format::from_path(Path::new("a")), None);
        assert!(Format::resolve(Some(Format::Text), Path::new("a")).is_ok());
    }
}
