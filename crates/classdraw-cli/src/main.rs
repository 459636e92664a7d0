//! classdraw - Turn C++ headers and sources into PlantUML class diagrams
//!
//! This tool reads C-family source files, recovers their classes, members,
//! and relationships, writes the result as `.puml` files (class or component
//! diagrams), can write a text analysis summary next to each diagram, and can
//! hand the diagrams to PlantUML to render images.

mod error;
mod render;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, ValueEnum};
use classdraw_core::{
    summarize, DetailLevel, DiagramEmitter, DiagramKind, EmitterConfig, Extractor,
    ExtractorConfig, StatsObserver,
};
use error::Error;
use render::{ImageFormat, RendererConfig};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, trace, warn, Level};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Source file extensions accepted as input
const SOURCE_EXTENSIONS: &[&str] = &["cpp", "h", "hpp", "cc", "cxx"];

/// Extension of emitted diagram files
const DIAGRAM_EXTENSION: &str = "puml";

/// Extension of analysis summaries, replacing the diagram extension
const SUMMARY_EXTENSION: &str = "summary.txt";

/// Turn C++ headers and sources into PlantUML class diagrams
#[derive(Parser, Debug)]
#[command(name = "classdraw")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    input: InputMode,

    /// Output directory for .puml files (and rendered images)
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(long, value_enum, default_value = "puml")]
    format: OutputFormat,

    /// Diagram kind
    #[arg(long, value_enum, default_value = "class")]
    diagram: DiagramType,

    /// Diagram title
    #[arg(long)]
    title: Option<String>,

    /// Spaces used to indent class members
    #[arg(long, default_value = "2")]
    indent: usize,

    /// Leave inheritance and composition edges out of the diagram
    #[arg(long)]
    no_relationships: bool,

    /// Don't record statements in inline bodies (`return x;`) as members
    #[arg(long)]
    skip_statements: bool,

    /// Also write an analysis summary (<name>.summary.txt) per diagram
    #[arg(long)]
    summary: bool,

    /// Summary detail level: 1 purpose, 2 metrics and classes, 3 design patterns
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u8).range(1..=3))]
    detail: u8,

    /// Dry run - don't write files, just show what would be written
    #[arg(long)]
    dry_run: bool,

    /// Overwrite existing files without prompting
    #[arg(long)]
    force: bool,

    /// Conflict resolution strategy for same-name different-content diagrams
    #[arg(long, value_enum, default_value = "hash-suffix")]
    conflict_strategy: ConflictStrategy,

    #[command(flatten)]
    renderer: RenderArgs,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputMode {
    /// Path to a single source file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a directory of source files to process recursively
    #[arg(short, long)]
    directory: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Render each written diagram with PlantUML
    #[arg(long)]
    render: bool,

    /// Path to plantuml.jar
    #[arg(long, env = "CLASSDRAW_PLANTUML_JAR")]
    plantuml_jar: Option<PathBuf>,

    /// Java executable used to run PlantUML
    #[arg(long, env = "CLASSDRAW_JAVA", default_value = "java")]
    java: String,

    /// Rendered image format
    #[arg(long, value_enum, default_value = "png")]
    image_format: ImageFormat,

    /// Seconds to wait for one render before killing it
    #[arg(long, default_value = "60")]
    render_timeout: u64,
}

/// Output format for extracted diagrams
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Write a .puml file per source file
    Puml,
    /// Print the diagram text to stdout
    Stdout,
    /// Print recovered class names only (for scripting)
    Classes,
}

/// Kind of diagram to write
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DiagramType {
    /// Class blocks with members and relationship edges
    Class,
    /// One component per class
    Component,
}

impl From<DiagramType> for DiagramKind {
    fn from(value: DiagramType) -> Self {
        match value {
            DiagramType::Class => DiagramKind::Class,
            DiagramType::Component => DiagramKind::Component,
        }
    }
}

/// Strategy for resolving naming conflicts
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConflictStrategy {
    /// Append a short content hash: shape~a1b2c3d4.puml
    HashSuffix,
    /// Append the source extension: shape~hpp.puml
    ExtensionSuffix,
    /// Skip conflicting files (keep first occurrence only)
    SkipConflicts,
}

/// Tracks written diagrams for deduplication
#[derive(Default)]
struct DiagramRegistry {
    /// Maps diagram filename -> (content_hash, output_path)
    seen: HashMap<String, Vec<(String, PathBuf)>>,
    /// Statistics
    stats: RunStats,
}

#[derive(Default)]
struct RunStats {
    files_processed: usize,
    classes: usize,
    relationships: usize,
    duplicates_skipped: usize,
    conflicts_renamed: usize,
    written: usize,
    summaries: usize,
    rendered: usize,
}

impl DiagramRegistry {
    fn new() -> Self {
        Self::default()
    }

    /// Compute a short hash of the content (first 8 chars of blake3)
    fn content_hash(content: &str) -> String {
        let hash = blake3::hash(content.as_bytes());
        hash.to_hex()[..8].to_string()
    }

    /// Check if this exact content was already seen for this filename
    fn is_duplicate(&self, filename: &str, content_hash: &str) -> bool {
        self.seen
            .get(filename)
            .is_some_and(|entries| entries.iter().any(|(h, _)| h == content_hash))
    }

    /// Get the number of variants we've seen for this filename
    fn variant_count(&self, filename: &str) -> usize {
        self.seen.get(filename).map_or(0, Vec::len)
    }

    /// Check if any registered diagram already resolved to `path`
    fn is_taken(&self, path: &Path) -> bool {
        self.seen
            .values()
            .flatten()
            .any(|(_, registered)| registered == path)
    }

    /// Register a diagram and return the resolved output path
    fn register(
        &mut self,
        filename: &str,
        content_hash: &str,
        output_dir: &Path,
        source: &Path,
        strategy: ConflictStrategy,
    ) -> Option<PathBuf> {
        if self.is_duplicate(filename, content_hash) {
            debug!("Skipping duplicate: {} (hash: {})", filename, content_hash);
            self.stats.duplicates_skipped += 1;
            return None;
        }

        let output_path = if self.variant_count(filename) == 0 {
            output_dir.join(filename)
        } else {
            match strategy {
                ConflictStrategy::SkipConflicts => {
                    debug!(
                        "Skipping conflict: {} (different content, hash: {})",
                        filename, content_hash
                    );
                    self.stats.duplicates_skipped += 1;
                    return None;
                }
                ConflictStrategy::HashSuffix => {
                    let new_name = Self::add_suffix(filename, &format!("~{}", content_hash));
                    info!(
                        "Conflict resolved: {} -> {} (content differs)",
                        filename, new_name
                    );
                    self.stats.conflicts_renamed += 1;
                    output_dir.join(new_name)
                }
                ConflictStrategy::ExtensionSuffix => {
                    let extension = source
                        .extension()
                        .and_then(|e| e.to_str())
                        .unwrap_or("src");
                    let mut new_name = Self::add_suffix(filename, &format!("~{}", extension));
                    // A third variant with the same extension would reuse the name
                    if self.is_taken(&output_dir.join(&new_name)) {
                        new_name = Self::add_suffix(filename, &format!("~{}", content_hash));
                    }
                    info!(
                        "Conflict resolved: {} -> {} (from {})",
                        filename,
                        new_name,
                        source.display()
                    );
                    self.stats.conflicts_renamed += 1;
                    output_dir.join(new_name)
                }
            }
        };

        self.seen
            .entry(filename.to_string())
            .or_default()
            .push((content_hash.to_string(), output_path.clone()));

        Some(output_path)
    }

    /// Add a suffix before the .puml extension
    fn add_suffix(filename: &str, suffix: &str) -> String {
        match filename.strip_suffix(".puml") {
            Some(stem) => format!("{}{}.puml", stem, suffix),
            None => format!("{}{}", filename, suffix),
        }
    }

    fn print_summary(&self) {
        info!(
            "Summary: {} files, {} classes, {} relationships, {} written, {} summaries, {} rendered, {} duplicates skipped, {} conflicts renamed",
            self.stats.files_processed,
            self.stats.classes,
            self.stats.relationships,
            self.stats.written,
            self.stats.summaries,
            self.stats.rendered,
            self.stats.duplicates_skipped,
            self.stats.conflicts_renamed
        );
    }
}

/// Everything one run needs besides the registry
struct Session<'a> {
    cli: &'a Cli,
    extractor: Extractor,
    emitter: DiagramEmitter,
    renderer: Option<RendererConfig>,
}

impl<'a> Session<'a> {
    fn new(cli: &'a Cli) -> Result<Self> {
        let mut emitter_config = EmitterConfig::new()
            .kind(cli.diagram.into())
            .indent_str(" ".repeat(cli.indent))
            .include_relationships(!cli.no_relationships);
        if let Some(title) = &cli.title {
            emitter_config = emitter_config.title(title);
        }

        let renderer = if cli.renderer.render {
            let Some(jar) = &cli.renderer.plantuml_jar else {
                bail!("--render needs --plantuml-jar or CLASSDRAW_PLANTUML_JAR");
            };
            Some(
                RendererConfig::new(jar)
                    .java(&cli.renderer.java)
                    .format(cli.renderer.image_format)
                    .timeout(Duration::from_secs(cli.renderer.render_timeout)),
            )
        } else {
            None
        };

        Ok(Self {
            cli,
            extractor: Extractor::with_config(
                ExtractorConfig::new().skip_statements(cli.skip_statements),
            ),
            emitter: DiagramEmitter::with_config(emitter_config),
            renderer,
        })
    }

    fn writes_files(&self) -> bool {
        matches!(self.cli.format, OutputFormat::Puml) && !self.cli.dry_run
    }

    fn detail(&self) -> DetailLevel {
        DetailLevel::from_level(self.cli.detail)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    let session = Session::new(&cli)?;

    // Dispatch based on input mode
    if let Some(ref file) = cli.input.file {
        process_single_file(&session, file)
    } else if let Some(ref directory) = cli.input.directory {
        process_directory(&session, directory)
    } else {
        bail!("Either --file or --directory must be specified")
    }
}

/// Process a single source file
fn process_single_file(session: &Session<'_>, file: &Path) -> Result<()> {
    if !file.exists() {
        bail!("Input file does not exist: {}", file.display());
    }
    if !file.is_file() {
        bail!("Input path is not a file: {}", file.display());
    }

    let mut registry = DiagramRegistry::new();
    process_source(session, file, &mut registry)
        .with_context(|| format!("Failed to process {}", file.display()))?;

    if session.writes_files() {
        registry.print_summary();
    }

    Ok(())
}

/// Process a directory of source files recursively
fn process_directory(session: &Session<'_>, directory: &Path) -> Result<()> {
    if !directory.exists() {
        bail!("Directory does not exist: {}", directory.display());
    }
    if !directory.is_dir() {
        bail!("Path is not a directory: {}", directory.display());
    }

    info!("Scanning directory: {}", directory.display());

    let mut registry = DiagramRegistry::new();

    for entry in WalkDir::new(directory)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        // Skip hidden files
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'))
        {
            continue;
        }

        if !is_source_file(path) {
            trace!("Skipping non-source: {}", path.display());
            continue;
        }

        debug!("Processing source: {}", path.display());
        if let Err(e) = process_source(session, path, &mut registry) {
            if !e.is_recoverable() {
                return Err(e).with_context(|| format!("Failed to process {}", path.display()));
            }
            // Log error but continue with other files
            warn!("Error processing {}: {}", path.display(), e);
        }
    }

    info!("Processed {} source files", registry.stats.files_processed);

    if session.writes_files() {
        registry.print_summary();
    }

    Ok(())
}

/// Returns true if the path has one of the accepted source extensions
fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
        })
}

/// Name of the diagram file written for `source`
fn diagram_filename(source: &Path) -> String {
    // Stem ends at the last dot: `car.test.hpp` -> `car.test.puml`, while
    // `car.hpp` and `car.cpp` share `car.puml` and go through the registry
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "diagram".to_string());
    format!("{}.{}", stem, DIAGRAM_EXTENSION)
}

/// Path of the analysis summary written next to `diagram`
fn summary_path(diagram: &Path) -> PathBuf {
    diagram.with_extension(SUMMARY_EXTENSION)
}

/// Extract, emit, and write (and possibly render) one source file
fn process_source(
    session: &Session<'_>,
    source_path: &Path,
    registry: &mut DiagramRegistry,
) -> error::Result<()> {
    let cli = session.cli;

    if !is_source_file(source_path) {
        return Err(Error::unsupported_extension(source_path));
    }

    trace!("Reading {}", source_path.display());
    let source =
        fs::read_to_string(source_path).map_err(|e| Error::file_read(source_path, e))?;

    let mut stats = StatsObserver::default();
    let model = session.extractor.extract_with(&source, &mut stats);

    registry.stats.files_processed += 1;
    registry.stats.classes += stats.class_count;
    registry.stats.relationships += stats.relationship_count();

    debug!(
        "{}: {} classes, {} methods, {} attributes, {} relationships, {} lines ignored",
        source_path.display(),
        stats.class_count,
        stats.method_count,
        stats.attribute_count,
        stats.relationship_count(),
        stats.ignored_lines
    );

    if model.classes().is_empty() {
        trace!("No classes found in {}", source_path.display());
    }

    let content = session.emitter.emit_with(&model, &mut stats);
    let summary = cli
        .summary
        .then(|| summarize(&model).render(session.detail()));

    match cli.format {
        OutputFormat::Classes => {
            for class in model.classes() {
                println!("{}", class.name);
            }
            return Ok(());
        }
        OutputFormat::Stdout => {
            print!("{}", content);
            if let Some(summary) = &summary {
                println!();
                print!("{}", summary);
            }
            return Ok(());
        }
        OutputFormat::Puml => {}
    }

    let filename = diagram_filename(source_path);
    let content_hash = DiagramRegistry::content_hash(&content);

    let Some(output_path) = registry.register(
        &filename,
        &content_hash,
        &cli.output,
        source_path,
        cli.conflict_strategy,
    ) else {
        return Ok(());
    };

    if cli.dry_run {
        println!("Would write: {}", output_path.display());
        if cli.verbose > 0 {
            println!("---");
            println!("{}", content);
            println!("---");
        }
        if summary.is_some() {
            println!("Would write: {}", summary_path(&output_path).display());
        }
        return Ok(());
    }

    write_output_file(&output_path, &content, cli.force)?;
    println!("Wrote {}", output_path.display());
    registry.stats.written += 1;

    if let Some(summary) = &summary {
        let path = summary_path(&output_path);
        write_output_file(&path, summary, cli.force)?;
        println!("Wrote {}", path.display());
        registry.stats.summaries += 1;
    }

    if let Some(renderer) = &session.renderer {
        let image = render::render(renderer, &output_path)?;
        println!("Rendered {}", image.display());
        registry.stats.rendered += 1;
    }

    Ok(())
}

/// Write a diagram or summary file to disk
fn write_output_file(output_path: &Path, content: &str, force: bool) -> error::Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::directory_create(parent, e))?;
    }

    if output_path.exists() && !force {
        return Err(Error::FileExists {
            path: output_path.to_path_buf(),
        });
    }

    let mut file =
        fs::File::create(output_path).map_err(|e| Error::file_write(output_path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::file_write(output_path, e))?;

    Ok(())
}
