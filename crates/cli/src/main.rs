mod settings;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};

use headshot_core::archive::domain::archive_reader::ArchiveReader;
use headshot_core::archive::infrastructure::stored_zip_reader::StoredZipReader;
use headshot_core::archive::infrastructure::stored_zip_writer::StoredZipWriter;
use headshot_core::detection::domain::face_detector::FaceDetector;
use headshot_core::detection::infrastructure::confidence_filter_detector::ConfidenceFilterDetector;
use headshot_core::detection::infrastructure::null_face_detector::NullFaceDetector;
use headshot_core::detection::infrastructure::precomputed_face_detector::PrecomputedFaceDetector;
use headshot_core::imaging::infrastructure::image_crate_codec::ImageCrateCodec;
use headshot_core::pipeline::batch_executor::BatchExecutor;
use headshot_core::pipeline::infrastructure::sequential_batch_executor::SequentialBatchExecutor;
use headshot_core::pipeline::infrastructure::threaded_batch_executor::ThreadedBatchExecutor;
use headshot_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use headshot_core::pipeline::process_batch_use_case::ProcessBatchUseCase;
use headshot_core::pipeline::processing_config::ProcessingConfig;
use headshot_core::pipeline::unpack_archive_use_case::UnpackArchiveUseCase;
use headshot_core::shared::constants::ARCHIVE_MEDIA_TYPE;
use headshot_core::shared::upload::Upload;

use settings::Settings;

/// Batch headshot cropping into a single ZIP archive.
#[derive(Parser)]
#[command(name = "headshot")]
struct Cli {
    /// Settings file to read defaults from (defaults to the user config directory).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crop images into square headshots and pack them into an archive.
    Process(ProcessArgs),
    /// Extract every entry of an archive into a directory.
    Unpack {
        /// Archive to extract.
        archive: PathBuf,

        /// Destination directory (defaults to the archive path without its extension).
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// List the entries of an archive.
    Inspect {
        /// Archive to list.
        archive: PathBuf,
    },
}

#[derive(Args)]
struct ProcessArgs {
    /// Image files, or directories whose files are all processed.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output archive.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output edge in pixels: 500 or 1000.
    #[arg(long)]
    size: Option<u32>,

    /// JSON file mapping image names to face detections.
    #[arg(long)]
    detections: Option<PathBuf>,

    /// Discard detections below this confidence (0.0-1.0).
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Number of images processed in parallel.
    #[arg(long)]
    workers: Option<usize>,

    /// Persist the effective size, confidence and worker count as new defaults.
    #[arg(long)]
    save_defaults: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings_path = cli.settings.clone().or_else(Settings::config_path);
    let settings = settings_path
        .as_deref()
        .map(Settings::load_from)
        .unwrap_or_default();

    match cli.command {
        Command::Process(args) => run_process(&args, &settings, settings_path.as_deref()),
        Command::Unpack { archive, out_dir } => {
            validate_archive(&archive)?;
            let out_dir = out_dir.unwrap_or_else(|| archive.with_extension(""));
            run_unpack(&archive, &out_dir)
        }
        Command::Inspect { archive } => {
            validate_archive(&archive)?;
            run_inspect(&archive)
        }
    }
}

fn run_process(
    args: &ProcessArgs,
    settings: &Settings,
    settings_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = effective_config(args, &settings.processing);
    validate(args, &config)?;

    if args.save_defaults {
        match settings_path {
            Some(path) => {
                settings.with_processing(&config).save_to(path);
                log::info!("Saved defaults to {}", path.display());
            }
            None => {
                log::warn!("No config directory found; pass --settings to save defaults");
                eprintln!("Warning: defaults not saved, no settings path (use --settings)");
            }
        }
    }

    let target_size = config.target_size();
    if target_size != config.target_size {
        log::warn!(
            "Size must be 500 or 1000, got {}; using {target_size}",
            config.target_size
        );
    }

    let uploads = read_uploads(&args.inputs)?;
    let detector = build_detector(args.detections.as_deref(), config.min_confidence)?;
    let executor: Box<dyn BatchExecutor> = if config.workers > 1 {
        Box::new(ThreadedBatchExecutor::new(config.workers))
    } else {
        Box::new(SequentialBatchExecutor)
    };

    let mut use_case = ProcessBatchUseCase::new(
        Box::new(ImageCrateCodec::new()),
        detector,
        Box::new(StoredZipWriter::new()),
        executor,
        Box::new(StdoutPipelineLogger::default()),
        target_size,
    );
    let outcome = use_case.execute(&uploads)?;

    for error in &outcome.errors {
        eprintln!("Warning: {error}");
    }
    for report in &outcome.reports {
        let framing = match report.face {
            Some(_) => "face",
            None => "fallback",
        };
        log::info!(
            "{} -> {} ({framing}, crop {}x{} at {},{})",
            report.source,
            report.output_name,
            report.crop.size,
            report.crop.size,
            report.crop.left,
            report.crop.top
        );
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.archive_name));
    fs::write(&output, &outcome.archive)
        .map_err(|e| format!("Failed to write {}: {e}", output.display()))?;
    println!(
        "Wrote {} of {} images to {}",
        outcome.processed(),
        uploads.len(),
        output.display()
    );
    Ok(())
}

fn run_unpack(archive: &Path, out_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(archive)?;
    let use_case = UnpackArchiveUseCase::new(Box::new(StoredZipReader::new()));
    let written = use_case.execute(&bytes, out_dir)?;
    for path in &written {
        println!("{}", path.display());
    }
    log::info!("Extracted {} entries to {}", written.len(), out_dir.display());
    Ok(())
}

fn run_inspect(archive: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(archive)?;
    let entries = StoredZipReader::new().read(&bytes)?;
    println!("{} ({ARCHIVE_MEDIA_TYPE}, {} bytes)", archive.display(), bytes.len());
    let mut total = 0;
    for entry in &entries {
        println!("{:>10}  {}", entry.data.len(), entry.name);
        total += entry.data.len();
    }
    println!("{total:>10}  {} entries", entries.len());
    Ok(())
}

fn effective_config(args: &ProcessArgs, defaults: &ProcessingConfig) -> ProcessingConfig {
    ProcessingConfig {
        target_size: args.size.unwrap_or(defaults.target_size),
        min_confidence: args.min_confidence.unwrap_or(defaults.min_confidence),
        workers: args.workers.unwrap_or(defaults.workers),
    }
}

fn build_detector(
    detections: Option<&Path>,
    min_confidence: f64,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    let base: Box<dyn FaceDetector> = match detections {
        Some(path) => {
            let detector = PrecomputedFaceDetector::from_path(path)?;
            log::info!(
                "Loaded detections for {} images from {}",
                detector.image_count(),
                path.display()
            );
            Box::new(detector)
        }
        None => {
            log::info!("No detections file given; every image uses the centered crop");
            Box::new(NullFaceDetector)
        }
    };
    Ok(Box::new(ConfidenceFilterDetector::new(base, min_confidence)?))
}

/// Expands directories into their files, sorted by name, and reads every file.
fn read_uploads(inputs: &[PathBuf]) -> Result<Vec<Upload>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file())
                .collect();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(input.clone());
        }
    }

    files
        .into_iter()
        .map(|path| -> Result<Upload, Box<dyn std::error::Error>> {
            let bytes = fs::read(&path)
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(Upload::new(name, bytes))
        })
        .collect()
}

fn validate(args: &ProcessArgs, config: &ProcessingConfig) -> Result<(), Box<dyn std::error::Error>> {
    for input in &args.inputs {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
    }
    if let Some(path) = &args.detections {
        if !path.is_file() {
            return Err(format!("Detections file not found: {}", path.display()).into());
        }
    }
    config.validate()?;
    Ok(())
}

fn validate_archive(archive: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !archive.is_file() {
        return Err(format!("Archive not found: {}", archive.display()).into());
    }
    Ok(())
}
