use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use edge_accel as ea;
use edge_accel::codec;
use log::{debug, error, info, warn};
use walkdir::WalkDir;

mod structs;

type Session = ea::AcceleratorClient<Box<dyn ea::Accelerator>>;

#[derive(Parser)]
#[clap(version, about, long_about = None)]
#[clap(disable_help_flag = true)]
struct Cli {
    #[clap(long, action = clap::ArgAction::HelpLong)]
    help: Option<bool>,

    /// Directory with source images
    #[clap(value_parser, default_value = "input")]
    input_dir: PathBuf,

    /// Directory for result images
    #[clap(value_parser, default_value = "output")]
    output_dir: PathBuf,

    /// Filter applied to all images; can be repeated.
    /// Interactive menu is shown if no filters are given.
    #[clap(short, long, value_enum)]
    filter: Vec<structs::FilterType>,

    /// Implementation of the accelerator
    #[clap(short, long, value_enum, default_value_t = structs::Backend::Device)]
    backend: structs::Backend,

    /// Path to the device file of the accelerator
    #[clap(short, long, value_parser, default_value = "/dev/edge_accel")]
    device: PathBuf,

    /// Value of the size field sent with convolution requests
    #[clap(short, long, value_enum, default_value_t = structs::SizeField::Pinned)]
    size_field: structs::SizeField,

    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn main() -> Result<()> {
    let cli: Cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", cli.output_dir))?;
    let mut session = open_session(cli)?;

    if !cli.input_dir.is_dir() {
        return Err(anyhow!(
            "Input directory {:?} doesn't exist or is not a directory",
            cli.input_dir
        ));
    }

    if cli.filter.is_empty() {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        while let Some(filter) = prompt_filter(&mut input, &mut output)? {
            process_batch(&mut session, filter, &cli.input_dir, &cli.output_dir);
        }
    } else {
        for &filter in &cli.filter {
            process_batch(&mut session, filter.into(), &cli.input_dir, &cli.output_dir);
        }
    }

    session
        .close()
        .with_context(|| "Failed to close accelerator session")
}

fn open_session(cli: &Cli) -> Result<Session> {
    let accelerator: Box<dyn ea::Accelerator> = match cli.backend {
        structs::Backend::Device => {
            debug!("Use accelerator device {:?}", cli.device);
            Box::new(ea::DeviceAccelerator::new(&cli.device))
        }
        structs::Backend::Software => {
            debug!("Use software accelerator");
            Box::new(ea::SoftwareAccelerator::new())
        }
    };
    let options = ea::ClientOptions::new().size_field(cli.size_field.into());
    ea::AcceleratorClient::open_with_options(accelerator, options)
        .with_context(|| "Failed to initialize accelerator")
}

const MENU: &str = "\
------------------------------------------
Choose the edge filter to apply to all images:
  1 - Sobel (3x3)
  2 - Expanded Sobel (5x5)
  3 - Prewitt (3x3)
  4 - Roberts (2x2)
  5 - Laplace (5x5)
  6 - Exit
------------------------------------------";

const EXIT_SELECTOR: u32 = 6;

/// Shows the menu until a valid choice is made.
/// Returns `None` if user chooses to exit or the input is closed.
fn prompt_filter(
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<Option<ea::EdgeFilter>> {
    let mut line = String::new();
    loop {
        writeln!(output, "\n{}", MENU)?;
        write!(output, "Option: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let selector: u32 = match line.trim().parse() {
            Ok(selector) => selector,
            Err(_) => {
                writeln!(output, "Invalid input! Please enter a number.")?;
                continue;
            }
        };
        if selector == EXIT_SELECTOR {
            return Ok(None);
        }
        match ea::EdgeFilter::from_selector(selector) {
            Ok(filter) => return Ok(Some(filter)),
            Err(err) => writeln!(output, "{}", err)?,
        }
    }
}

/// Applies the filter to every supported image of the input directory.
/// Failures of single images are logged and skipped.
fn process_batch(
    session: &mut Session,
    filter: ea::EdgeFilter,
    input_dir: &Path,
    output_dir: &Path,
) {
    info!(
        "Applying filter '{}' to all images in {:?}",
        filter.name(),
        input_dir
    );
    let pipeline = ea::FilterPipeline::new(filter);

    for source_path in collect_sources(input_dir) {
        info!("Processing file {:?}", source_path);
        let plane = match codec::load_grayscale(&source_path) {
            Ok(plane) => plane,
            Err(err) => {
                warn!("Failed to load image {:?}: {:#}. Skipping it.", source_path, anyhow!(err));
                continue;
            }
        };

        let faults_before = session.fault_count();
        let output = pipeline.apply(session, &plane);
        let faults = session.fault_count() - faults_before;
        if faults > 0 {
            warn!(
                "{} convolutions of {:?} failed on the accelerator and were replaced by zeros",
                faults, source_path
            );
        }

        let result_path = result_path(output_dir, &source_path, filter);
        match codec::save_png(&result_path, &output) {
            Ok(()) => info!("Saved {:?}", result_path),
            Err(err) => error!("Failed to save {:?}: {:#}", result_path, anyhow!(err)),
        }
    }
}

/// Regular files with supported extensions directly inside the directory,
/// sorted by name.
fn collect_sources(input_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Failed to read directory entry: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && codec::is_supported_image(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

fn result_path(output_dir: &Path, source_path: &Path, filter: ea::EdgeFilter) -> PathBuf {
    let stem = source_path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    output_dir.join(format!("{}_{}.png", stem, filter.name()))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert()
    }

    #[test]
    fn menu_retries_until_valid_choice() {
        let mut input = Cursor::new("abc\n9\n4\n");
        let mut output = Vec::new();
        let filter = prompt_filter(&mut input, &mut output).unwrap();
        assert_eq!(filter, Some(ea::EdgeFilter::Roberts2x2));

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Invalid input!"));
        assert!(text.contains("Unknown filter selector: 9"));
    }

    #[test]
    fn menu_exit_and_end_of_input() {
        let mut output = Vec::new();
        let res = prompt_filter(&mut Cursor::new("6\n"), &mut output).unwrap();
        assert_eq!(res, None);
        let res = prompt_filter(&mut Cursor::new(""), &mut output).unwrap();
        assert_eq!(res, None);
    }

    #[test]
    fn batch_skips_broken_and_unsupported_files() {
        let root = std::env::temp_dir().join(format!("edge_batch_{}", std::process::id()));
        let input_dir = root.join("input");
        let output_dir = root.join("output");
        fs::create_dir_all(input_dir.join("c_folder.png")).unwrap();
        fs::write(input_dir.join("a_broken.png"), b"not an image").unwrap();
        fs::write(input_dir.join("notes.txt"), b"some notes").unwrap();
        let good = ea::GrayPlane::filled(codec::CANONICAL_WIDTH, codec::CANONICAL_HEIGHT, 80);
        codec::save_png(&input_dir.join("b_good.png"), &good).unwrap();

        assert_eq!(
            collect_sources(&input_dir),
            vec![input_dir.join("a_broken.png"), input_dir.join("b_good.png")]
        );

        let accelerator: Box<dyn ea::Accelerator> = Box::new(ea::SoftwareAccelerator::new());
        let mut session = ea::AcceleratorClient::open(accelerator).unwrap();
        process_batch(&mut session, ea::EdgeFilter::Sobel3x3, &input_dir, &output_dir);
        session.close().unwrap();

        let written: Vec<_> = fs::read_dir(&output_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(written, ["b_good_sobel_3x3.png"]);
        let result = codec::load_grayscale(&output_dir.join("b_good_sobel_3x3.png")).unwrap();
        assert_eq!(result.get(100, 100), 0);

        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn result_file_name() {
        let path = result_path(
            Path::new("output"),
            Path::new("input/cat.photo.JPG"),
            ea::EdgeFilter::Laplace5x5,
        );
        assert_eq!(path, Path::new("output/cat.photo_laplace_5x5.png"));
    }
}
