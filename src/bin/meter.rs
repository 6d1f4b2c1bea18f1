use clap::{Parser, Subcommand};
use std::error::Error;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use analog_meter_reader::dial_gen::{write_corpus, DialStyle};
use analog_meter_reader::logging::init_logging;
use analog_meter_reader::{DigitClassifier, GridMapping, MeterConfig, NeedleChannel};

#[derive(Parser, Debug)]
#[command(name = "meter", about = "Read analog dial digits from images", version)]
struct Cli {
    /// Log every classification
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify image files, or every image inside the given directories
    Read {
        /// Image files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Needle colour channel: r, g or b
        #[arg(short, long, default_value = "r")]
        channel: String,

        /// JSON grid mapping replacing the reference 10x10 table
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Write `<stem>_grid.png` and `<stem>_scores.json` for each image here
        #[arg(short = 'd', long = "debug-dir")]
        debug_dir: Option<PathBuf>,
    },
    /// Write a labeled corpus of synthetic dials: `<out>/<digit>/dial_<n>.png`
    Generate {
        #[arg(short, long)]
        out: PathBuf,

        /// Image sizes as WxH, repeatable
        #[arg(
            short,
            long = "size",
            value_parser = parse_size,
            default_values = ["200x200", "333x287"]
        )]
        sizes: Vec<(u32, u32)>,
    },
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got {s:?}"))?;
    let w: u32 = w.trim().parse().map_err(|_| format!("bad width in {s:?}"))?;
    let h: u32 = h.trim().parse().map_err(|_| format!("bad height in {s:?}"))?;
    if w == 0 || h == 0 {
        return Err(format!("size must be non-zero, got {s:?}"));
    }
    Ok((w, h))
}

fn is_image_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(OsStr::to_str) else {
        return false;
    };
    matches!(
        ext.to_ascii_lowercase().as_str(),
        "png" | "jpg" | "jpeg" | "bmp" | "gif" | "tif" | "tiff" | "webp"
    )
}

fn collect_images(paths: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut images = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(path)?
                .filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|p| p.is_file() && is_image_file(p))
                .collect();
            found.sort();
            images.extend(found);
        } else {
            images.push(path.clone());
        }
    }
    Ok(images)
}

fn write_debug(
    classifier: &DigitClassifier,
    image: &image::DynamicImage,
    image_path: &Path,
    dir: &Path,
) -> Result<u8, Box<dyn Error>> {
    let (digit, record) = classifier.classify_with_debug(image)?;
    fs::create_dir_all(dir)?;
    let stem = image_path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("image");
    record.save_overlay(&dir.join(format!("{stem}_grid.png")))?;
    fs::write(dir.join(format!("{stem}_scores.json")), record.scores_json()?)?;
    Ok(digit)
}

fn read(
    paths: &[PathBuf],
    channel: &str,
    mapping: Option<&Path>,
    debug_dir: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let needle_channel: NeedleChannel = channel.parse()?;
    let mapping = match mapping {
        Some(path) => GridMapping::from_json_str(&fs::read_to_string(path)?)?,
        None => GridMapping::reference(),
    };
    let classifier = DigitClassifier::new(MeterConfig {
        needle_channel,
        mapping,
        ..MeterConfig::default()
    });

    let images = collect_images(paths)?;
    if images.is_empty() {
        tracing::warn!("no images found");
        return Ok(());
    }

    for image_path in &images {
        let img = match image::open(image_path) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!("failed to open {}: {e}", image_path.display());
                continue;
            }
        };

        let result = match debug_dir {
            Some(dir) => write_debug(&classifier, &img, image_path, dir),
            None => classifier.classify(&img).map_err(Into::into),
        };
        match result {
            Ok(digit) => println!("{}: {digit}", image_path.display()),
            Err(e) => tracing::error!("classification failed for {}: {e}", image_path.display()),
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Read {
            paths,
            channel,
            mapping,
            debug_dir,
        } => read(&paths, &channel, mapping.as_deref(), debug_dir.as_deref()),
        Command::Generate { out, sizes } => {
            let written = write_corpus(&out, &sizes, &DialStyle::default())?;
            println!("wrote {} images to {}", written.len(), out.display());
            Ok(())
        }
    }
}
