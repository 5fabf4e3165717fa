use clap::{ArgAction, Parser};
use crop_search::config::{self, ProcessingConfig};
use crop_search::imaging::RustBackend;
use crop_search::run::{self, MaskPolicy, RunOptions};
use crop_search::search::{SearchEvent, SearchParams};
use crop_search::output;
use std::path::PathBuf;
use std::sync::mpsc;

#[derive(Parser)]
#[command(name = "crop-search")]
#[command(about = "Rank resize/crop candidates of an image by estimated detail loss")]
#[command(long_about = "\
Rank resize/crop candidates of an image by estimated detail loss

Every candidate resizes the image to a width between 256 and 256 + SCALE_RANGE,
center-crops it to 256x192, and optionally shifts the crop by up to 7 pixels
on a canvas padded with the image's dominant color. Each candidate is scored
per 8x8 cell: the two most frequent colors of a cell are free, every other
pixel counts as lost detail. Lower is better.

The 8 lowest-rated candidates and the second-highest are written to the
output directory:

  <OUTPUT_DIR>/<file>_best_<i>_rate<r>_s<scale>_xoff<x>_yoff<y><ext>

A mask named mask_<file> next to the image marks important regions; lost
pixels under non-black mask pixels add PENALTY each.

Examples:
  crop-search photo.png
  crop-search photo.png -s 64 --ss 4
  crop-search photo.png ./out -s 10 -o false --report")]
#[command(version)]
struct Cli {
    /// Source image
    #[arg(required_unless_present = "gen_config")]
    image: Option<PathBuf>,

    /// Directory for the best/worst results
    #[arg(default_value = "./best")]
    output_dir: PathBuf,

    /// Search scales from 256 up to 256 + SCALE_RANGE
    #[arg(short = 's', long, default_value_t = 0)]
    scale_range: u32,

    /// Distance between searched scales (values <= 0 mean 1)
    #[arg(long, visible_alias = "ss", default_value_t = 1, allow_negative_numbers = true)]
    scale_step: i64,

    /// Rate all 64 offsets inside a cell instead of only (0, 0)
    #[arg(short = 'o', long, default_value_t = true, action = ArgAction::Set)]
    offsets: bool,

    /// Require mask_<file>; abort if it cannot be loaded
    #[arg(short = 'm', long, default_value_t = false, action = ArgAction::Set)]
    mask: bool,

    /// Penalty per lost pixel under the mask
    #[arg(short = 'p', long, default_value_t = 1)]
    penalty: u64,

    /// Use every CPU core (false: a single worker)
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    maxcpu: bool,

    /// TOML config overriding grid, selection and processing settings
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Also write <file>_ratings.json with every candidate's rating
    #[arg(long)]
    report: bool,

    /// Print a documented config.toml and exit
    #[arg(long)]
    gen_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }
    let image_path = cli.image.ok_or("missing source image")?;

    let config = config::load_config(cli.config.as_deref())?;
    init_thread_pool(&config.processing, cli.maxcpu);

    let options = RunOptions {
        image_path: image_path.clone(),
        output_dir: cli.output_dir,
        params: SearchParams {
            scale_range: cli.scale_range,
            scale_step: cli.scale_step.clamp(1, u32::MAX as i64) as u32,
            offsets: cli.offsets,
            mask_penalty: cli.penalty,
        },
        mask: if cli.mask {
            MaskPolicy::Required
        } else {
            MaskPolicy::Optional
        },
        config,
        report: cli.report,
    };

    let source = image_path.display().to_string();
    let (tx, rx) = mpsc::channel();
    let printer = std::thread::spawn(move || {
        let mut done = 0;
        for event in rx {
            if let Some(line) = output::format_search_start(&event, &source) {
                println!("{}", line);
            }
            if let SearchEvent::CandidateRated { total, .. } = event {
                done += 1;
                if let Some(line) = output::format_progress(done, total) {
                    println!("{}", line);
                }
            }
        }
    });

    let result = run::run(&options, &RustBackend::new(), Some(tx));
    printer.join().map_err(|_| "progress printer panicked")?;
    let summary = result?;
    output::print_run_summary(&summary);

    Ok(())
}

/// Initialize the rayon thread pool.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &ProcessingConfig, max_cpu: bool) {
    let threads = config::effective_threads(processing, max_cpu);
    log::info!("rating with {threads} worker thread(s)");
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
