use log::{error, info};
use sift_cli::{limit_width, render_matches, Sift, SiftResult};
use sift_core::{init_thread_pool, Image};
use sift_scale::{DetectorBuilder, DetectorConfig};
use std::path::PathBuf;
use std::time::Instant;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "sift", about = "Detect, describe and match scale-invariant keypoints between two images")]
struct Opt {
    /// Parameter preset: default, sparse, dense or fine.
    #[structopt(short, long, default_value = "default")]
    preset: String,
    /// Override the nearest/second-nearest ratio.
    #[structopt(short, long)]
    ratio: Option<f32>,
    /// Worker threads (defaults to the number of CPUs).
    #[structopt(short, long)]
    threads: Option<usize>,
    /// Images wider than this are downscaled before detection.
    #[structopt(long, default_value = "480")]
    max_width: u32,
    /// Number of matches drawn in the output image.
    #[structopt(long, default_value = "50")]
    max_matches: usize,
    /// Where to write the side-by-side match rendering.
    #[structopt(short, long, parse(from_os_str), default_value = "matches.png")]
    output: PathBuf,
    /// First image.
    #[structopt(parse(from_os_str))]
    image_a: PathBuf,
    /// Second image.
    #[structopt(parse(from_os_str))]
    image_b: PathBuf,
}

fn preset_config(name: &str) -> DetectorConfig {
    match name {
        "sparse" => DetectorConfig::sparse_preset(),
        "dense" => DetectorConfig::dense_preset(),
        "fine" => DetectorConfig::fine_scale_preset(),
        _ => DetectorConfig::new(),
    }
}

fn run(opt: Opt) -> SiftResult<()> {
    let mut builder = DetectorBuilder::from_config(preset_config(&opt.preset));
    if let Some(ratio) = opt.ratio {
        builder = builder.match_ratio(ratio);
    }
    if let Some(threads) = opt.threads {
        builder = builder.threads(threads);
    }
    let config = builder.to_config();
    info!("{}", config.summary());

    init_thread_pool(config.core.n_threads)?;
    let sift = Sift::from_config(config)?;

    let gray_a = limit_width(image::open(&opt.image_a)?, opt.max_width).to_luma8();
    let gray_b = limit_width(image::open(&opt.image_b)?, opt.max_width).to_luma8();

    let t0 = Instant::now();
    let (kps_a, desc_a) = sift.detect_and_compute(&Image::from_luma8(&gray_a)?)?;
    let (kps_b, desc_b) = sift.detect_and_compute(&Image::from_luma8(&gray_b)?)?;
    let matches = sift.match_descriptors(&desc_a, &desc_b);
    let elapsed = t0.elapsed();

    println!("Time taken: {:.2?}", elapsed);
    println!("Image A: {} keypoints", kps_a.len());
    println!("Image B: {} keypoints", kps_b.len());
    println!("Matches: {}", matches.len());

    let shown = &matches[..matches.len().min(opt.max_matches)];
    let canvas = render_matches(&gray_a, &gray_b, &kps_a, &kps_b, shown)?;
    canvas.save(&opt.output)?;
    println!("Saved {} matches to {}", shown.len(), opt.output.display());
    Ok(())
}

fn main() {
    pretty_env_logger::init_timed();
    let opt = Opt::from_args();
    if let Err(e) = run(opt) {
        error!("{}", e);
        std::process::exit(1);
    }
}
