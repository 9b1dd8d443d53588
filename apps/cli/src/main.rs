use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::Parser;
use console::style;
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use vid2doc_core::{
    PipelineConfig,
    cache::{find_video_in_cache, get_cache_dir, get_model_dir, get_root_cache_dir},
    events::BusConfig,
    whisper::DEFAULT_MODEL_NAME,
};

use crate::{
    pipeline::{Collaborators, start_pipeline},
    progress::{create_spinner, format_duration},
    workers::events::{JobSpec, MediaRequested},
};

mod pipeline;
mod progress;
mod render;
mod workers;

#[derive(Parser)]
#[command(name = "vid2doc")]
#[command(
    about = "Turn a video into a document of transcript sections illustrated with sampled frames"
)]
struct Cli {
    /// Video URL
    url: String,

    /// Minimum length of a section in seconds
    #[arg(long, default_value_t = 60.0)]
    section_duration: f64,

    /// Seconds between sampled frames inside a section
    #[arg(long, default_value_t = 30.0)]
    frame_interval: f64,

    /// Sections sampled concurrently
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,

    /// Give up on a single frame after this many seconds
    #[arg(long, default_value_t = 30)]
    frame_timeout: u64,

    /// Whisper model file, downloaded into the cache on first use
    #[arg(short, long, default_value = DEFAULT_MODEL_NAME)]
    model: String,

    /// Where to write the HTML report
    #[arg(short, long, default_value = "output/report.html")]
    output: PathBuf,

    /// Cache root, defaults to the platform cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Force re-processing even if cached files exist
    #[arg(short, long)]
    force: bool,

    /// Delete the downloaded video when done
    #[arg(long)]
    cleanup: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            section_duration: self.section_duration,
            frame_interval: self.frame_interval,
            jobs: self.jobs,
            frame_timeout: Duration::from_secs(self.frame_timeout),
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "warn,vid2doc=info,vid2doc_core=info",
        _ => "warn,vid2doc=debug,vid2doc_core=debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(true),
        )
        .with(env_filter)
        .init();
}

extern "C" fn whisper_log_callback(
    _level: u32,
    _message: *const std::ffi::c_char,
    _user_data: *mut std::ffi::c_void,
) {
    // silent
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", style("Error:").red().bold(), message);
    std::process::exit(1);
}

async fn cleanup_media(cache_dir: &Path) {
    let Some(video) = find_video_in_cache(cache_dir) else {
        return;
    };
    match fs::remove_file(&video).await {
        Ok(()) => info!(path = %video.display(), "removed downloaded video"),
        Err(e) => warn!(path = %video.display(), error = %e, "could not remove video"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Suppress whisper.cpp logs
    unsafe {
        whisper_rs::set_log_callback(Some(whisper_log_callback), std::ptr::null_mut());
    }

    let config = cli.pipeline_config();
    if let Err(e) = config.validate() {
        fail(e);
    }

    let total_start = Instant::now();
    let root_cache_dir = get_root_cache_dir(cli.cache_dir.as_deref());
    let cache_dir = get_cache_dir(&root_cache_dir, &cli.url);
    let job = JobSpec {
        url: cli.url.clone(),
        force: cli.force,
        config,
        cache_dir: cache_dir.clone(),
        output_path: cli.output.clone(),
    };

    println!("{} {}", style("Video:").dim(), style(&job.url).cyan());

    let collaborators =
        Collaborators::for_job(&job, &get_model_dir(&root_cache_dir), &cli.model).await?;
    let spinner = create_spinner("Resolving media...");
    let handle =
        start_pipeline(BusConfig::new_session(false), collaborators, spinner.clone()).await?;

    handle.bus.publish(Arc::new(MediaRequested::new(job)));

    let outcome = tokio::select! {
        outcome = handle.done_rx => Some(outcome?),
        _ = tokio::signal::ctrl_c() => None,
    };
    let _ = handle.shutdown_tx.send(());
    spinner.finish_and_clear();

    if cli.cleanup {
        cleanup_media(&cache_dir).await;
    }

    match outcome {
        Some(Ok(rendered)) => {
            println!(
                "\n{} {}",
                style("Total time:").dim(),
                style(format_duration(total_start.elapsed())).cyan().bold()
            );
            println!(
                "{} {} ({} sections)",
                style("Saved:").dim(),
                style(rendered.output_path.display()).cyan(),
                rendered.report.sections.len()
            );
            Ok(())
        }
        Some(Err(failed)) => fail(failed),
        None => {
            eprintln!("{}", style("Interrupted").yellow());
            std::process::exit(130);
        }
    }
}
