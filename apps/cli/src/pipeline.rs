use std::{path::Path, sync::Arc};

use anyhow::{Result, anyhow};
use indicatif::ProgressBar;
use tokio::sync::{broadcast, oneshot};
use vid2doc_core::{
    ContentStore, FrameProvider, MediaSource, TranscriptProvider,
    cache::{get_audio_path, get_frames_dir, get_transcript_path},
    events::{BusConfig, EventBus, EventBusBuilder},
    media::{FfmpegFrameProvider, YtDlpMediaSource},
    store::FsContentStore,
    transcript::{AudioTrackTranscriber, CachedTranscriptProvider},
    whisper::WhisperTranscriber,
    workers::{Worker, WorkerWiring},
};

use crate::workers::{
    assemble_report::AssembleReportWorker,
    cli_completion_sink::{CliCompletionSinkWorker, RunOutcome},
    cli_progress::CliProgressWorker,
    events::JobSpec,
    render_report::RenderReportWorker,
    resolve_media::ResolveMediaWorker,
    sample_frames::SampleFramesWorker,
    sectionize::SectionizeWorker,
    transcribe::TranscribeWorker,
};

/// The external systems one run talks to.
pub struct Collaborators {
    pub media: Arc<dyn MediaSource>,
    pub transcripts: Arc<dyn TranscriptProvider>,
    pub frames: Arc<dyn FrameProvider>,
    pub store: Arc<dyn ContentStore>,
}

impl Collaborators {
    /// yt-dlp, ffmpeg and whisper, with every artifact kept in the job's
    /// cache directory.
    pub async fn for_job(job: &JobSpec, model_dir: &Path, model_name: &str) -> Result<Self> {
        let whisper = WhisperTranscriber::new(model_dir, model_name);
        let audio = AudioTrackTranscriber::new(whisper, get_audio_path(&job.cache_dir))
            .force(job.force);
        let transcripts = CachedTranscriptProvider::new(audio, get_transcript_path(&job.cache_dir))
            .force(job.force);
        let store = FsContentStore::open(get_frames_dir(&job.cache_dir)).await?;

        Ok(Self {
            media: Arc::new(YtDlpMediaSource::new(job.force)),
            transcripts: Arc::new(transcripts),
            frames: Arc::new(FfmpegFrameProvider::new()),
            store: Arc::new(store),
        })
    }
}

pub struct PipelineHandle {
    pub bus: Arc<EventBus>,
    pub shutdown_tx: broadcast::Sender<()>,
    pub done_rx: oneshot::Receiver<RunOutcome>,
}

fn spawn_worker<W: Worker>(
    worker: W,
    wiring: &mut WorkerWiring,
    bus: &Arc<EventBus>,
    shutdown_rx: &broadcast::Receiver<()>,
) -> Result<()> {
    let inputs = wiring
        .take(W::SUBSCRIBER_ID)
        .ok_or_else(|| anyhow!("worker {} is not wired", W::SUBSCRIBER_ID))?;
    tokio::spawn(worker.run(inputs, Arc::clone(bus), shutdown_rx.resubscribe()));
    Ok(())
}

pub async fn start_pipeline(
    bus_config: BusConfig,
    collaborators: Collaborators,
    spinner: ProgressBar,
) -> Result<PipelineHandle> {
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let (done_tx, done_rx) = oneshot::channel::<RunOutcome>();

    let builder = EventBusBuilder::new(bus_config)
        .subscribe(ResolveMediaWorker::subscription())
        .subscribe(TranscribeWorker::subscription())
        .subscribe(SectionizeWorker::subscription())
        .subscribe(SampleFramesWorker::subscription())
        .subscribe(AssembleReportWorker::subscription())
        .subscribe(RenderReportWorker::subscription())
        .subscribe(CliProgressWorker::subscription())
        .subscribe(CliCompletionSinkWorker::subscription());

    let (bus, mut wiring, tasks) = builder.build()?;
    let bus = Arc::new(bus);

    // start isolated drain tasks BEFORE sources publish anything
    for t in tasks.tokio {
        tokio::spawn(t);
    }

    let Collaborators {
        media,
        transcripts,
        frames,
        store,
    } = collaborators;

    spawn_worker(ResolveMediaWorker::new(media), &mut wiring, &bus, &shutdown_rx)?;
    spawn_worker(TranscribeWorker::new(transcripts), &mut wiring, &bus, &shutdown_rx)?;
    spawn_worker(SectionizeWorker, &mut wiring, &bus, &shutdown_rx)?;
    spawn_worker(SampleFramesWorker::new(frames, store), &mut wiring, &bus, &shutdown_rx)?;
    spawn_worker(AssembleReportWorker, &mut wiring, &bus, &shutdown_rx)?;
    spawn_worker(RenderReportWorker::default(), &mut wiring, &bus, &shutdown_rx)?;
    spawn_worker(CliProgressWorker::new(spinner), &mut wiring, &bus, &shutdown_rx)?;
    spawn_worker(CliCompletionSinkWorker::new(done_tx), &mut wiring, &bus, &shutdown_rx)?;

    Ok(PipelineHandle {
        bus,
        shutdown_tx,
        done_rx,
    })
}
