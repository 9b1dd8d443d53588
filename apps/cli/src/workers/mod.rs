pub mod assemble_report;
pub mod cli_completion_sink;
pub mod cli_progress;
pub mod events;
pub mod render_report;
pub mod resolve_media;
pub mod sample_frames;
pub mod sectionize;
pub mod transcribe;
