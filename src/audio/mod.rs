/*!
 * Audio processing boundary.
 *
 * The engine never touches samples directly; it addresses clips by
 * `(file, start, end)` through the `AudioBackend` port and the concrete
 * ffmpeg implementation behind it:
 * - `backend`: the injected audio-transform port
 * - `ffmpeg`: ffmpeg/ffprobe implementation of the port
 * - `equalizer`: corpus loudness pre-pass
 * - `render`: serial rendering of an assembled timeline to one output file
 */

pub mod backend;
pub mod ffmpeg;
pub mod equalizer;
pub mod render;

// Re-export main types
pub use backend::AudioBackend;
pub use equalizer::VolumeEqualizer;
pub use ffmpeg::FfmpegBackend;
pub use render::TimelineRenderer;
