//! eSpeak TTS: text → synthesizer WAV → rodio playback.
//!
//! Pipeline:
//! 1. Text → WAV file (espeak-ng `-w`, rate in words per minute)
//! 2. WAV → f32 samples (hound)
//! 3. Samples → rodio Sink at the configured volume, blocking until done

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStreamBuilder, Sink};
use tracing::{debug, info};

use super::SpeechError;
use crate::config::SpeechConfig;

/// Result of a speak operation with timing breakdown.
pub struct SpeakResult {
    pub generate: Duration,
    pub playback: Duration,
}

/// Decoded synthesizer output.
pub struct Audio {
    pub channels: u16,
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl Audio {
    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() / usize::from(self.channels.max(1));
        Duration::from_secs_f64(frames as f64 / f64::from(self.sample_rate.max(1)))
    }
}

pub struct EspeakTts {
    program: PathBuf,
    rate_wpm: u32,
    volume: f32,
    voice: Option<String>,
}

impl EspeakTts {
    pub fn new(program: PathBuf, config: &SpeechConfig) -> Self {
        Self {
            program,
            rate_wpm: config.rate_wpm,
            volume: config.volume.clamp(0.0, 1.0),
            voice: config.voice.clone(),
        }
    }

    fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Speak `text` and block until playback finishes.
    pub fn speak(&self, text: &str) -> Result<SpeakResult, SpeechError> {
        let t_gen = Instant::now();
        let audio = self.synthesize(text)?;
        let generate = t_gen.elapsed();
        debug!(
            "Synthesized {:.1}s of audio in {}ms",
            audio.duration().as_secs_f64(),
            generate.as_millis()
        );

        let t_play = Instant::now();
        self.play(audio)?;
        let playback = t_play.elapsed();
        info!("Spoke {} chars in {}ms", text.len(), playback.as_millis());

        Ok(SpeakResult { generate, playback })
    }

    /// Render `text` to audio without playing it.
    pub fn synthesize(&self, text: &str) -> Result<Audio, SpeechError> {
        let wav = tempfile::Builder::new()
            .prefix("tts-notify-")
            .suffix(".wav")
            .tempfile()
            .map_err(SpeechError::TempFile)?;

        let mut cmd = Command::new(&self.program);
        cmd.arg("-s").arg(self.rate_wpm.to_string()).arg("-w").arg(wav.path());
        if let Some(voice) = &self.voice {
            cmd.arg("-v").arg(voice);
        }
        // Text after `--` so leading dashes are not taken as options.
        cmd.arg("--").arg(text);

        let output = cmd.output().map_err(|source| SpeechError::Spawn {
            program: self.program_name(),
            source,
        })?;
        if !output.status.success() {
            return Err(SpeechError::Synthesis {
                program: self.program_name(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        decode_wav(wav.path())
    }

    /// Play samples through the default output device.
    fn play(&self, audio: Audio) -> Result<(), SpeechError> {
        if audio.samples.is_empty() {
            return Ok(());
        }

        let mut stream = OutputStreamBuilder::open_default_stream()?;
        stream.log_on_drop(false);

        let sink = Sink::connect_new(stream.mixer());
        sink.set_volume(self.volume);
        sink.append(SamplesBuffer::new(
            audio.channels,
            audio.sample_rate,
            audio.samples,
        ));
        sink.sleep_until_end();
        Ok(())
    }
}

/// Read a WAV file into interleaved f32 samples.
pub fn decode_wav(path: &Path) -> Result<Audio, SpeechError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(Audio {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn decodes_int_wav_into_unit_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.wav");
        write_wav(&path, &[0, i16::MAX, i16::MIN], 22050);

        let audio = decode_wav(&path).unwrap();
        assert_eq!(audio.channels, 1);
        assert_eq!(audio.sample_rate, 22050);
        assert_eq!(audio.samples.len(), 3);
        assert_eq!(audio.samples[0], 0.0);
        assert!(audio.samples[1] > 0.99 && audio.samples[1] <= 1.0);
        assert_eq!(audio.samples[2], -1.0);
    }

    #[test]
    fn duration_counts_frames() {
        let audio = Audio {
            channels: 2,
            sample_rate: 100,
            samples: vec![0.0; 400],
        };
        assert_eq!(audio.duration(), Duration::from_secs(2));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.wav");
        std::fs::write(&path, b"definitely not riff").unwrap();
        assert!(matches!(decode_wav(&path), Err(SpeechError::Decode(_))));
    }

    #[test]
    fn config_volume_is_clamped() {
        let config = SpeechConfig {
            volume: 3.0,
            ..SpeechConfig::default()
        };
        let tts = EspeakTts::new(PathBuf::from("/usr/bin/espeak-ng"), &config);
        assert_eq!(tts.volume, 1.0);
        assert_eq!(tts.rate_wpm, 180);
        assert_eq!(tts.program_name(), "espeak-ng");
    }

    #[cfg(unix)]
    #[test]
    fn failing_synthesizer_reports_stderr() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("espeak-ng");
        std::fs::write(&script, "#!/bin/sh\necho 'ALSA lib: no card' >&2\nexit 1\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let tts = EspeakTts::new(script, &SpeechConfig::default());
        let err = tts.synthesize("hello").err().expect("synthesis fails");
        assert!(matches!(err, SpeechError::Synthesis { .. }));
        assert!(err.to_string().contains("ALSA lib: no card"));
        assert!(err.is_environment_failure());
    }
}
