use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig,
};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    config::InstrumentConfig,
    engine::{
        tap::{AnalysisTap, TapWriter},
        AudioBackend,
    },
    error::EngineError,
    synth::{
        message::VoiceMessage,
        mixer::{VoiceCounters, VoiceMixer},
    },
    MAX_BLOCK_SIZE,
};

/// Capacity of the control ring. Far above what a keyboard can produce
/// between two audio callbacks.
const CONTROL_QUEUE_SIZE: usize = 256;

/// Audio engine playing through the default output device.
///
/// Owns the cpal stream; dropping the engine stops audio. The mixer lives
/// inside the output callback and is only reachable through messages.
pub struct AudioEngine {
    tx: Producer<VoiceMessage>,
    clock: Arc<AtomicU64>,
    sample_rate: f32,
    counters: Arc<VoiceCounters>,
    _stream: Stream,
}

impl AudioEngine {
    /// Open the default output device and start streaming.
    ///
    /// Returns the engine and the UI end of its analysis tap.
    pub fn start(config: &InstrumentConfig) -> Result<(Self, AnalysisTap), EngineError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(EngineError::NoOutputDevice)?;
        let supported = device.default_output_config()?;

        let sample_format = supported.sample_format();
        let stream_config = StreamConfig::from(supported);
        let sample_rate = stream_config.sample_rate.0 as f32;
        let channels = stream_config.channels as usize;

        let (tx, rx) = RingBuffer::<VoiceMessage>::new(CONTROL_QUEUE_SIZE);
        let (tap, reader) = AnalysisTap::new(config.tap_len);
        let mixer = VoiceMixer::new(sample_rate, config.max_voices, &config.envelope);
        let counters = mixer.counters();
        let clock = Arc::new(AtomicU64::new(0));

        let state = CallbackState {
            mixer,
            rx,
            tap,
            clock: Arc::clone(&clock),
            render_buf: vec![0.0; MAX_BLOCK_SIZE],
            channels,
        };

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, state),
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, state),
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, state),
            other => return Err(EngineError::UnsupportedSampleFormat(other)),
        }?;
        stream.play()?;

        tracing::info!(
            device = device.name().unwrap_or_default(),
            sample_rate,
            channels,
            ?sample_format,
            "audio engine started"
        );

        let engine = Self {
            tx,
            clock,
            sample_rate,
            counters,
            _stream: stream,
        };
        Ok((engine, reader))
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn counters(&self) -> &VoiceCounters {
        &self.counters
    }
}

impl AudioBackend for AudioEngine {
    fn now(&self) -> f64 {
        self.clock.load(Ordering::Acquire) as f64 / self.sample_rate as f64
    }

    fn send(&mut self, msg: VoiceMessage) -> Result<(), EngineError> {
        self.tx.push(msg).map_err(|_| EngineError::QueueFull)
    }
}

/// Everything the output callback owns.
struct CallbackState {
    mixer: VoiceMixer,
    rx: Consumer<VoiceMessage>,
    tap: TapWriter,
    clock: Arc<AtomicU64>,
    render_buf: Vec<f32>,
    channels: usize,
}

impl CallbackState {
    fn fill<T: Sample + FromSample<f32>>(&mut self, data: &mut [T]) {
        self.mixer.drain(&mut self.rx);

        let channels = self.channels;
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

            let block = &mut self.render_buf[..frames_to_render];
            self.mixer.render_block(block);
            self.tap.push_block(block);

            // Duplicate mono to all channels and write to device
            let out_off = frames_written * channels;
            for (i, &s) in block.iter().enumerate() {
                let value = T::from_sample(s.clamp(-1.0, 1.0));
                for ch in 0..channels {
                    data[out_off + i * channels + ch] = value;
                }
            }

            frames_written += frames_to_render;
        }

        self.clock.fetch_add(total_frames as u64, Ordering::Release);
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut state: CallbackState,
) -> Result<Stream, EngineError>
where
    T: SizedSample + FromSample<f32>,
{
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| state.fill(data),
        |err| tracing::error!("audio stream error: {err}"),
        None,
    )?;
    Ok(stream)
}
