//! Offline render of a small patch to a WAV file.
//!
//! Usage: cargo run --example render_wav [output.wav] [seconds]
//!
//! Set RUST_LOG=debug to watch voices being pruned as they finish.

use anyhow::Result;
use std::sync::{Arc, Mutex};
use unitgen::driver::{Recorder, RenderConfig, Renderer};
use unitgen::{
    Envelope, Interpolation, IntoNode, Mixer, Node, Noise, Oscillator, Panner, StereoTrack, scale,
};

const SAMPLE_RATE: f64 = 44100.0;

/// A decaying bell-ish voice: a sine whose pitch is wobbled by a second sine.
fn bell(frequency: f64, start: f64, pan: f64) -> Result<Node> {
    let mut points = vec![(0.0, 0.0001)];
    if start > 0.0 {
        points.push((start, 0.0001));
    }
    points.extend([(start + 0.005, 0.5), (start + 1.5, 0.0001)]);
    let decay = Envelope::new(points)?
        .with_interpolation(Interpolation::Logarithmic)?
        .holding();
    let wobble = Node::new(Oscillator::sine(frequency * 1.4));
    let tone = Node::new(Oscillator::sine(frequency + wobble * (frequency * 0.3)));
    let voice = (tone * Node::new(decay)).with_duration(start + 1.5);
    Ok(Node::new(Panner::new(voice, pan)?).into_node())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "unitgen-demo.wav".to_string());
    let seconds: f64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(4.0);

    // Bells, each panned and pruned from the mixer when it finishes.
    let mut bells = Mixer::new().with_gain(0.6);
    for (i, (frequency, pan)) in [(523.25, 0.2), (659.25, 0.8), (783.99, 0.4), (1046.5, 0.6)]
        .into_iter()
        .enumerate()
    {
        bells.add(bell(frequency, i as f64 * 0.5, pan)?)?;
    }

    // Noise under a slow swell, drifting across the stereo field.
    let swell = Node::new(Oscillator::sine(0.25));
    let breath = Node::new(Noise::new()) * scale(&swell, (0.0, 0.05));
    let wind = Node::new(StereoTrack::new(Node::new(Oscillator::triangle(0.1)))?);
    wind.with(|t| t.add(breath))?;

    let master = Node::new(Mixer::new());
    master.with(|m| -> unitgen::Result<()> {
        m.add(Node::new(bells))?;
        m.add(&wind)
    })?;

    let config = RenderConfig::default().with_sample_rate(SAMPLE_RATE);
    let recorder = Arc::new(Mutex::new(Recorder::new(config.channels, SAMPLE_RATE)?));
    recorder.lock().unwrap().start();

    let mut renderer = Renderer::new(config)?;
    renderer.set_root(&master)?;
    renderer.add_listener(Arc::clone(&recorder));
    renderer.render(seconds)?;

    let samples = recorder.lock().unwrap().stop();
    let spec = hound::WavSpec {
        channels: config.channels as u16,
        sample_rate: SAMPLE_RATE as u32,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec)?;
    for sample in &samples {
        writer.write_sample((sample.clamp(-1.0, 1.0) * f64::from(i16::MAX)) as i16)?;
    }
    writer.finalize()?;

    println!(
        "Wrote {} frames ({seconds}s) to {path}",
        samples.len() / config.channels
    );
    Ok(())
}
