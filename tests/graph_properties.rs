//! End-to-end behaviour of assembled graphs.

use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand::rngs::StdRng;
use unitgen::driver::{RenderConfig, Renderer};
use unitgen::wave::{WaveBuffer, WaveGenerator};
use unitgen::{
    Context, Mixer, Node, Noise, Oscillator, Panner, Result, Synthesize, Tick, scale,
};

const SAMPLE_RATE: f64 = 44100.0;

/// Counts how often it is asked to synthesize.
struct Probe {
    calls: Arc<Mutex<usize>>,
}

impl Synthesize for Probe {
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
        *self.calls.lock().unwrap() += 1;
        Ok(vec![0.5; ctx.num_frames])
    }
}

#[test]
fn test_shared_node_computes_once_per_tick() {
    let calls = Arc::new(Mutex::new(0));
    let shared = Node::new(Probe {
        calls: Arc::clone(&calls),
    });

    // Two parents, and a parent of both: a diamond.
    let left = &shared * 2.0;
    let right = &shared + 1.0;
    let top = &left + &right;

    let mut tick = Tick::new(0);
    for _ in 0..3 {
        let block = top.generate(tick, 64, SAMPLE_RATE).unwrap();
        assert!(block.samples.iter().all(|&s| s == 2.5));
        tick = tick.next();
    }
    assert_eq!(*calls.lock().unwrap(), 3);
    assert_eq!(shared.cursor(), 3 * 64);
}

#[test]
fn test_sine_blocks_join_without_discontinuity() {
    let chunked = Node::new(Oscillator::sine(1234.5));
    let whole = Node::new(Oscillator::sine(1234.5));

    let mut joined = Vec::new();
    let mut tick = Tick::new(0);
    for _ in 0..16 {
        joined.extend(chunked.generate(tick, 100, SAMPLE_RATE).unwrap().samples);
        tick = tick.next();
    }
    let single = whole.generate(Tick::new(0), 1600, SAMPLE_RATE).unwrap().samples;

    assert_eq!(joined.len(), single.len());
    for (a, b) in joined.iter().zip(&single) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn test_mixer_order_does_not_matter() {
    let build = |swap: bool| {
        let a = Node::new(Noise::with_rng(StdRng::seed_from_u64(1)));
        let b = Node::new(Oscillator::square(300.0));
        let mut mixer = Mixer::new();
        if swap {
            mixer.add(b).unwrap();
            mixer.add(a).unwrap();
        } else {
            mixer.add(a).unwrap();
            mixer.add(b).unwrap();
        }
        Node::new(mixer)
    };

    let ab = build(false).generate(Tick::new(0), 256, SAMPLE_RATE).unwrap();
    let ba = build(true).generate(Tick::new(0), 256, SAMPLE_RATE).unwrap();
    assert_eq!(ab, ba);
}

#[test]
fn test_pan_extremes_isolate_channels() {
    let frames = |pan: f64| {
        let tone = Node::new(Oscillator::sine(440.0));
        let reference = tone.generate(Tick::new(0), 32, SAMPLE_RATE).unwrap().samples;
        tone.set_cursor(0);
        tone.with(|o| o.reset());
        let panned = Node::new(Panner::new(tone, pan).unwrap());
        let out = panned.generate(Tick::new(1), 32, SAMPLE_RATE).unwrap().samples;
        (reference, out)
    };

    let (reference, out) = frames(0.0);
    for (frame, x) in out.chunks(2).zip(&reference) {
        assert_eq!(frame, [*x, 0.0]);
    }

    let (reference, out) = frames(1.0);
    for (frame, x) in out.chunks(2).zip(&reference) {
        assert_eq!(frame, [0.0, *x]);
    }

    let (_, out) = frames(0.5);
    for frame in out.chunks(2) {
        assert_eq!(frame[0], frame[1]);
    }
}

#[test]
fn test_looped_playback_wraps_to_frame_zero() {
    let source: Vec<f64> = (0..7).map(|i| i as f64 / 7.0).collect();
    let buffer = WaveBuffer::from_samples(source.clone(), 1).unwrap();
    let player = Node::new(WaveGenerator::new(buffer).unwrap().with_loop(true));

    let mut played = Vec::new();
    let mut tick = Tick::new(0);
    for _ in 0..5 {
        let block = player.generate(tick, 4, SAMPLE_RATE).unwrap();
        assert!(block.continues);
        played.extend(block.samples);
        tick = tick.next();
    }
    let expected: Vec<f64> = source.iter().copied().cycle().take(20).collect();
    assert_eq!(played, expected);
}

#[test]
fn test_duration_ends_node_after_elapsed_time() {
    let tone = Node::new(Oscillator::sine(100.0)).with_duration(0.25);
    // 100 frames per second, 10 frames per block
    let mut tick = Tick::new(0);
    for block_index in 1..=5 {
        let block = tone.generate(tick, 10, 100.0).unwrap();
        let elapsed = block_index as f64 * 0.1;
        assert_eq!(block.continues, elapsed <= 0.25, "after {elapsed}s");
        tick = tick.next();
    }
}

#[test]
fn test_scaled_output_stays_in_target_range() {
    let lfo = Node::new(Oscillator::triangle(3.0));
    let cutoff = scale(&lfo, (200.0, 2000.0));
    assert_eq!(cutoff.range(), (200.0, 2000.0));

    let samples = cutoff.generate(Tick::new(0), 44100, SAMPLE_RATE).unwrap().samples;
    assert!(samples.iter().all(|&f| (200.0 - 1e-9..=2000.0 + 1e-9).contains(&f)));
    // The sweep actually covers most of the range.
    let max = samples.iter().copied().fold(f64::MIN, f64::max);
    let min = samples.iter().copied().fold(f64::MAX, f64::min);
    assert!(max > 1900.0 && min < 300.0);
}

#[test]
fn test_renderer_drives_a_full_graph() {
    let config = RenderConfig::default().with_block_frames(128);
    let mut renderer = Renderer::new(config).unwrap();

    let voice = Node::new(Oscillator::sine(220.0)).with_duration(0.01);
    let mixer = Node::new(Mixer::new());
    mixer.with(|m| m.add(&voice)).unwrap();
    renderer.set_root(&mixer).unwrap();

    let audio = renderer.render(0.05).unwrap();
    assert_eq!(audio.len() % 256, 0);
    assert!(mixer.with(|m| m.is_empty()));
    // Once the voice is gone the mixer is silent.
    assert!(audio[audio.len() - 256..].iter().all(|&s| s == 0.0));
}

#[test]
fn test_voice_outlives_its_finished_modulator() {
    let lfo = Node::new(Oscillator::sine(5.0)).with_duration(0.01);
    let voice = Node::new(Oscillator::sine(440.0)) * (0.5 + &lfo * 0.25);
    assert_eq!(voice.duration(), None);

    let mixer = Node::new(Mixer::new());
    mixer.with(|m| m.add(&voice)).unwrap();

    let mut tick = Tick::new(0);
    for _ in 0..3 {
        let block = voice.generate(tick, 1024, SAMPLE_RATE).unwrap();
        assert!(block.continues);
        mixer.generate(tick, 1024, SAMPLE_RATE).unwrap();
        tick = tick.next();
    }
    assert!(!lfo.generate(Tick::ALWAYS, 1, SAMPLE_RATE).unwrap().continues);
    assert_eq!(mixer.with(|m| m.len()), 1);
}
