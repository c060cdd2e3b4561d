//! Interactive stereo track demo.
//!
//! A looped arpeggio (rendered into memory at startup) and a soft drone share
//! one StereoTrack. The arpeggio runs through a SpeedModulator.
//!
//! Space  play/pause the arpeggio
//! L      toggle looping
//! Left/Right  pan, C centre, W auto-pan
//! +/-    playback speed
//! N      add a short blip (removed automatically when it ends)
//! Q/ESC  quit

mod common;

use anyhow::Result;
use common::{DemoAudioState, run_interactive_demo};
use crossterm::{ExecutableCommand, event::KeyCode};
use std::io::{Write, stdout};
use std::sync::{Arc, Mutex};
use unitgen::driver::{RenderConfig, Renderer};
use unitgen::wave::{EndPolicy, SpeedModulator, WaveBuffer, WaveGenerator};
use unitgen::{Envelope, Node, Oscillator, StereoTrack, Tick};

/// A plucked note: triangle wave under a fast attack and decay.
fn pluck(frequency: f64, seconds: f64, sample_rate: f64) -> Result<Vec<f64>> {
    let amp = Envelope::new([(0.0, 0.0), (0.005, 0.6), (seconds, 0.0)])?.holding();
    let note = Node::new(Oscillator::triangle(frequency)) * Node::new(amp);
    let frames = (seconds * sample_rate) as usize;
    Ok(note.generate(Tick::new(0), frames, sample_rate)?.samples)
}

struct TrackState {
    renderer: Renderer,
    track: Node<StereoTrack>,
    player: Node<WaveGenerator<WaveBuffer>>,
    speed: Node<SpeedModulator>,
    pan: f64,
    auto_pan: bool,
    sample_rate: f64,
}

impl TrackState {
    fn new(config: RenderConfig) -> Result<Self> {
        let sample_rate = config.sample_rate;

        let mut arpeggio = Vec::new();
        for frequency in [261.63, 329.63, 392.0, 523.25, 392.0, 329.63] {
            arpeggio.extend(pluck(frequency, 0.18, sample_rate)?);
        }
        let buffer = WaveBuffer::from_samples(arpeggio, 1)?;
        // Without looping the arpeggio rewinds at the end instead of leaving the track.
        let player = Node::new(
            WaveGenerator::new(buffer)?
                .with_loop(true)
                .with_end_policy(EndPolicy::Rewind),
        );
        let speed = Node::new(SpeedModulator::new(&player, 1.0)?);

        let lfo = Node::new(Oscillator::sine(0.2));
        let drone = Node::new(Oscillator::sine(130.81 + &lfo * 0.5)) * 0.08;

        let track = Node::new(StereoTrack::new(0.5)?);
        track.with(|t| -> unitgen::Result<()> {
            t.add(&speed)?;
            t.add(drone)
        })?;

        let mut renderer = Renderer::new(config)?;
        renderer.set_root(&track)?;

        Ok(Self {
            renderer,
            track,
            player,
            speed,
            pan: 0.5,
            auto_pan: false,
            sample_rate,
        })
    }

    fn nudge_pan(&mut self, delta: f64) -> Result<()> {
        self.pan = (self.pan + delta).clamp(0.0, 1.0);
        self.auto_pan = false;
        let pan = self.pan;
        self.track.with(|t| t.set_pan(pan))?;
        Ok(())
    }

    fn nudge_speed(&mut self, factor: f64) -> Result<()> {
        self.speed.with(|s| {
            let speed = (s.speed() * factor).clamp(0.25, 4.0);
            s.set_speed(speed)
        })?;
        Ok(())
    }

    fn blip(&mut self) -> Result<()> {
        let amp = Envelope::new([(0.0, 0.0), (0.01, 0.3), (0.25, 0.0)])?.holding();
        let voice = (Node::new(Oscillator::square(880.0)) * Node::new(amp)).with_duration(0.25);
        self.track.with(|t| t.add(voice))?;
        Ok(())
    }
}

impl DemoAudioState for TrackState {
    fn renderer(&mut self) -> &mut Renderer {
        &mut self.renderer
    }
}

fn draw_ui(state: &TrackState) -> Result<()> {
    let mut stdout = stdout();
    stdout.execute(crossterm::terminal::Clear(
        crossterm::terminal::ClearType::All,
    ))?;
    stdout.execute(crossterm::cursor::MoveTo(0, 0))?;

    let (paused, looping) = state.player.with(|p| (p.is_paused(), p.is_looping()));
    let speed = state.speed.with(|s| s.speed());
    let voices = state.track.with(|t| t.mixer().with(|m| m.len()));
    let pan = if state.auto_pan {
        "auto".to_string()
    } else {
        format!("{:.1}", state.pan)
    };
    write!(
        stdout,
        "{} | loop {} | speed {speed:.2}x | pan {pan} | {voices} voice(s) @ {} Hz\r\n",
        if paused { "Paused" } else { "Playing" },
        if looping { "on" } else { "off" },
        state.sample_rate,
    )?;
    write!(
        stdout,
        "Space=play/pause L=loop Left/Right=pan C=centre W=auto-pan +/-=speed N=blip Q=quit"
    )?;
    stdout.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    run_interactive_demo(
        TrackState::new,
        |state: &Arc<Mutex<TrackState>>| draw_ui(&state.lock().unwrap()),
        |state, key_event| {
            let mut state = state.lock().unwrap();
            match key_event.code {
                KeyCode::Char(' ') => state.player.with(|p| p.play_toggle()),
                KeyCode::Char('l') | KeyCode::Char('L') => state.player.with(|p| {
                    let looping = p.is_looping();
                    p.set_loop(!looping);
                }),
                KeyCode::Left => state.nudge_pan(-0.1)?,
                KeyCode::Right => state.nudge_pan(0.1)?,
                KeyCode::Char('c') | KeyCode::Char('C') => {
                    state.pan = 0.5;
                    state.auto_pan = false;
                    state.track.with(|t| t.reset_pan());
                }
                KeyCode::Char('w') | KeyCode::Char('W') => {
                    let sweep = Node::new(Oscillator::sine(0.3));
                    state.track.with(|t| t.set_pan(sweep))?;
                    state.auto_pan = true;
                }
                KeyCode::Char('+') | KeyCode::Char('=') => state.nudge_speed(1.1)?,
                KeyCode::Char('-') => state.nudge_speed(1.0 / 1.1)?,
                KeyCode::Char('n') | KeyCode::Char('N') => state.blip()?,
                _ => {}
            }
            draw_ui(&state)
        },
    )
}
