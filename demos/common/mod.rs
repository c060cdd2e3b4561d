//! Device playback and a raw-mode key loop shared by the interactive demos.

use anyhow::{Result, anyhow};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample, StreamConfig};
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use crossterm::{ExecutableCommand, cursor, terminal};
use std::io::stdout;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use unitgen::driver::{RenderConfig, Renderer};

/// State whose renderer feeds the output device. The root must be stereo.
pub trait DemoAudioState: Send + 'static {
    fn renderer(&mut self) -> &mut Renderer;
}

/// Restores the terminal when dropped, including while unwinding a panic.
struct RawTerminal;

impl RawTerminal {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let mut out = stdout();
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Opens the default output device, builds the state for its sample rate and
/// plays it until Q or Esc is pressed.
///
/// `draw` runs once before the loop; `on_key` runs for every other key press.
pub fn run_interactive_demo<S>(
    build: impl FnOnce(RenderConfig) -> Result<S>,
    draw: impl FnOnce(&Arc<Mutex<S>>) -> Result<()>,
    on_key: impl Fn(&Arc<Mutex<S>>, &KeyEvent) -> Result<()>,
) -> Result<()>
where
    S: DemoAudioState,
{
    let device = cpal::default_host()
        .default_output_device()
        .ok_or_else(|| anyhow!("no output device"))?;
    let supported = device.default_output_config()?;
    let format = supported.sample_format();
    let config: StreamConfig = supported.into();

    let state = Arc::new(Mutex::new(build(
        RenderConfig::default().with_sample_rate(f64::from(config.sample_rate.0)),
    )?));

    let _stream = match format {
        SampleFormat::F32 => open_stream::<f32, S>(&device, &config, Arc::clone(&state))?,
        SampleFormat::I16 => open_stream::<i16, S>(&device, &config, Arc::clone(&state))?,
        SampleFormat::U16 => open_stream::<u16, S>(&device, &config, Arc::clone(&state))?,
        other => return Err(anyhow!("unsupported sample format {other}")),
    };

    let _terminal = RawTerminal::enter()?;
    draw(&state)?;

    loop {
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if matches!(key.code, KeyCode::Char('q' | 'Q') | KeyCode::Esc) {
                return Ok(());
            }
            on_key(&state, &key)?;
        }
    }
}

/// Pulls one renderer block per device callback and copies the stereo pair
/// onto the device's channels (extra channels repeat the right side).
fn open_stream<T, S>(
    device: &cpal::Device,
    config: &StreamConfig,
    state: Arc<Mutex<S>>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f64>,
    S: DemoAudioState,
{
    let channels = usize::from(config.channels);

    let stream = device.build_output_stream(
        config,
        move |out: &mut [T], _: &cpal::OutputCallbackInfo| {
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            let block = match state.renderer().render_frames(out.len() / channels) {
                Ok(block) => block,
                Err(err) => {
                    log::error!("render failed: {err}");
                    out.fill(T::EQUILIBRIUM);
                    return;
                }
            };
            for (frame, pair) in out.chunks_mut(channels).zip(block.samples.chunks(2)) {
                for (i, slot) in frame.iter_mut().enumerate() {
                    let value = pair.get(i.min(1)).copied().unwrap_or(0.0);
                    *slot = T::from_sample(value.clamp(-1.0, 1.0));
                }
            }
        },
        |err| log::error!("output stream error: {err}"),
        None,
    )?;

    stream.play()?;
    Ok(stream)
}
