#[cfg(feature = "audio")]
use crate::error::Error;
#[cfg(feature = "audio")]
use rodio::{OutputStream, OutputStreamHandle, Sink, Source, buffer::SamplesBuffer};

#[cfg_attr(not(feature = "audio"), allow(dead_code))]
pub const SAMPLE_RATE: u32 = 44_100;
#[cfg_attr(not(feature = "audio"), allow(dead_code))]
const AMP: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(not(feature = "audio"), allow(dead_code))]
pub struct Tone
{
    pub freq: f32,
    pub millis: u32,
}

const fn tone(freq: f32, millis: u32) -> Tone
{
    Tone { freq, millis }
}

#[cfg_attr(not(feature = "audio"), allow(dead_code))]
const MUSIC: [Tone; 8] = [
    tone(220.0, 240),
    tone(261.6, 240),
    tone(329.6, 240),
    tone(261.6, 240),
    tone(196.0, 240),
    tone(246.9, 240),
    tone(293.7, 240),
    tone(0.0, 240),
];
const CLASH: [Tone; 3] = [tone(180.0, 90), tone(120.0, 120), tone(70.0, 260)];
const SUCCESS: [Tone; 2] = [tone(520.0, 70), tone(680.0, 110)];

#[cfg_attr(not(feature = "audio"), allow(dead_code))]
pub fn music() -> &'static [Tone]
{
    &MUSIC
}

pub fn clash() -> &'static [Tone]
{
    &CLASH
}

pub fn success() -> &'static [Tone]
{
    &SUCCESS
}

// Linear decay per tone; a zero frequency is a rest.
#[cfg_attr(not(feature = "audio"), allow(dead_code))]
pub fn synth(tones: &[Tone], sample_rate: u32) -> Vec<f32>
{
    let total: usize = tones.iter().map(|t| tone_len(t, sample_rate)).sum();
    let mut samples = Vec::with_capacity(total);
    for t in tones {
        let len = tone_len(t, sample_rate);
        for i in 0..len {
            if t.freq <= 0.0 {
                samples.push(0.0);
                continue;
            }
            let time = i as f32 / sample_rate as f32;
            let envelope = 1.0 - i as f32 / len as f32;
            let phase = 2.0 * std::f32::consts::PI * t.freq * time;
            samples.push(AMP * envelope * phase.sin());
        }
    }
    samples
}

#[cfg_attr(not(feature = "audio"), allow(dead_code))]
fn tone_len(tone: &Tone, sample_rate: u32) -> usize
{
    (sample_rate as u64 * tone.millis as u64 / 1000) as usize
}

#[cfg(feature = "audio")]
struct Output
{
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

pub struct Audio
{
    #[cfg(feature = "audio")]
    output: Option<Output>,
}

impl Audio
{
    #[cfg(feature = "audio")]
    pub fn new(muted: bool) -> Self
    {
        if muted {
            return Self { output: None };
        }
        match open_output() {
            Ok(output) => Self {
                output: Some(output),
            },
            Err(err) => {
                log::warn!("{err}; continuing without sound");
                Self { output: None }
            }
        }
    }

    #[cfg(not(feature = "audio"))]
    pub fn new(muted: bool) -> Self
    {
        if !muted {
            log::debug!("built without the audio feature; sound disabled");
        }
        Self {}
    }

    pub fn play(&self, tones: &[Tone])
    {
        #[cfg(feature = "audio")]
        {
            if let Some(output) = &self.output {
                let source = SamplesBuffer::new(1, SAMPLE_RATE, synth(tones, SAMPLE_RATE));
                append(output, source);
            }
        }
        #[cfg(not(feature = "audio"))]
        let _ = tones;
    }

    pub fn loop_music(&self)
    {
        #[cfg(feature = "audio")]
        {
            if let Some(output) = &self.output {
                let source = SamplesBuffer::new(1, SAMPLE_RATE, synth(music(), SAMPLE_RATE))
                    .amplify(0.5)
                    .repeat_infinite();
                append(output, source);
            }
        }
    }
}

#[cfg(feature = "audio")]
fn open_output() -> Result<Output, Error>
{
    let (stream, handle) =
        OutputStream::try_default().map_err(|err| Error::Audio(err.to_string()))?;
    Ok(Output {
        _stream: stream,
        handle,
    })
}

#[cfg(feature = "audio")]
fn append<S>(output: &Output, source: S)
where
    S: Source<Item = f32> + Send + 'static,
{
    match Sink::try_new(&output.handle) {
        Ok(sink) => {
            sink.append(source);
            sink.detach();
        }
        Err(err) => log::warn!("audio: {err}"),
    }
}
