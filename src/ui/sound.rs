/// Sound engine: background music and effect cues via rodio.
///
/// The bullet cue and the music loop come from `bullet_sound.wav` and
/// `background_music.wav` in the assets directory when those files exist;
/// every other cue, and any missing file, is synthesized as an in-memory
/// WAV buffer at init time. Effects are fire-and-forget on detached sinks;
/// the music keeps one sink that is paused and resumed.
///
/// Build without the "sound" feature to compile a silent stub instead.

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::PI;
    use std::io::Cursor;
    use std::path::Path;
    use std::sync::Arc;

    use anyhow::{Context, Result};
    use log::{info, warn};
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

    use crate::config::AudioConfig;

    const SAMPLE_RATE: u32 = 22050;

    pub const BULLET_FILE: &str = "bullet_sound.wav";
    pub const MUSIC_FILE: &str = "background_music.wav";

    type Clip = Arc<Vec<u8>>;

    /// Every encoded buffer the engine can play.
    pub struct Clips {
        pub bullet: Clip,
        pub music: Clip,
        pub water: Clip,
        pub explode: Clip,
        pub hit: Clip,
        pub level_up: Clip,
        pub game_over: Clip,
    }

    impl Clips {
        pub fn load(dir: &Path) -> Result<Self> {
            Ok(Clips {
                bullet: load_or_synth(&dir.join(BULLET_FILE), gen_bullet)?,
                music: load_or_synth(&dir.join(MUSIC_FILE), gen_music)?,
                water: Arc::new(make_wav(&gen_water())),
                explode: Arc::new(make_wav(&gen_explode())),
                hit: Arc::new(make_wav(&gen_hit())),
                level_up: Arc::new(make_wav(&gen_level_up())),
                game_over: Arc::new(make_wav(&gen_game_over())),
            })
        }
    }

    /// Read `path` if it exists and check it decodes; otherwise synthesize.
    fn load_or_synth(path: &Path, synth: fn() -> Vec<f32>) -> Result<Clip> {
        if !path.exists() {
            return Ok(Arc::new(make_wav(&synth())));
        }
        let bytes = std::fs::read(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        Decoder::new(Cursor::new(bytes.clone()))
            .with_context(|| format!("cannot decode {}", path.display()))?;
        info!("sound loaded from {}", path.display());
        Ok(Arc::new(bytes))
    }

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        volume: f32,
        music: Sink,
        clips: Clips,
    }

    impl SoundEngine {
        /// `None` when audio is disabled, a sound file is corrupt, or no
        /// output device can be opened. The game runs silently then.
        pub fn new(cfg: &AudioConfig, assets_dir: &Path) -> Option<Self> {
            if !cfg.enabled {
                info!("audio disabled in config");
                return None;
            }
            let clips = match Clips::load(assets_dir) {
                Ok(c) => c,
                Err(e) => {
                    warn!("audio disabled: {e:#}");
                    return None;
                }
            };
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("audio disabled: no output device: {e}");
                    return None;
                }
            };
            let music = match Sink::try_new(&handle) {
                Ok(s) => s,
                Err(e) => {
                    warn!("audio disabled: cannot open music sink: {e}");
                    return None;
                }
            };
            music.set_volume(cfg.volume);
            music.pause();
            if let Ok(src) = Decoder::new(Cursor::new(clips.music.as_ref().clone())) {
                music.append(src.repeat_infinite());
            }
            info!("audio ready (volume {:.2})", cfg.volume);

            Some(SoundEngine {
                _stream: stream,
                handle,
                volume: cfg.volume,
                music,
                clips,
            })
        }

        fn play(&self, buf: &Clip) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                if let Ok(src) = Decoder::new(Cursor::new(buf.as_ref().clone())) {
                    sink.set_volume(self.volume);
                    sink.append(src);
                    sink.detach();
                }
            }
        }

        /// Resume or pause the music loop.
        pub fn set_music(&self, on: bool) {
            if on && self.music.is_paused() {
                self.music.play();
            } else if !on && !self.music.is_paused() {
                self.music.pause();
            }
        }

        pub fn play_bullet(&self) {
            self.play(&self.clips.bullet);
        }

        pub fn play_water(&self) {
            self.play(&self.clips.water);
        }

        pub fn play_explode(&self) {
            self.play(&self.clips.explode);
        }

        pub fn play_hit(&self) {
            self.play(&self.clips.hit);
        }

        pub fn play_level_up(&self) {
            self.play(&self.clips.level_up);
        }

        pub fn play_game_over(&self) {
            self.play(&self.clips.game_over);
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: mono f32 samples
    // ════════════════════════════════════════════════════════════

    fn tone(freq: f32, i: usize) -> f32 {
        (i as f32 / SAMPLE_RATE as f32 * freq * 2.0 * PI).sin()
    }

    fn samples_for(secs: f32) -> usize {
        (SAMPLE_RATE as f32 * secs) as usize
    }

    /// Note sequence with a short decay per note.
    fn melody(notes: &[(f32, f32)], gain: f32) -> Vec<f32> {
        let mut out = Vec::new();
        for &(freq, dur) in notes {
            let n = samples_for(dur);
            for i in 0..n {
                let env = 1.0 - (i as f32 / n as f32) * 0.6;
                let wave = if freq > 0.0 {
                    tone(freq, i) * 0.7 + tone(freq * 2.0, i) * 0.3
                } else {
                    0.0
                };
                out.push(wave * env * gain);
            }
        }
        out
    }

    /// Enemy shot: quick high zap sliding down
    fn gen_bullet() -> Vec<f32> {
        let n = samples_for(0.09);
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 1400.0 - t * 900.0;
                let sq = if tone(freq, i) >= 0.0 { 1.0 } else { -1.0 };
                sq * (1.0 - t) * 0.15
            })
            .collect()
    }

    /// Water shot: soft bubbly rise
    fn gen_water() -> Vec<f32> {
        let n = samples_for(0.12);
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let wobble = (t * 40.0).sin() * 60.0;
                tone(300.0 + t * 500.0 + wobble, i) * (1.0 - t).powf(0.7) * 0.25
            })
            .collect()
    }

    /// Enemy destroyed: noise burst over a falling tone
    fn gen_explode() -> Vec<f32> {
        let n = samples_for(0.2);
        let mut lcg: u32 = 2463534242;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                lcg = lcg.wrapping_mul(1664525).wrapping_add(1013904223);
                let noise = (lcg as f32 / u32::MAX as f32) * 2.0 - 1.0;
                (noise * 0.7 + tone(180.0 - t * 120.0, i) * 0.3) * (1.0 - t).powi(2) * 0.35
            })
            .collect()
    }

    /// Player hit: two low thuds
    fn gen_hit() -> Vec<f32> {
        melody(&[(220.0, 0.08), (0.0, 0.03), (165.0, 0.12)], 0.35)
    }

    fn gen_level_up() -> Vec<f32> {
        melody(&[(523.0, 0.09), (659.0, 0.09), (784.0, 0.09), (1047.0, 0.3)], 0.3)
    }

    fn gen_game_over() -> Vec<f32> {
        melody(&[(392.0, 0.18), (330.0, 0.18), (262.0, 0.18), (196.0, 0.45)], 0.3)
    }

    /// Background loop: an eight-bar bass-and-lead pattern
    fn gen_music() -> Vec<f32> {
        const LEAD: [f32; 16] = [
            659.0, 0.0, 784.0, 659.0, 587.0, 0.0, 523.0, 587.0,
            659.0, 0.0, 784.0, 880.0, 784.0, 0.0, 659.0, 0.0,
        ];
        const BASS: [f32; 4] = [131.0, 175.0, 196.0, 131.0];
        let step = samples_for(0.2);
        let mut out = Vec::with_capacity(step * LEAD.len() * 2);
        for bar in 0..2 {
            for (k, &lead) in LEAD.iter().enumerate() {
                let bass = BASS[(k / 4 + bar * 2) % BASS.len()];
                for i in 0..step {
                    let env = 1.0 - i as f32 / step as f32 * 0.5;
                    let l = if lead > 0.0 { tone(lead, i) * env * 0.12 } else { 0.0 };
                    out.push(l + tone(bass, i) * 0.1);
                }
            }
        }
        out
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: 16-bit mono PCM
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let data_size = samples.len() as u32 * 2;
        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
        buf.extend_from_slice(&2u16.to_le_bytes());
        buf.extend_from_slice(&16u16.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }

}

// ════════════════════════════════════════════════════════════
//  Public API: no-ops when the sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new(_cfg: &crate::config::AudioConfig, _assets_dir: &std::path::Path) -> Option<Self> {
        log::info!("built without sound support");
        None
    }
    pub fn set_music(&self, _on: bool) {}
    pub fn play_bullet(&self) {}
    pub fn play_water(&self) {}
    pub fn play_explode(&self) {}
    pub fn play_hit(&self) {}
    pub fn play_level_up(&self) {}
    pub fn play_game_over(&self) {}
}
