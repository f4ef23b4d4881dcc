//! Audio: sound catalogue and playback policy
//!
//! The policy half (`SoundGate`, `Mixer`) is plain Rust and runs everywhere.
//! On wasm, `AudioManager` turns it into procedurally generated Web Audio
//! sounds, so no sample files are needed. Playback is fire-and-forget: any
//! Web Audio failure is swallowed and never reaches the simulation.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::ObjectKind;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundEffect {
    /// Looping background music
    Bgm,
    /// A bomb entered the field
    BombFall,
    /// Bomb caught
    BombBlow,
    /// Egg caught
    Egg,
    /// Gold caught
    Coin,
    /// Bad egg caught
    Error,
    /// UI button press
    Button,
    /// Time ran out
    GameOver,
    /// Score collapsed
    Death,
}

impl SoundEffect {
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::Bgm => "bgm",
            SoundEffect::BombFall => "bombFall",
            SoundEffect::BombBlow => "bombBlow",
            SoundEffect::Egg => "egg",
            SoundEffect::Coin => "coin",
            SoundEffect::Error => "error",
            SoundEffect::Button => "btn",
            SoundEffect::GameOver => "gameOver",
            SoundEffect::Death => "death",
        }
    }

    /// Per-effect volume before the master gain. Kept low overall.
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundEffect::Bgm => 0.5,
            SoundEffect::BombFall => 0.05,
            SoundEffect::BombBlow => 0.9,
            SoundEffect::Egg => 0.6,
            SoundEffect::Coin => 0.7,
            SoundEffect::Error => 0.8,
            SoundEffect::Button => 0.7,
            SoundEffect::GameOver => 0.8,
            SoundEffect::Death => 0.8,
        }
    }

    /// How long the one-shot sound rings (seconds). Bgm loops and reports 0.
    pub fn duration_secs(&self) -> f64 {
        match self {
            SoundEffect::Bgm => 0.0,
            SoundEffect::BombFall => 0.65,
            SoundEffect::BombBlow => 0.5,
            SoundEffect::Egg => 0.15,
            SoundEffect::Coin => 0.43,
            SoundEffect::Error => 0.3,
            SoundEffect::Button => 0.08,
            SoundEffect::GameOver => 0.75,
            SoundEffect::Death => 1.3,
        }
    }

    /// Sound played when an object of `kind` is caught
    pub fn for_catch(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Egg => SoundEffect::Egg,
            ObjectKind::BadEgg => SoundEffect::Error,
            ObjectKind::Bomb => SoundEffect::BombBlow,
            ObjectKind::Gold => SoundEffect::Coin,
        }
    }
}

/// Rate limit for the bomb-fall sound
///
/// Crazy mode spawns bombs in bulk, so its cooldown is longer. Requests inside
/// the cooldown are dropped, not queued.
#[derive(Debug, Clone, Default)]
pub struct SoundGate {
    last_bomb_fall_ms: Option<f64>,
}

impl SoundGate {
    pub fn cooldown_ms(crazy: bool) -> f64 {
        if crazy {
            BOMB_SOUND_COOLDOWN_CRAZY_MS
        } else {
            BOMB_SOUND_COOLDOWN_MS
        }
    }

    /// Whether `effect` may play at `now_ms`. Records the play if allowed.
    pub fn allow(&mut self, effect: SoundEffect, now_ms: f64, crazy: bool) -> bool {
        if effect != SoundEffect::BombFall {
            return true;
        }
        if let Some(last) = self.last_bomb_fall_ms
            && now_ms - last < Self::cooldown_ms(crazy)
        {
            return false;
        }
        self.last_bomb_fall_ms = Some(now_ms);
        true
    }

    pub fn reset(&mut self) {
        self.last_bomb_fall_ms = None;
    }
}

/// What a backend should do to start a one-shot sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayCommand {
    pub voice: u32,
    pub effect: SoundEffect,
    pub volume: f32,
    /// Oldest voice to cut to stay under the voice cap
    pub evict: Option<u32>,
}

/// Voice pool, master gain and region-mode bookkeeping
#[derive(Debug, Clone)]
pub struct Mixer {
    master_gain: f32,
    muted: bool,
    /// Live voices with the time (seconds) they finish, oldest first
    voices: VecDeque<(u32, f64)>,
    next_voice: u32,
    bgm_playing: bool,
    /// While set, background music stays paused
    region_mode: bool,
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mixer {
    pub fn new() -> Self {
        Self {
            master_gain: 1.0,
            muted: false,
            voices: VecDeque::with_capacity(MAX_CONCURRENT_VOICES + 1),
            next_voice: 1,
            bgm_playing: false,
            region_mode: false,
        }
    }

    /// Set master gain (clamped to 0.0 - 1.0)
    pub fn set_master_gain(&mut self, gain: f32) {
        self.master_gain = if gain.is_finite() {
            gain.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Effective volume for an effect, never above 1.0
    pub fn volume_for(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            0.0
        } else {
            (effect.base_volume() * self.master_gain).min(1.0)
        }
    }

    /// Allocate a voice for a one-shot effect starting at `now` (seconds).
    /// Voices that finished by `now` are released first.
    pub fn play(&mut self, effect: SoundEffect, now: f64) -> Option<PlayCommand> {
        let volume = self.volume_for(effect);
        if volume <= 0.0 || effect == SoundEffect::Bgm {
            return None;
        }
        self.release_finished(now);
        let voice = self.next_voice;
        self.next_voice = self.next_voice.wrapping_add(1);
        self.voices.push_back((voice, now + effect.duration_secs()));
        let evict = if self.voices.len() > MAX_CONCURRENT_VOICES {
            self.voices.pop_front().map(|(v, _)| v)
        } else {
            None
        };
        Some(PlayCommand {
            voice,
            effect,
            volume,
            evict,
        })
    }

    /// A voice finished on its own
    pub fn voice_ended(&mut self, voice: u32) {
        self.voices.retain(|(v, _)| *v != voice);
    }

    /// Drop every voice that has finished by `now` (seconds) and return them
    pub fn release_finished(&mut self, now: f64) -> Vec<u32> {
        let mut released = Vec::new();
        self.voices.retain(|&(voice, ends_at)| {
            if ends_at <= now {
                released.push(voice);
                false
            } else {
                true
            }
        });
        released
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Request background music. Returns true if it should actually start.
    pub fn start_bgm(&mut self) -> bool {
        self.bgm_playing = true;
        !self.region_mode
    }

    /// Stop background music. Returns true if it was audible.
    pub fn stop_bgm(&mut self) -> bool {
        let was_audible = self.bgm_playing && !self.region_mode;
        self.bgm_playing = false;
        was_audible
    }

    /// Enter region mode. Returns true if music must be paused now.
    pub fn enter_region_mode(&mut self) -> bool {
        if self.region_mode {
            return false;
        }
        self.region_mode = true;
        self.bgm_playing
    }

    /// Leave region mode. Returns true if music should resume.
    pub fn exit_region_mode(&mut self) -> bool {
        if !self.region_mode {
            return false;
        }
        self.region_mode = false;
        self.bgm_playing
    }

    pub fn region_mode(&self) -> bool {
        self.region_mode
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_backend::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web_backend {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Mixer, SoundEffect};

    /// Web Audio backend for the game's sounds
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        mixer: Mixer,
        /// Oscillators per live voice, oldest first
        voices: Vec<(u32, Vec<OscillatorNode>)>,
        bgm: Vec<OscillatorNode>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                mixer: Mixer::new(),
                voices: Vec::new(),
                bgm: Vec::new(),
            }
        }

        pub fn mixer_mut(&mut self) -> &mut Mixer {
            &mut self.mixer
        }

        /// Resume audio context (required after user gesture)
        fn resume(&self) {
            if let Some(ctx) = &self.ctx
                && ctx.state() == web_sys::AudioContextState::Suspended
            {
                let _ = ctx.resume();
            }
        }

        /// Play a sound effect
        pub fn play(&mut self, effect: SoundEffect) {
            if effect == SoundEffect::Bgm {
                if self.mixer.start_bgm() {
                    self.start_bgm_nodes();
                }
                return;
            }
            let now = self.ctx.as_ref().map_or(0.0, |ctx| ctx.current_time());
            for voice in self.mixer.release_finished(now) {
                self.voices.retain(|(v, _)| *v != voice);
            }
            let Some(cmd) = self.mixer.play(effect, now) else {
                return;
            };
            if let Some(old) = cmd.evict {
                self.cut_voice(old);
            }
            let Some(ctx) = self.ctx.clone() else { return };
            self.resume();

            let nodes = match effect {
                SoundEffect::BombFall => self.bomb_fall(&ctx, cmd.volume),
                SoundEffect::BombBlow => self.bomb_blow(&ctx, cmd.volume),
                SoundEffect::Egg => self.egg(&ctx, cmd.volume),
                SoundEffect::Coin => self.coin(&ctx, cmd.volume),
                SoundEffect::Error => self.error(&ctx, cmd.volume),
                SoundEffect::Button => self.button(&ctx, cmd.volume),
                SoundEffect::GameOver => self.game_over(&ctx, cmd.volume),
                SoundEffect::Death => self.death(&ctx, cmd.volume),
                SoundEffect::Bgm => Vec::new(),
            };
            self.voices.push((cmd.voice, nodes));
        }

        pub fn stop_bgm(&mut self) {
            if self.mixer.stop_bgm() {
                self.stop_bgm_nodes();
            }
        }

        pub fn set_region_mode(&mut self, on: bool) {
            if on {
                if self.mixer.enter_region_mode() {
                    self.stop_bgm_nodes();
                }
            } else if self.mixer.exit_region_mode() {
                self.start_bgm_nodes();
            }
        }

        fn cut_voice(&mut self, voice: u32) {
            if let Some(pos) = self.voices.iter().position(|(v, _)| *v == voice) {
                let (_, nodes) = self.voices.remove(pos);
                for osc in nodes {
                    let _ = osc.stop();
                }
            }
        }

        fn start_bgm_nodes(&mut self) {
            self.stop_bgm_nodes();
            let Some(ctx) = self.ctx.clone() else { return };
            self.resume();
            let vol = self.mixer.volume_for(SoundEffect::Bgm) * 0.08;
            // Soft open fifth drone
            for freq in [196.0, 293.66] {
                if let Some((osc, gain)) = create_osc(&ctx, freq, OscillatorType::Sine) {
                    gain.gain().set_value(vol);
                    if osc.start().is_ok() {
                        self.bgm.push(osc);
                    }
                }
            }
        }

        fn stop_bgm_nodes(&mut self) {
            for osc in self.bgm.drain(..) {
                let _ = osc.stop();
            }
        }

        // === Sound generators ===

        /// Bomb fall - descending whistle
        fn bomb_fall(&self, ctx: &AudioContext, vol: f32) -> Vec<OscillatorNode> {
            let Some((osc, gain)) = create_osc(ctx, 1400.0, OscillatorType::Sine) else {
                return Vec::new();
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.6)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(500.0, t + 0.6)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.65).ok();
            vec![osc]
        }

        /// Bomb caught - boom with a crack on top
        fn bomb_blow(&self, ctx: &AudioContext, vol: f32) -> Vec<OscillatorNode> {
            let t = ctx.current_time();
            let mut nodes = Vec::new();

            if let Some((osc, gain)) = create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(30.0, t + 0.4)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.5).ok();
                nodes.push(osc);
            }

            if let Some((osc, gain)) = create_osc(ctx, 1500.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.15).ok();
                nodes.push(osc);
            }
            nodes
        }

        /// Egg caught - short pop
        fn egg(&self, ctx: &AudioContext, vol: f32) -> Vec<OscillatorNode> {
            let Some((osc, gain)) = create_osc(ctx, 520.0, OscillatorType::Triangle) else {
                return Vec::new();
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(880.0, t + 0.08)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
            vec![osc]
        }

        /// Gold caught - two-note chime
        fn coin(&self, ctx: &AudioContext, vol: f32) -> Vec<OscillatorNode> {
            let mut nodes = Vec::new();
            for (i, freq) in [988.0, 1319.0].iter().enumerate() {
                let delay = i as f64 * 0.08;
                if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Square) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.2, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.35).ok();
                    nodes.push(osc);
                }
            }
            nodes
        }

        /// Bad egg caught - low buzz
        fn error(&self, ctx: &AudioContext, vol: f32) -> Vec<OscillatorNode> {
            let Some((osc, gain)) = create_osc(ctx, 140.0, OscillatorType::Sawtooth) else {
                return Vec::new();
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(140.0, t).ok();
            osc.frequency().set_value_at_time(110.0, t + 0.1).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
            vec![osc]
        }

        /// UI click
        fn button(&self, ctx: &AudioContext, vol: f32) -> Vec<OscillatorNode> {
            let Some((osc, gain)) = create_osc(ctx, 660.0, OscillatorType::Sine) else {
                return Vec::new();
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.05)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.08).ok();
            vec![osc]
        }

        /// Time up - falling three-note phrase
        fn game_over(&self, ctx: &AudioContext, vol: f32) -> Vec<OscillatorNode> {
            let mut nodes = Vec::new();
            for (i, freq) in [523.0, 392.0, 262.0].iter().enumerate() {
                let delay = i as f64 * 0.2;
                if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.4, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.35).ok();
                    nodes.push(osc);
                }
            }
            nodes
        }

        /// Death - long sinking tone
        fn death(&self, ctx: &AudioContext, vol: f32) -> Vec<OscillatorNode> {
            let Some((osc, gain)) = create_osc(ctx, 300.0, OscillatorType::Sawtooth) else {
                return Vec::new();
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.2)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 1.2)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 1.3).ok();
            vec![osc]
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }
}
