//! Wall-clock stand-in for a real audio engine.
use coople_game::{AudioPlayer, AudioSprite, Playback, RevealWindow, Tick};
use std::time::{Duration, Instant};

/// Pretends to play a sprite: position advances with elapsed time, scaled
/// by `speed`, until the sprite's end is reached.
#[derive(Debug)]
pub struct SimulatedPlayer {
    speed: f64,
    started: Option<(Instant, u64)>,
    next_id: u32,
}

impl SimulatedPlayer {
    pub fn new(speed: f64) -> Self {
        Self {
            speed: if speed.is_finite() && speed > 0.0 { speed } else { 1.0 },
            started: None,
            next_id: 0,
        }
    }

    fn position_secs(&self) -> Option<f64> {
        let (at, end_ms) = self.started?;
        let end_secs = Duration::from_millis(end_ms).as_secs_f64();
        Some((at.elapsed().as_secs_f64() * self.speed).min(end_secs))
    }
}

impl AudioPlayer for SimulatedPlayer {
    type SoundId = u32;

    fn is_loaded(&self) -> bool {
        true
    }

    fn play(&mut self, sprite: &AudioSprite) -> u32 {
        self.next_id = self.next_id.wrapping_add(1);
        self.started = Some((Instant::now(), sprite.duration_ms()));
        self.next_id
    }

    fn stop(&mut self) {
        self.started = None;
    }

    fn seek(&self, sound: u32) -> Option<f64> {
        if sound == self.next_id {
            self.position_secs()
        } else {
            None
        }
    }

    fn is_playing(&self) -> bool {
        match self.started {
            Some((_, end_ms)) => self
                .position_secs()
                .is_some_and(|pos| pos < Duration::from_millis(end_ms).as_secs_f64()),
            None => false,
        }
    }
}

/// Play `sprite` to the end of `window`, calling `on_tick` every `period`
/// until the player stops.
pub async fn listen(
    playback: &mut Playback<SimulatedPlayer>,
    sprite: &AudioSprite,
    window: RevealWindow,
    period: Duration,
    mut on_tick: impl FnMut(&Tick),
) -> Tick {
    playback.toggle(sprite);
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        let tick = playback.tick(window);
        on_tick(&tick);
        if !tick.reschedule {
            playback.reset();
            return tick;
        }
    }
}
