//! VCR-style navigation over a loaded sequence pair

use crate::asset::Arch;
use crate::config::PlaybackConfig;
use crate::sequence::SequencePair;
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::renderer::Renderer;
use super::types::{PlaybackSnapshot, PlaybackState, Visibility};

struct Inner<R> {
    renderer: R,
    pair: SequencePair,
    len: usize,
    index: usize,
    visibility: Visibility,
    /// Present exactly while playing.
    cadence: Option<CancellationToken>,
}

impl<R: Renderer> Inner<R> {
    fn state(&self) -> PlaybackState {
        if self.len == 0 {
            PlaybackState::Idle
        } else if self.cadence.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Ready
        }
    }

    fn set_index(&mut self, index: usize) -> bool {
        if self.len == 0 || index == self.index || index >= self.len {
            return false;
        }
        self.index = index;
        self.render();
        true
    }

    // Valid range is the longer stream; a missing mesh empties its slot.
    fn render(&mut self) {
        for arch in Arch::ALL {
            match self.pair.get(arch, self.index) {
                Some(asset) => self.renderer.load_mesh(asset.data().clone(), arch),
                None => self.renderer.clear_slot(arch),
            }
        }
    }

    fn apply_visibility(&mut self) {
        for arch in Arch::ALL {
            self.renderer
                .set_slot_visible(arch, self.visibility.shows(arch));
        }
    }

    fn stop_cadence(&mut self) -> bool {
        match self.cadence.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

/// Drives a [`Renderer`] through an index-aligned sequence pair.
///
/// `play` spawns the cadence timer onto the current Tokio runtime.
pub struct PlaybackController<R: Renderer + 'static> {
    inner: Arc<Mutex<Inner<R>>>,
    cadence: Duration,
}

impl<R: Renderer + 'static> PlaybackController<R> {
    pub fn new(renderer: R, config: &PlaybackConfig) -> Self {
        Self::with_cadence(renderer, Duration::from_millis(config.cadence_ms))
    }

    pub fn with_cadence(renderer: R, cadence: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                renderer,
                pair: SequencePair::default(),
                len: 0,
                index: 0,
                visibility: Visibility::Both,
                cadence: None,
            })),
            cadence: cadence.max(Duration::from_millis(1)),
        }
    }

    /// Take ownership of `pair` and show its first step with both arches visible.
    ///
    /// Stops playback if it was running. An empty pair leaves the controller idle.
    pub fn load(&self, pair: SequencePair) -> PlaybackState {
        let mut inner = self.lock();
        inner.stop_cadence();
        inner.len = pair.step_count();
        inner.pair = pair;
        inner.index = 0;
        inner.visibility = Visibility::Both;
        inner.apply_visibility();
        if inner.len == 0 {
            for arch in Arch::ALL {
                inner.renderer.clear_slot(arch);
            }
        } else {
            inner.render();
        }
        info!("playback_load: steps={} state={}", inner.len, inner.state());
        inner.state()
    }

    /// Advance one step. No-op at the last step.
    pub fn next(&self) -> bool {
        let mut inner = self.lock();
        let target = inner.index + 1;
        inner.set_index(target)
    }

    /// Go back one step. No-op at the first step.
    pub fn prev(&self) -> bool {
        let mut inner = self.lock();
        match inner.index.checked_sub(1) {
            Some(target) => inner.set_index(target),
            None => false,
        }
    }

    /// Jump to `floor(fraction * len)`, clamped to the valid range.
    pub fn seek(&self, fraction: f64) -> bool {
        if !fraction.is_finite() {
            return false;
        }
        let mut inner = self.lock();
        if inner.len == 0 {
            return false;
        }
        let target = (fraction.clamp(0.0, 1.0) * inner.len as f64).floor() as usize;
        let target = target.min(inner.len - 1);
        inner.set_index(target)
    }

    /// Start advancing every cadence period. Returns `false` if idle or already playing.
    ///
    /// Playback does not stop at the last step; it keeps playing without advancing.
    pub fn play(&self) -> bool {
        let mut inner = self.lock();
        if inner.len == 0 || inner.cadence.is_some() {
            return false;
        }
        let token = CancellationToken::new();
        inner.cadence = Some(token.clone());
        drop(inner);

        debug!("playback_play: cadence={:?}", self.cadence);
        tokio::spawn(run_cadence(Arc::downgrade(&self.inner), token, self.cadence));
        true
    }

    /// Stop the cadence timer. Returns `false` if not playing.
    pub fn pause(&self) -> bool {
        let stopped = self.lock().stop_cadence();
        if stopped {
            debug!("playback_pause");
        }
        stopped
    }

    pub fn toggle_play(&self) -> PlaybackState {
        if !self.pause() {
            self.play();
        }
        self.state()
    }

    /// Change which arches are shown. The current step is unaffected.
    pub fn set_visibility(&self, visibility: Visibility) {
        let mut inner = self.lock();
        inner.visibility = visibility;
        inner.apply_visibility();
    }

    pub fn state(&self) -> PlaybackState {
        self.lock().state()
    }

    pub fn current_index(&self) -> usize {
        self.lock().index
    }

    pub fn len(&self) -> usize {
        self.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn visibility(&self) -> Visibility {
        self.lock().visibility
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        let inner = self.lock();
        PlaybackSnapshot {
            state: inner.state(),
            index: inner.index,
            len: inner.len,
            visibility: inner.visibility,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<R>> {
        lock(&self.inner)
    }
}

impl<R: Renderer + 'static> Drop for PlaybackController<R> {
    fn drop(&mut self) {
        self.lock().stop_cadence();
    }
}

fn lock<R>(inner: &Mutex<Inner<R>>) -> MutexGuard<'_, Inner<R>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn run_cadence<R: Renderer>(
    inner: Weak<Mutex<Inner<R>>>,
    token: CancellationToken,
    period: Duration,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                let Some(inner) = inner.upgrade() else { break };
                let mut inner = lock(&inner);
                // pause() may have run between the tick and taking the lock.
                if token.is_cancelled() {
                    break;
                }
                let target = inner.index + 1;
                inner.set_index(target);
            }
        }
    }
}
