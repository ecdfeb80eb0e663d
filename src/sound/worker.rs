//! Background playback thread.
//!
//! The completion cue must never hold up the tick path, and rodio output
//! streams cannot cross threads. [`SoundWorker`] solves both: it owns one
//! dedicated thread that opens the player, and `play()` only drops a request
//! into a small bounded channel.

use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{debug, warn};

use super::error::SoundError;
use super::player::RodioSoundPlayer;
use super::source::SoundSource;
use super::{NotificationSound, SoundPlayer};

/// Pending play requests; extra requests are dropped while the queue is full.
const QUEUE_CAPACITY: usize = 4;

/// Fire-and-forget handle to the playback thread.
#[derive(Debug)]
pub struct SoundWorker {
    tx: Option<Sender<SoundSource>>,
    source: SoundSource,
}

impl SoundWorker {
    /// Spawns a playback thread using the default rodio output device.
    pub fn rodio(source: SoundSource) -> Self {
        Self::spawn(source, RodioSoundPlayer::new)
    }

    /// Spawns a playback thread whose player is built by `factory` on that
    /// thread.
    ///
    /// If the factory fails, the worker keeps accepting requests and
    /// discards them.
    pub fn spawn<F, P>(source: SoundSource, factory: F) -> Self
    where
        F: FnOnce() -> Result<P, SoundError> + Send + 'static,
        P: SoundPlayer,
    {
        let (tx, rx) = bounded(QUEUE_CAPACITY);

        let spawned = thread::Builder::new()
            .name("rene-sound".to_string())
            .spawn(move || playback_loop(factory, rx));

        if let Err(e) = spawned {
            warn!("Failed to start sound thread, sound disabled: {}", e);
            return Self::disabled();
        }

        Self {
            tx: Some(tx),
            source,
        }
    }

    /// A worker that never plays anything and never touches the audio device.
    pub fn disabled() -> Self {
        Self {
            tx: None,
            source: SoundSource::default(),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.tx.is_none()
    }

    pub fn source(&self) -> &SoundSource {
        &self.source
    }
}

impl NotificationSound for SoundWorker {
    fn play(&self) {
        let Some(tx) = &self.tx else {
            debug!("Sound disabled, skipping completion cue");
            return;
        };

        match tx.try_send(self.source.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => debug!("Sound queue full, dropping request"),
            Err(TrySendError::Disconnected(_)) => debug!("Sound thread gone, dropping request"),
        }
    }
}

fn playback_loop<F, P>(factory: F, rx: Receiver<SoundSource>)
where
    F: FnOnce() -> Result<P, SoundError>,
    P: SoundPlayer,
{
    let player = match factory() {
        Ok(player) => Some(player),
        Err(e) => {
            warn!("Audio not available, sound disabled: {} ({})", e, e.suggestion());
            None
        }
    };

    for source in rx.iter() {
        let Some(player) = &player else {
            continue;
        };
        if let Err(e) = player.play(&source) {
            warn!("Failed to play completion sound: {} ({})", e, e.suggestion());
        }
    }

    debug!("Sound thread exiting");
}
