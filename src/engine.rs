use std::collections::BTreeMap;
use std::thread::JoinHandle;

use crossbeam::channel::{Receiver, SendError, Sender, TrySendError};
use tracing::{debug, info, trace, warn};

use crate::audio::AudioBackend;
use crate::config::KeyboardConfig;
use crate::error::Error;
use crate::events::{KeyOutcome, OctaveChange};
use crate::keyboard::{KeyId, VoiceManager};

/// Updates buffered for a reader that is not keeping up. Further updates are
/// dropped until it catches up.
pub const UPDATE_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    KeyDown(KeyId),
    KeyUp(KeyId),
    ShiftOctave(i32),
    SetOctave(i32),
    ReleaseAll,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineUpdate {
    NoteStarted { key: KeyId, frequency: f64 },
    NoteStopped { key: KeyId },
    OctaveChanged { octave: i32, clamped: bool },
    Stopped,
}

/// Front door to a keyboard running on its own thread.
///
/// Commands from any number of senders are processed one at a time, in
/// arrival order.
pub struct EngineHandle {
    pub command_tx: Sender<EngineCommand>,
    pub update_rx: Receiver<EngineUpdate>,
    thread: Option<JoinHandle<()>>,
}

impl EngineHandle {
    pub fn send(&self, command: EngineCommand) -> Result<(), SendError<EngineCommand>> {
        self.command_tx.send(command)
    }

    /// Asks the engine to release its voices and waits for the thread to exit.
    pub fn shutdown(mut self) {
        let _ = self.command_tx.send(EngineCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("engine thread panicked");
            }
        }
    }
}

/// Builds the keyboard on the calling thread, so setup errors surface here,
/// then hands it to a dedicated engine thread.
pub fn spawn_engine<B>(config: KeyboardConfig, backend: B) -> Result<EngineHandle, Error>
where
    B: AudioBackend + Send + 'static,
{
    let octave_keys = config.octave_keys.clone();
    let manager = VoiceManager::new(config, backend)?;

    let (command_tx, command_rx) = crossbeam::channel::unbounded();
    let (update_tx, update_rx) = crossbeam::channel::bounded(UPDATE_CAPACITY);

    let thread = std::thread::Builder::new()
        .name("chromatics-engine".to_string())
        .spawn(move || {
            engine_thread(manager, octave_keys, command_rx, update_tx);
        })
        .map_err(Error::Spawn)?;

    Ok(EngineHandle {
        command_tx,
        update_rx,
        thread: Some(thread),
    })
}

fn engine_thread<B: AudioBackend>(
    mut manager: VoiceManager<B>,
    octave_keys: BTreeMap<KeyId, i32>,
    command_rx: Receiver<EngineCommand>,
    update_tx: Sender<EngineUpdate>,
) {
    loop {
        match command_rx.recv() {
            Ok(EngineCommand::KeyDown(key)) => {
                if let Some(&octave) = octave_keys.get(&key) {
                    let change = manager.set_octave(octave);
                    send_octave(&update_tx, change);
                }

                if let KeyOutcome::Sounding { frequency, .. } = manager.on_key_down(key) {
                    publish(&update_tx, EngineUpdate::NoteStarted { key, frequency });
                }
            }
            Ok(EngineCommand::KeyUp(key)) => {
                if manager.on_key_up(key) == KeyOutcome::Released {
                    publish(&update_tx, EngineUpdate::NoteStopped { key });
                }
            }
            Ok(EngineCommand::ShiftOctave(delta)) => {
                let change = manager.shift_octave(delta);
                send_octave(&update_tx, change);
            }
            Ok(EngineCommand::SetOctave(octave)) => {
                let change = manager.set_octave(octave);
                send_octave(&update_tx, change);
            }
            Ok(EngineCommand::ReleaseAll) => {
                let held: Vec<KeyId> = manager.sounding_keys().collect();
                manager.release_all();
                for key in held {
                    publish(&update_tx, EngineUpdate::NoteStopped { key });
                }
            }
            Ok(EngineCommand::Shutdown) => {
                debug!("shutdown requested");
                break;
            }
            Err(crossbeam::channel::RecvError) => break,
        }
    }

    manager.shutdown();
    info!("engine stopped");
    publish(&update_tx, EngineUpdate::Stopped);
}

fn send_octave(update_tx: &Sender<EngineUpdate>, change: OctaveChange) {
    publish(
        update_tx,
        EngineUpdate::OctaveChanged {
            octave: change.octave,
            clamped: change.clamped,
        },
    );
}

/// Never blocks the engine on its readers.
fn publish(update_tx: &Sender<EngineUpdate>, update: EngineUpdate) {
    if let Err(TrySendError::Full(update)) = update_tx.try_send(update) {
        trace!(?update, "update queue full, dropping");
    }
}
