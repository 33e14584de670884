//! Capture session controller
//!
//! Owns at most one recording session at a time. Each session runs the
//! capture loop on its own thread; the caller only ever signals start and
//! stop.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, SyncSender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::recording::{ByteOrder, CaptureFileName, PcmWriter, SampleRate};
use crate::domain::session::CaptureState;

use super::capture_loop::{frame_buffer, resolve_buffer_bytes, run_capture_loop, LoopError};
use super::ports::{AudioInput, AudioInputFactory, CaptureStore, DeviceError, StorageError};

/// Errors from a capture session
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Audio input failed to initialize: {0}")]
    DeviceInitFailed(#[source] DeviceError),

    #[error("Audio input failed during capture: {0}")]
    DeviceRead(#[source] DeviceError),

    #[error("Failed writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to spawn capture thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("Capture thread panicked")]
    WorkerPanicked,
}

/// Result of [`CaptureController::start`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new session is recording into `path`
    Started { path: PathBuf },
    /// A session was already active; nothing was opened
    AlreadyRecording,
}

/// Summary of a finished session
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureReport {
    pub path: PathBuf,
    pub sample_rate: SampleRate,
    pub samples: u64,
    pub bytes: u64,
}

impl CaptureReport {
    /// Length of the captured audio
    pub fn duration_secs(&self) -> f64 {
        self.samples as f64 / self.sample_rate.hz() as f64
    }
}

struct ActiveSession {
    path: PathBuf,
    running: Arc<AtomicBool>,
    captured: Arc<AtomicU64>,
    handle: JoinHandle<Result<CaptureReport, CaptureError>>,
}

impl ActiveSession {
    fn is_live(&self) -> bool {
        !self.handle.is_finished() && self.running.load(Ordering::Acquire)
    }
}

/// Starts and stops capture sessions against an input factory and a store
pub struct CaptureController<F, S>
where
    F: AudioInputFactory,
    S: CaptureStore,
{
    factory: Arc<F>,
    store: Arc<S>,
    byte_order: ByteOrder,
    session: Mutex<Option<ActiveSession>>,
}

impl<F, S> CaptureController<F, S>
where
    F: AudioInputFactory,
    S: CaptureStore,
{
    pub fn new(factory: F, store: S, byte_order: ByteOrder) -> Self {
        Self {
            factory: Arc::new(factory),
            store: Arc::new(store),
            byte_order,
            session: Mutex::new(None),
        }
    }

    /// Begin recording at `rate`.
    ///
    /// Blocks until the worker has opened the device and the output file, so
    /// initialization failures are returned here. A second call while a
    /// session is live opens nothing and returns
    /// [`StartOutcome::AlreadyRecording`].
    pub fn start(&self, rate: SampleRate) -> Result<StartOutcome, CaptureError> {
        let mut slot = self.lock_session();

        if let Some(active) = slot.as_ref() {
            if active.is_live() {
                debug!("Start ignored, already recording to {}", active.path.display());
                return Ok(StartOutcome::AlreadyRecording);
            }
        }
        if let Some(stale) = slot.take() {
            reap(stale);
        }

        let running = Arc::new(AtomicBool::new(true));
        let captured = Arc::new(AtomicU64::new(0));
        let (ready_tx, ready_rx) = mpsc::sync_channel::<PathBuf>(1);

        let handle = {
            let factory = Arc::clone(&self.factory);
            let store = Arc::clone(&self.store);
            let running = Arc::clone(&running);
            let captured = Arc::clone(&captured);
            let order = self.byte_order;

            thread::Builder::new()
                .name("capture".to_string())
                .spawn(move || {
                    run_session(&*factory, &*store, rate, order, &running, &captured, ready_tx)
                })
                .map_err(CaptureError::Spawn)?
        };

        match ready_rx.recv() {
            Ok(path) => {
                *slot = Some(ActiveSession {
                    path: path.clone(),
                    running,
                    captured,
                    handle,
                });
                Ok(StartOutcome::Started { path })
            }
            // The worker hung up without signalling ready: it failed to
            // initialize, and its return value says why.
            Err(_) => match handle.join() {
                Ok(Err(e)) => Err(e),
                Ok(Ok(_)) | Err(_) => Err(CaptureError::WorkerPanicked),
            },
        }
    }

    /// Stop the active session.
    ///
    /// Returns once the device is released and the file is flushed and
    /// closed. With no active session this does nothing and returns `None`.
    pub fn stop(&self) -> Result<Option<CaptureReport>, CaptureError> {
        let Some(session) = self.lock_session().take() else {
            debug!("Stop ignored, not recording");
            return Ok(None);
        };

        session.running.store(false, Ordering::Release);
        match session.handle.join() {
            Ok(result) => result.map(Some),
            Err(_) => Err(CaptureError::WorkerPanicked),
        }
    }

    pub fn state(&self) -> CaptureState {
        match self.lock_session().as_ref() {
            Some(active) if active.is_live() => CaptureState::Recording,
            _ => CaptureState::Idle,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state().is_recording()
    }

    /// Samples read so far in the current (or last unstopped) session
    pub fn samples_captured(&self) -> u64 {
        self.lock_session()
            .as_ref()
            .map(|active| active.captured.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Output path of the current session
    pub fn current_path(&self) -> Option<PathBuf> {
        self.lock_session().as_ref().map(|active| active.path.clone())
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<ActiveSession>> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<F, S> Drop for CaptureController<F, S>
where
    F: AudioInputFactory,
    S: CaptureStore,
{
    fn drop(&mut self) {
        if let Some(session) = self.lock_session().take() {
            session.running.store(false, Ordering::Release);
            reap(session);
        }
    }
}

/// Join a session whose result nobody will collect
fn reap(session: ActiveSession) {
    match session.handle.join() {
        Ok(Ok(report)) => debug!("Reaped session {}", report.path.display()),
        Ok(Err(e)) => warn!("Previous session ended with error: {}", e),
        Err(_) => warn!("Previous capture thread panicked"),
    }
}

/// Worker body: open the device and sink, signal ready, run the loop, tear
/// down. Dropping `ready` without sending tells `start` that initialization
/// failed.
fn run_session<F, S>(
    factory: &F,
    store: &S,
    rate: SampleRate,
    order: ByteOrder,
    running: &AtomicBool,
    captured: &AtomicU64,
    ready: SyncSender<PathBuf>,
) -> Result<CaptureReport, CaptureError>
where
    F: AudioInputFactory,
    S: CaptureStore,
{
    raise_thread_priority();

    let buffer_bytes = resolve_buffer_bytes(factory.min_buffer_size(rate), rate);
    let mut frame = frame_buffer(buffer_bytes);

    let mut input = factory.open(rate, buffer_bytes).map_err(|e| {
        error!("Audio input can't initialize: {}", e);
        CaptureError::DeviceInitFailed(e)
    })?;

    let (path, writer) = store.create(&CaptureFileName::now())?;

    if let Err(e) = input.start() {
        error!("Audio input can't start: {}", e);
        drop(writer);
        store.discard(&path);
        return Err(CaptureError::DeviceInitFailed(e));
    }

    let mut sink = PcmWriter::new(writer, order);
    info!(
        "Recording {} to {} ({} sample frames)",
        rate,
        path.display(),
        frame.len()
    );
    let _ = ready.send(path.clone());

    let outcome = run_capture_loop(&mut input, &mut sink, &mut frame, running, captured);
    running.store(false, Ordering::Release);

    input.stop();
    drop(input);

    let samples = sink.samples_written();
    let bytes = sink.bytes_written();
    let finished = sink.finish();

    match (outcome, finished) {
        (Ok(read), Ok(_)) => {
            info!(
                "Recording stopped. Samples read: {} ({} bytes to {})",
                read,
                bytes,
                path.display()
            );
            Ok(CaptureReport {
                path,
                sample_rate: rate,
                samples,
                bytes,
            })
        }
        (Err(LoopError::Read { source, .. }), _) => {
            error!("Capture aborted after {} samples: {}", samples, source);
            Err(CaptureError::DeviceRead(source))
        }
        (Err(LoopError::Write { source, .. }), _) | (Ok(_), Err(source)) => {
            error!("Capture to {} failed: {}", path.display(), source);
            Err(CaptureError::Io { path, source })
        }
    }
}

/// Best-effort bump to audio scheduling priority for the calling thread
#[cfg(target_os = "linux")]
fn raise_thread_priority() {
    // Audio-class niceness. On Linux, who = 0 with
    // PRIO_PROCESS targets the calling thread.
    const AUDIO_NICE: libc::c_int = -16;

    // SAFETY: setpriority takes no pointers and only touches scheduler state.
    let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS, 0, AUDIO_NICE) };
    if rc != 0 {
        debug!(
            "Could not raise capture thread priority: {}",
            io::Error::last_os_error()
        );
    }
}

#[cfg(not(target_os = "linux"))]
fn raise_thread_priority() {}
