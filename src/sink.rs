//! Background frame sink: receives composited frames over a bounded channel
//! and encodes every Nth one to PNG. The render loop hands frames off with
//! `try_send` and drops them if the encoder is busy, so the 30 fps tick never
//! stalls on disk I/O.

use std::{
    fs,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use anyhow::Result;
use crossbeam_channel::{RecvTimeoutError, Sender, bounded};
use image::RgbaImage;

use crate::types::Frame;

#[derive(Debug)]
pub struct FrameSink {
    tx: Sender<Frame>,
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FrameSink {
    /// Queue a frame for encoding; dropped silently when the sink is behind.
    pub fn submit(&self, frame: Frame) {
        let _ = self.tx.try_send(frame);
    }

    pub fn stop(mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for FrameSink {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Spawn the sink thread. `stride` keeps one frame out of every N; the rest
/// are counted but not written.
pub fn start_frame_sink(output_dir: PathBuf, stride: u64) -> Result<FrameSink> {
    fs::create_dir_all(&output_dir)?;

    let (tx, rx) = bounded::<Frame>(2);
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();
    let stride = stride.max(1);

    let handle = thread::spawn(move || {
        let mut received: u64 = 0;

        loop {
            let frame = match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(frame) => frame,
                Err(RecvTimeoutError::Timeout) => {
                    if stop_flag.load(Ordering::Relaxed) {
                        break;
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            };

            received += 1;
            if received % stride != 0 {
                continue;
            }

            let Some(img) = RgbaImage::from_raw(frame.width, frame.height, frame.rgba) else {
                log::warn!("dropping frame with inconsistent buffer size");
                continue;
            };

            let path = output_dir.join(format!("frame-{received:06}.png"));
            if let Err(err) = img.save(&path) {
                log::warn!("failed to write {}: {err:?}", path.display());
            } else {
                log::debug!("wrote {}", path.display());
            }
        }
    });

    Ok(FrameSink {
        tx,
        stop,
        handle: Some(handle),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gesture-overlay-sink-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn writes_strided_frames_to_disk() {
        let dir = temp_dir("stride");
        let sink = start_frame_sink(dir.clone(), 2).unwrap();

        for _ in 0..4 {
            sink.submit(Frame {
                rgba: vec![255; 4 * 4 * 4],
                width: 4,
                height: 4,
                timestamp: Instant::now(),
            });
            // Keep the bounded queue from dropping any of the four frames.
            thread::sleep(Duration::from_millis(50));
        }
        sink.stop();

        let written = fs::read_dir(&dir).unwrap().count();
        assert_eq!(written, 2);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn stop_joins_cleanly_without_frames() {
        let dir = temp_dir("idle");
        let sink = start_frame_sink(dir.clone(), 1).unwrap();
        sink.stop();
        let _ = fs::remove_dir_all(&dir);
    }
}
