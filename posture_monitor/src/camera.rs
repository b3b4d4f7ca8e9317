use anyhow::{Result, bail};
use opencv::{
    core::{self, Mat},
    highgui,
    prelude::*,
    videoio::{self, VideoCapture},
};

/// An open capture device, released exactly once when dropped.
pub struct Camera {
    device_id: i32,
    capture: VideoCapture,
}

impl Camera {
    pub fn open(device_id: i32) -> Result<Self> {
        let capture = VideoCapture::new(device_id, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            bail!("unable to open camera {device_id}");
        }

        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)?;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)?;
        tracing::info!(device_id, width, height, "camera opened");

        Ok(Self { device_id, capture })
    }

    /// Reads the next frame, or `None` once the stream ends or the device fails.
    pub fn read_frame(&mut self, mirror: bool) -> Option<Mat> {
        let mut frame = Mat::default();
        match self.capture.read(&mut frame) {
            Ok(true) if !frame.empty() => {}
            Ok(_) => {
                tracing::info!(device_id = self.device_id, "camera stream ended");
                return None;
            }
            Err(e) => {
                tracing::warn!(device_id = self.device_id, error = %e, "failed to read frame");
                return None;
            }
        }

        if !mirror {
            return Some(frame);
        }

        let mut mirrored = Mat::default();
        match core::flip(&frame, &mut mirrored, 1) {
            Ok(()) => Some(mirrored),
            Err(e) => {
                tracing::warn!(error = %e, "failed to mirror frame; using original");
                Some(frame)
            }
        }
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        match self.capture.release() {
            Ok(()) => tracing::info!(device_id = self.device_id, "camera released"),
            Err(e) => {
                tracing::warn!(device_id = self.device_id, error = %e, "failed to release camera")
            }
        }
    }
}

/// The preview window; all HighGUI windows are torn down when dropped.
pub struct Window {
    title: String,
}

impl Window {
    pub fn new(title: &str) -> Result<Self> {
        highgui::named_window(title, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            title: title.to_string(),
        })
    }

    pub fn show(&self, frame: &Mat) -> Result<()> {
        highgui::imshow(&self.title, frame)?;
        Ok(())
    }

    /// Waits up to `delay_ms` for a key and reports whether it was `quit_key`, in either case.
    pub fn quit_requested(&self, delay_ms: i32, quit_key: char) -> Result<bool> {
        let key = highgui::wait_key(delay_ms)?;
        if key < 0 {
            return Ok(false);
        }
        let pressed = char::from((key & 0xFF) as u8);
        Ok(pressed.eq_ignore_ascii_case(&quit_key))
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_all_windows() {
            tracing::warn!(error = %e, "failed to close windows");
        }
    }
}
