/// Runner: drives the face from a frame interval and emits frames.
use anyhow::{Context, Result};
use std::io::Write;
use tokio::time::{self, Duration};
use tracing::{debug, info, warn};

use crate::config::{OutputMode, RunConfig};
use crate::core::face::{Face, Host};
use crate::face::model::WatchFaceConfig;
use crate::render::compositor::Compositor;

/// Frame rates above this would round the frame period down to zero
pub const MAX_FPS: u32 = 1000;

/// Frame period, with the rate clamped to `1..=MAX_FPS`
fn frame_period(fps: u32) -> Duration {
    Duration::from_millis(1000 / fps.clamp(1, MAX_FPS) as u64)
}

pub struct Runner {
    config: RunConfig,
    host: Host,
    compositor: Compositor,
}

impl Runner {
    pub fn new(config: RunConfig, host: Host) -> Result<Self> {
        let compositor = Compositor::new(host.display.width, host.display.height)
            .context("Failed to set up compositor")?;
        Ok(Self {
            config,
            host,
            compositor,
        })
    }

    /// Show the face (from `face` if given, otherwise from the resource
    /// blob) and run until the frame limit or Ctrl-C.
    pub async fn run(&mut self, face: Option<WatchFaceConfig>) -> Result<()> {
        let fps = self.config.fps.clamp(1, MAX_FPS);
        if fps != self.config.fps {
            warn!("Frame rate {} out of range, using {}", self.config.fps, fps);
        }
        let mut interval = time::interval(frame_period(fps));
        let mut frames_rendered: u64 = 0;

        info!(
            "Starting face on {} ({}x{}) @ {}fps, output: {:?}",
            self.config.platform.name(),
            self.host.display.width,
            self.host.display.height,
            fps,
            self.config.output_mode
        );

        let mut face = match face {
            Some(config) => Face::show_config(&self.host, config, &mut self.compositor),
            None => Face::show(&self.host, &mut self.compositor),
        };

        debug!("Updating every {:?}", face.tick_unit());

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        let result = loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Interrupted, stopping");
                    break Ok(());
                }
                _ = interval.tick() => {
                    let now = self.host.clock.now();
                    let ticked = face.poll(&now, self.host.clock.is_24h(), &mut self.compositor);
                    self.compositor.composite(|slot, surface| face.paint(slot, surface));

                    if let Err(e) = self.emit(frames_rendered == 0 || ticked) {
                        break Err(e);
                    }
                    frames_rendered += 1;

                    if self.config.max_frames > 0 && frames_rendered >= self.config.max_frames {
                        info!("Rendered {} frame(s), stopping", frames_rendered);
                        break Ok(());
                    }
                }
            }
        };

        face.hide(&mut self.compositor);
        let leaked = self.compositor.live_slots();
        if leaked > 0 {
            warn!("{} slot(s) still alive after hide", leaked);
        }
        result
    }

    fn emit(&self, changed: bool) -> Result<()> {
        match self.config.output_mode {
            OutputMode::Png => {
                if changed {
                    self.compositor
                        .save_png(&self.config.output_path)
                        .context("Failed to save PNG output")?;
                    debug!(
                        "Saved frame {} to {}",
                        self.compositor.frame(),
                        self.config.output_path.display()
                    );
                }
            }
            OutputMode::Raw => {
                std::io::stdout()
                    .write_all(self.compositor.pixels())
                    .context("Failed to write raw frame")?;
            }
        }
        Ok(())
    }
}
