//! On-screen chart display.

use minifb::{Key, Window, WindowOptions};

use super::render::{render_rgb, rgb_to_0rgb, DEFAULT_SIZE};
use super::{Chart, ChartViewer, PlotError};

const FRAME_RATE: usize = 30;

/// Opens one window per chart and blocks until it is closed or Esc is pressed.
#[derive(Debug, Clone, Copy)]
pub struct WindowViewer {
    size: (u32, u32),
}

impl WindowViewer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
        }
    }
}

impl Default for WindowViewer {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE.0, DEFAULT_SIZE.1)
    }
}

impl ChartViewer for WindowViewer {
    fn show(&self, chart: &Chart) -> Result<(), PlotError> {
        let pixels = rgb_to_0rgb(&render_rgb(chart, self.size)?);
        let (width, height) = (self.size.0 as usize, self.size.1 as usize);

        let mut window =
            Window::new(&chart.title, width, height, WindowOptions::default()).map_err(window_error)?;
        window.set_target_fps(FRAME_RATE);
        tracing::info!(title = %chart.title, "showing chart window");

        while window.is_open() && !window.is_key_down(Key::Escape) {
            window
                .update_with_buffer(&pixels, width, height)
                .map_err(window_error)?;
        }
        tracing::debug!(title = %chart.title, "chart window closed");
        Ok(())
    }
}

fn window_error(error: minifb::Error) -> PlotError {
    PlotError::Window(error.to_string())
}
