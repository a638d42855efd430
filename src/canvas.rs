// Copyright 2019 the Diagram Designer Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The diagram canvas: paints the designer's reference grid and two
//! rectangles centered on the drawing area.

use std::cell::RefCell;

use log::error;

use winapi::um::d2d1::{D2D1_RECT_F, D2D1_SIZE_F};

use crate::d2d::{HwndRenderTarget, SolidBrush};
use crate::paint::PaintCtx;
use crate::win_main;
use crate::window::{WinHandler, WindowHandle};
use crate::Error;

const BACKGROUND_COLOR: u32 = 0xff_ff_ff;
// Light slate gray, for the grid and the filled rectangle.
const GRID_COLOR: u32 = 0x77_88_99;
// Cornflower blue, for the outlined rectangle.
const OUTLINE_COLOR: u32 = 0x64_95_ed;

/// Distance between adjacent grid lines, in device-independent pixels.
const GRID_SPACING: u32 = 10;
const GRID_STROKE_WIDTH: f32 = 0.5;
const OUTLINE_STROKE_WIDTH: f32 = 1.0;

/// Half the side length of the filled center rectangle.
const INNER_HALF_EXTENT: f32 = 50.0;
/// Half the side length of the outlined center rectangle.
const OUTER_HALF_EXTENT: f32 = 100.0;

/// Window handler that paints the diagram canvas.
#[derive(Default)]
pub struct DiagramCanvas {
    state: RefCell<CanvasState>,
}

#[derive(Default)]
struct CanvasState {
    handle: WindowHandle,
    brushes: Option<Brushes>,
}

/// The canvas's device-dependent resources. Both brushes are bound to the
/// render target they were created against, so they live and die as a unit:
/// `rebuild_resources` drops the pair whenever the shell discards the
/// target, and the next paint recreates both.
struct Brushes {
    grid: SolidBrush,
    outline: SolidBrush,
}

impl Brushes {
    fn create(rt: &HwndRenderTarget) -> Result<Brushes, Error> {
        Ok(Brushes {
            grid: rt.create_solid_brush(GRID_COLOR)?,
            outline: rt.create_solid_brush(OUTLINE_COLOR)?,
        })
    }
}

impl DiagramCanvas {
    pub fn new() -> DiagramCanvas {
        Default::default()
    }

    /// A handle to the canvas's window, for callers that created the canvas
    /// before the window existed.
    pub fn window_handle(&self) -> WindowHandle {
        self.state.borrow().handle.clone()
    }
}

impl WinHandler for DiagramCanvas {
    fn connect(&self, handle: &WindowHandle) {
        self.state.borrow_mut().handle = handle.clone();
    }

    fn paint(&self, ctx: &mut PaintCtx) {
        let mut state = self.state.borrow_mut();
        if state.brushes.is_none() {
            match Brushes::create(ctx.render_target()) {
                Ok(brushes) => state.brushes = Some(brushes),
                Err(e) => {
                    error!("Creating canvas brushes failed: {}", e);
                    return;
                }
            }
        }
        let brushes = state.brushes.as_ref().unwrap();

        let rt = ctx.render_target();
        rt.set_identity_transform();
        rt.clear(BACKGROUND_COLOR);

        let size = rt.size();
        for x in grid_steps(size.width, GRID_SPACING) {
            rt.draw_line((x, 0.0), (x, size.height), &brushes.grid, GRID_STROKE_WIDTH);
        }
        for y in grid_steps(size.height, GRID_SPACING) {
            rt.draw_line((0.0, y), (size.width, y), &brushes.grid, GRID_STROKE_WIDTH);
        }

        let inner = centered_rect(size, INNER_HALF_EXTENT);
        let outer = centered_rect(size, OUTER_HALF_EXTENT);
        rt.fill_rectangle(&inner, &brushes.grid);
        rt.draw_rectangle(&outer, &brushes.outline, OUTLINE_STROKE_WIDTH);
    }

    fn rebuild_resources(&self) {
        self.state.borrow_mut().brushes = None;
    }

    fn destroy(&self) {
        win_main::request_quit();
    }
}

/// Offsets of the grid lines along one axis: every multiple of `spacing`
/// from zero up to, but not including, `extent`.
fn grid_steps(extent: f32, spacing: u32) -> impl Iterator<Item = f32> {
    (0..extent as u32)
        .step_by(spacing as usize)
        .map(|v| v as f32)
}

/// A rectangle centered on the drawing area, extending `half_extent` from
/// the center on each side.
fn centered_rect(size: D2D1_SIZE_F, half_extent: f32) -> D2D1_RECT_F {
    D2D1_RECT_F {
        left: size.width / 2.0 - half_extent,
        top: size.height / 2.0 - half_extent,
        right: size.width / 2.0 + half_extent,
        bottom: size.height / 2.0 + half_extent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(width: f32, height: f32) -> D2D1_SIZE_F {
        D2D1_SIZE_F { width, height }
    }

    #[test]
    fn grid_covers_exact_multiples() {
        let steps: Vec<f32> = grid_steps(800.0, GRID_SPACING).collect();
        assert_eq!(steps.len(), 80);
        assert_eq!(steps.first(), Some(&0.0));
        assert_eq!(steps.last(), Some(&790.0));
    }

    #[test]
    fn grid_stops_below_a_ragged_extent() {
        let steps: Vec<f32> = grid_steps(605.0, GRID_SPACING).collect();
        assert_eq!(steps.len(), 61);
        assert_eq!(steps.last(), Some(&600.0));
    }

    #[test]
    fn grid_is_empty_for_a_zero_extent() {
        assert_eq!(grid_steps(0.0, GRID_SPACING).count(), 0);
    }

    #[test]
    fn rectangles_at_initial_window_size() {
        let inner = centered_rect(size(800.0, 600.0), INNER_HALF_EXTENT);
        assert_eq!(
            (inner.left, inner.top, inner.right, inner.bottom),
            (350.0, 250.0, 450.0, 350.0)
        );
        let outer = centered_rect(size(800.0, 600.0), OUTER_HALF_EXTENT);
        assert_eq!(
            (outer.left, outer.top, outer.right, outer.bottom),
            (300.0, 200.0, 500.0, 400.0)
        );
    }

    #[test]
    fn rectangles_stay_concentric() {
        let s = size(1023.0, 77.0);
        let inner = centered_rect(s, INNER_HALF_EXTENT);
        let outer = centered_rect(s, OUTER_HALF_EXTENT);
        assert_eq!(inner.left + inner.right, outer.left + outer.right);
        assert_eq!(inner.top + inner.bottom, outer.top + outer.bottom);
    }
}
