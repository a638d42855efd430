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

//! Bureaucracy to create render targets for painting.
//!
//! Render targets are created lazily, on the first paint after the window
//! comes up or after the previous target was discarded, and are sized to
//! the window's client area at that moment.

use std::mem;

use log::{error, warn};

use winapi::shared::windef::{HWND, RECT};
use winapi::um::winuser::GetClientRect;

use crate::d2d::{D2DFactory, HwndRenderTarget};
use crate::Error;

/// Context for painting by app into window.
pub struct PaintCtx<'a> {
    pub(crate) d2d_factory: &'a D2DFactory,
    pub(crate) render_target: &'a mut HwndRenderTarget,
}

impl<'a> PaintCtx<'a> {
    /// The Direct2D factory for this painting context.
    pub fn d2d_factory(&self) -> &D2DFactory {
        self.d2d_factory
    }

    /// The render target for this painting context.
    pub fn render_target(&mut self) -> &mut HwndRenderTarget {
        self.render_target
    }
}

pub(crate) unsafe fn create_render_target(
    d2d_factory: &D2DFactory,
    hwnd: HWND,
) -> Result<HwndRenderTarget, Error> {
    let mut rect: RECT = mem::zeroed();
    if GetClientRect(hwnd, &mut rect) == 0 {
        warn!("GetClientRect failed.");
        return Err(Error::D2Error);
    }
    let width = (rect.right - rect.left) as u32;
    let height = (rect.bottom - rect.top) as u32;
    let res = HwndRenderTarget::create(d2d_factory, hwnd, width, height);
    if let Err(ref e) = res {
        error!("Creating hwnd render target failed: {}", e);
    }
    res
}
