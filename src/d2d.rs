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

//! Thin wrappers over the Direct2D objects the shell manages.
//!
//! The factory is a device-independent resource and lives as long as the
//! window that created it. The render target and brushes are device
//! dependent: they are tied to the window surface and must be discarded and
//! rebuilt when the device reports the target as stale.

use std::ptr::{null, null_mut};

use winapi::ctypes::c_void;
use winapi::shared::dxgiformat::DXGI_FORMAT_UNKNOWN;
use winapi::shared::windef::HWND;
use winapi::shared::winerror::{HRESULT, SUCCEEDED};
use winapi::um::d2d1::*;
use winapi::um::dcommon::*;
use winapi::Interface;

use wio::com::ComPtr;

use crate::util::as_result;
use crate::Error;

// From d2derr.h; winapi does not translate the Direct2D error constants.
pub const D2DERR_RECREATE_TARGET: HRESULT = 0x8899_000Cu32 as HRESULT;

/// Outcome of ending a drawing batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawStatus {
    /// All drawing commands were committed.
    Complete,
    /// The render target has become invalid. It must be discarded, along
    /// with every resource created against it, and rebuilt before the next
    /// frame.
    RecreateTarget,
    /// Any other failure, with the result code.
    Failed(HRESULT),
}

impl From<HRESULT> for DrawStatus {
    fn from(hr: HRESULT) -> DrawStatus {
        if hr == D2DERR_RECREATE_TARGET {
            DrawStatus::RecreateTarget
        } else if SUCCEEDED(hr) {
            DrawStatus::Complete
        } else {
            DrawStatus::Failed(hr)
        }
    }
}

/// The device-independent Direct2D factory.
pub struct D2DFactory {
    ptr: ComPtr<ID2D1Factory>,
}

impl D2DFactory {
    /// Create a single-threaded factory. The shell's message handling is
    /// strictly single-threaded, so the multithreaded factory would only
    /// buy lock overhead.
    pub fn new() -> Result<D2DFactory, Error> {
        unsafe {
            let mut ptr: *mut c_void = null_mut();
            as_result(D2D1CreateFactory(
                D2D1_FACTORY_TYPE_SINGLE_THREADED,
                &ID2D1Factory::uuidof(),
                null(),
                &mut ptr,
            ))?;
            Ok(D2DFactory {
                ptr: ComPtr::from_raw(ptr as *mut ID2D1Factory),
            })
        }
    }

    pub(crate) fn get_raw(&self) -> *mut ID2D1Factory {
        self.ptr.as_raw()
    }
}

/// A render target bound to a window surface.
///
/// The pixel size is tracked on the Rust side: it only changes through
/// [`HwndRenderTarget::create`] and [`HwndRenderTarget::resize`], and the COM
/// `GetSize` call returns an aggregate by value, which winapi's generated
/// method ABI does not handle.
pub struct HwndRenderTarget {
    ptr: ComPtr<ID2D1HwndRenderTarget>,
    size: D2D1_SIZE_U,
}

impl HwndRenderTarget {
    /// Create a render target covering `width` × `height` pixels of the
    /// window's client area.
    pub fn create(
        factory: &D2DFactory,
        hwnd: HWND,
        width: u32,
        height: u32,
    ) -> Result<HwndRenderTarget, Error> {
        unsafe {
            let props = D2D1_RENDER_TARGET_PROPERTIES {
                _type: D2D1_RENDER_TARGET_TYPE_DEFAULT,
                pixelFormat: D2D1_PIXEL_FORMAT {
                    format: DXGI_FORMAT_UNKNOWN,
                    alphaMode: D2D1_ALPHA_MODE_UNKNOWN,
                },
                dpiX: 0.0,
                dpiY: 0.0,
                usage: D2D1_RENDER_TARGET_USAGE_NONE,
                minLevel: D2D1_FEATURE_LEVEL_DEFAULT,
            };
            let size = D2D1_SIZE_U { width, height };
            let hprops = D2D1_HWND_RENDER_TARGET_PROPERTIES {
                hwnd,
                pixelSize: size,
                presentOptions: D2D1_PRESENT_OPTIONS_NONE,
            };
            let mut ptr: *mut ID2D1HwndRenderTarget = null_mut();
            as_result((*factory.get_raw()).CreateHwndRenderTarget(&props, &hprops, &mut ptr))?;
            Ok(HwndRenderTarget {
                ptr: ComPtr::from_raw(ptr),
                size,
            })
        }
    }

    /// The size of the drawing area, in device-independent pixels. The
    /// target is created with default (96) dpi, so these coincide with the
    /// pixel size it was created or last resized with.
    pub fn size(&self) -> D2D1_SIZE_F {
        D2D1_SIZE_F {
            width: self.size.width as f32,
            height: self.size.height as f32,
        }
    }

    /// Resize the target to track the window's client area.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        let size = D2D1_SIZE_U { width, height };
        as_result(unsafe { self.ptr.Resize(&size) })?;
        self.size = size;
        Ok(())
    }

    pub fn begin_draw(&mut self) {
        unsafe {
            self.ptr.BeginDraw();
        }
    }

    /// End the drawing batch, reporting whether the target survived it.
    pub fn end_draw(&mut self) -> DrawStatus {
        let hr = unsafe { self.ptr.EndDraw(null_mut(), null_mut()) };
        DrawStatus::from(hr)
    }

    /// Reset the transform to identity.
    pub fn set_identity_transform(&mut self) {
        let identity = D2D1_MATRIX_3X2_F {
            matrix: [[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]],
        };
        unsafe {
            self.ptr.SetTransform(&identity);
        }
    }

    pub fn clear(&mut self, rgb: u32) {
        let color = color_f(rgb);
        unsafe {
            self.ptr.Clear(&color);
        }
    }

    pub fn draw_line(
        &mut self,
        p0: (f32, f32),
        p1: (f32, f32),
        brush: &SolidBrush,
        stroke_width: f32,
    ) {
        unsafe {
            self.ptr.DrawLine(
                D2D1_POINT_2F { x: p0.0, y: p0.1 },
                D2D1_POINT_2F { x: p1.0, y: p1.1 },
                brush.raw(),
                stroke_width,
                null_mut(),
            );
        }
    }

    pub fn fill_rectangle(&mut self, rect: &D2D1_RECT_F, brush: &SolidBrush) {
        unsafe {
            self.ptr.FillRectangle(rect, brush.raw());
        }
    }

    pub fn draw_rectangle(&mut self, rect: &D2D1_RECT_F, brush: &SolidBrush, stroke_width: f32) {
        unsafe {
            self.ptr.DrawRectangle(rect, brush.raw(), stroke_width, null_mut());
        }
    }

    /// Create a solid-color brush bound to this target. The brush is only
    /// valid as long as the target it was created against.
    pub fn create_solid_brush(&self, rgb: u32) -> Result<SolidBrush, Error> {
        unsafe {
            let color = color_f(rgb);
            let mut ptr: *mut ID2D1SolidColorBrush = null_mut();
            as_result(self.ptr.CreateSolidColorBrush(&color, null(), &mut ptr))?;
            Ok(SolidBrush {
                ptr: ComPtr::from_raw(ptr),
            })
        }
    }
}

/// A solid-color brush, device dependent like the target that created it.
pub struct SolidBrush {
    ptr: ComPtr<ID2D1SolidColorBrush>,
}

impl SolidBrush {
    fn raw(&self) -> *mut ID2D1Brush {
        self.ptr.as_raw() as *mut ID2D1Brush
    }
}

fn color_f(rgb: u32) -> D2D1_COLOR_F {
    D2D1_COLOR_F {
        r: ((rgb >> 16) & 0xff) as f32 / 255.0,
        g: ((rgb >> 8) & 0xff) as f32 / 255.0,
        b: (rgb & 0xff) as f32 / 255.0,
        a: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winapi::shared::winerror::{E_FAIL, S_OK};

    #[test]
    fn draw_status_classification() {
        assert_eq!(DrawStatus::from(S_OK), DrawStatus::Complete);
        assert_eq!(
            DrawStatus::from(D2DERR_RECREATE_TARGET),
            DrawStatus::RecreateTarget
        );
        assert_eq!(DrawStatus::from(E_FAIL), DrawStatus::Failed(E_FAIL));
    }

    #[test]
    fn color_channels() {
        let c = color_f(0x77_88_99);
        assert!((c.r - 0x77 as f32 / 255.0).abs() < 1e-6);
        assert!((c.g - 0x88 as f32 / 255.0).abs() < 1e-6);
        assert!((c.b - 0x99 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
    }
}
