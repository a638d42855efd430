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

//! Creation and management of windows.

#![allow(non_snake_case)]

use std::cell::{Cell, RefCell};
use std::mem;
use std::ptr::{null, null_mut};
use std::rc::{Rc, Weak};

use log::error;

use winapi::ctypes::c_int;
use winapi::shared::basetsd::*;
use winapi::shared::minwindef::*;
use winapi::shared::windef::*;
use winapi::um::winnt::*;
use winapi::um::wingdi::*;
use winapi::um::winuser::*;

use crate::d2d::{D2DFactory, DrawStatus, HwndRenderTarget};
use crate::paint::{self, PaintCtx};
use crate::util::{ToWide, OPTIONAL_FUNCTIONS};
use crate::Error;

/// Builder abstraction for creating new windows.
pub struct WindowBuilder {
    handler: Option<Box<dyn WinHandler>>,
    dwStyle: DWORD,
    title: String,
}

#[derive(Clone, Default)]
pub struct WindowHandle(Weak<WindowState>);

struct WindowState {
    hwnd: Cell<HWND>,
    dpi: Cell<f32>,
    wndproc: Box<dyn WndProc>,
}

/// App behavior, supplied by the app.
///
/// Many of the "window procedure" messages map to calls to this trait.
/// The methods are non-mut because the window procedure can be called
/// recursively; implementers are expected to use `RefCell` or the like,
/// but should be careful to keep the lifetime of the borrow short.
pub trait WinHandler {
    /// Provide the handler with a handle to the window so that it can
    /// invalidate or make other requests.
    fn connect(&self, handle: &WindowHandle);

    /// Called when the size of the window is changed. Note that size
    /// is in physical pixels.
    #[allow(unused_variables)]
    fn size(&self, width: u32, height: u32) {}

    /// Request the handler to paint the window contents. The drawing batch
    /// is begun and ended by the shell; the handler only issues draw calls.
    fn paint(&self, ctx: &mut PaintCtx);

    /// Called when the shell has discarded the render target. Any resource
    /// the handler created against it is stale and must be dropped; it can
    /// be rebuilt against the new target on the next paint.
    fn rebuild_resources(&self) {}

    /// Called when the window is being destroyed. Note that this happens
    /// earlier in the sequence than drop (at WM_DESTROY, while the latter is
    /// WM_NCDESTROY).
    fn destroy(&self) {}
}

/// Generic handler trait for the winapi window procedure entry point.
trait WndProc {
    fn connect(&self, handle: &WindowHandle);

    fn window_proc(&self, hwnd: HWND, msg: UINT, wparam: WPARAM, lparam: LPARAM)
        -> Option<LRESULT>;
}

// State and logic for the winapi window procedure entry point. Note that this
// level implements policies such as the use of Direct2D for painting: it owns
// the device-independent factory and the lazily created render target, and
// decides when the latter must be discarded.
struct MyWndProc {
    handler: Box<dyn WinHandler>,
    handle: RefCell<WindowHandle>,
    d2d_factory: D2DFactory,
    render_target: RefCell<Option<HwndRenderTarget>>,
}

impl WndProc for MyWndProc {
    fn connect(&self, handle: &WindowHandle) {
        *self.handle.borrow_mut() = handle.clone();
        self.handler.connect(handle);
    }

    fn window_proc(
        &self,
        hwnd: HWND,
        msg: UINT,
        _wparam: WPARAM,
        lparam: LPARAM,
    ) -> Option<LRESULT> {
        match msg {
            WM_ERASEBKGND => Some(0),
            WM_PAINT => unsafe {
                if self.render_target.borrow().is_none() {
                    let rt = paint::create_render_target(&self.d2d_factory, hwnd);
                    *self.render_target.borrow_mut() = rt.ok();
                }
                let status = {
                    let mut tmp = self.render_target.borrow_mut();
                    match tmp.as_mut() {
                        Some(rt) => {
                            rt.begin_draw();
                            self.handler.paint(&mut PaintCtx {
                                d2d_factory: &self.d2d_factory,
                                render_target: rt,
                            });
                            Some(rt.end_draw())
                        }
                        // Creation failed; skip drawing. A later paint
                        // request will retry.
                        None => None,
                    }
                };
                match status {
                    Some(DrawStatus::RecreateTarget) => {
                        // The target is stale. Drop it and everything bound
                        // to it; the next paint rebuilds both lazily.
                        *self.render_target.borrow_mut() = None;
                        self.handler.rebuild_resources();
                    }
                    Some(DrawStatus::Failed(hr)) => {
                        error!("EndDraw failed: 0x{:x}", hr);
                    }
                    _ => (),
                }
                ValidateRect(hwnd, null_mut());
                Some(0)
            },
            WM_SIZE => {
                let width = LOWORD(lparam as u32) as u32;
                let height = HIWORD(lparam as u32) as u32;
                if let Some(ref mut rt) = *self.render_target.borrow_mut() {
                    // This can fail, but it's okay to ignore the error here:
                    // it will be returned again by the next EndDraw.
                    let _ = rt.resize(width, height);
                }
                self.handler.size(width, height);
                Some(0)
            }
            WM_DISPLAYCHANGE => unsafe {
                InvalidateRect(hwnd, null_mut(), FALSE);
                Some(0)
            },
            WM_DESTROY => {
                self.handler.destroy();
                None
            }
            _ => None,
        }
    }
}

impl WindowBuilder {
    pub fn new() -> WindowBuilder {
        WindowBuilder {
            handler: None,
            dwStyle: WS_OVERLAPPEDWINDOW,
            title: String::new(),
        }
    }

    /// This takes ownership of the handler; it is dropped with the window.
    pub fn set_handler(&mut self, handler: Box<dyn WinHandler>) {
        self.handler = Some(handler);
    }

    pub fn set_title<S: Into<String>>(&mut self, title: S) {
        self.title = title.into();
    }

    pub fn build(self) -> Result<WindowHandle, Error> {
        unsafe {
            // Maybe separate registration in build api? Probably only need to
            // register once even for multiple window creation.
            let class_name = "Diagram Designer".to_wide();
            let icon = LoadIconW(0 as HINSTANCE, IDI_APPLICATION);
            let cursor = LoadCursorW(0 as HINSTANCE, IDC_ARROW);
            let brush = CreateSolidBrush(0xff_ff_ff);
            let wnd = WNDCLASSW {
                style: 0,
                lpfnWndProc: Some(win_proc_dispatch),
                cbClsExtra: 0,
                cbWndExtra: 0,
                hInstance: 0 as HINSTANCE,
                hIcon: icon,
                hCursor: cursor,
                hbrBackground: brush,
                lpszMenuName: 0 as LPCWSTR,
                lpszClassName: class_name.as_ptr(),
            };
            let class_atom = RegisterClassW(&wnd);
            if class_atom == 0 {
                return Err(Error::Null);
            }

            let wndproc = MyWndProc {
                handler: self.handler.unwrap(),
                handle: Default::default(),
                d2d_factory: D2DFactory::new()?,
                render_target: RefCell::new(None),
            };

            let window = WindowState {
                hwnd: Cell::new(0 as HWND),
                dpi: Cell::new(0.0),
                wndproc: Box::new(wndproc),
            };
            let win = Rc::new(window);
            let handle = WindowHandle(Rc::downgrade(&win));

            // Simple scaling based on System Dpi (96 is equivalent to 100%)
            let dpi = if let Some(func) = OPTIONAL_FUNCTIONS.GetDpiForSystem {
                // Only supported on windows 10
                func() as f32
            } else {
                // TODO GetDpiForMonitor is supported on windows 8.1, try
                // falling back to that here
                96.0
            };
            win.dpi.set(dpi);
            let width = (640.0 * (dpi / 96.0)) as i32;
            let height = (480.0 * (dpi / 96.0)) as i32;

            let hwnd = create_window(
                0,
                class_name.as_ptr(),
                self.title.to_wide().as_ptr(),
                self.dwStyle,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                width,
                height,
                0 as HWND,
                0 as HMENU,
                0 as HINSTANCE,
                win.clone(),
            );
            if hwnd.is_null() {
                return Err(Error::Null);
            }

            win.hwnd.set(hwnd);
            win.wndproc.connect(&handle);
            mem::drop(win);
            Ok(handle)
        }
    }
}

unsafe extern "system" fn win_proc_dispatch(
    hwnd: HWND,
    msg: UINT,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_CREATE {
        let create_struct = &*(lparam as *const CREATESTRUCTW);
        let wndproc_ptr = create_struct.lpCreateParams;
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, wndproc_ptr as LONG_PTR);
    }
    let window_ptr = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *const WindowState;
    let result = {
        if window_ptr.is_null() {
            None
        } else {
            (*window_ptr).wndproc.window_proc(hwnd, msg, wparam, lparam)
        }
    };
    if msg == WM_NCDESTROY && !window_ptr.is_null() {
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
        mem::drop(Rc::from_raw(window_ptr));
    }
    match result {
        Some(lresult) => lresult,
        None => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

/// Create a window (same parameters as CreateWindowExW) with associated
/// WndProc.
unsafe fn create_window(
    dwExStyle: DWORD,
    lpClassName: LPCWSTR,
    lpWindowName: LPCWSTR,
    dwStyle: DWORD,
    x: c_int,
    y: c_int,
    nWidth: c_int,
    nHeight: c_int,
    hWndParent: HWND,
    hMenu: HMENU,
    hInstance: HINSTANCE,
    wndproc: Rc<WindowState>,
) -> HWND {
    CreateWindowExW(
        dwExStyle,
        lpClassName,
        lpWindowName,
        dwStyle,
        x,
        y,
        nWidth,
        nHeight,
        hWndParent,
        hMenu,
        hInstance,
        Rc::into_raw(wndproc) as LPVOID,
    )
}

impl WindowHandle {
    pub fn show(&self) {
        if let Some(w) = self.0.upgrade() {
            let hwnd = w.hwnd.get();
            unsafe {
                ShowWindow(hwnd, SW_SHOWNORMAL);
                UpdateWindow(hwnd);
            }
        }
    }

    pub fn close(&self) {
        if let Some(w) = self.0.upgrade() {
            let hwnd = w.hwnd.get();
            unsafe {
                DestroyWindow(hwnd);
            }
        }
    }

    pub fn invalidate(&self) {
        if let Some(w) = self.0.upgrade() {
            let hwnd = w.hwnd.get();
            unsafe {
                InvalidateRect(hwnd, null(), FALSE);
            }
        }
    }

    /// Get the raw HWND handle, for uses that are not wrapped in the shell.
    pub fn get_hwnd(&self) -> Option<HWND> {
        self.0.upgrade().map(|w| w.hwnd.get())
    }

    /// Get the dpi of the window.
    pub fn get_dpi(&self) -> f32 {
        if let Some(w) = self.0.upgrade() {
            w.dpi.get()
        } else {
            96.0
        }
    }
}
