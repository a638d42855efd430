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

//! Windows main loop.

use std::mem;
use std::ptr::null_mut;

use winapi::um::winbase::INFINITE;
use winapi::um::winuser::*;

pub struct RunLoop {}

impl RunLoop {
    pub fn new() -> RunLoop {
        RunLoop {}
    }

    /// Run the message loop until a quit message is posted.
    pub fn run(&mut self) {
        unsafe {
            loop {
                let handles = [];
                let _res = MsgWaitForMultipleObjectsEx(
                    handles.len() as u32,
                    handles.as_ptr(),
                    INFINITE,
                    QS_ALLEVENTS,
                    0,
                );

                // Handle windows messages
                loop {
                    let mut msg = mem::zeroed();
                    // Note: we could use PM_REMOVE here and avoid the
                    // GetMessage below
                    let res = PeekMessageW(&mut msg, null_mut(), 0, 0, PM_NOREMOVE);
                    if res == 0 {
                        break;
                    }
                    let res = GetMessageW(&mut msg, null_mut(), 0, 0);
                    if res <= 0 {
                        return;
                    }
                    TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }
        }
    }
}

/// Request to quit the application, exiting the runloop.
pub fn request_quit() {
    unsafe {
        PostQuitMessage(0);
    }
}
