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

//! Windows-specific application shell for the diagram designer.
//!
//! The shell owns the window plumbing: class registration, the window
//! procedure, the message loop, and the lifecycle of the Direct2D resources
//! a window draws with. App behavior is supplied through the
//! [`window::WinHandler`] trait; [`canvas::DiagramCanvas`] is the handler
//! that paints the designer's reference grid.

#[macro_use]
extern crate lazy_static;

pub mod canvas;
pub mod d2d;
pub mod error;
pub mod paint;
pub mod util;
pub mod win_main;
pub mod window;

pub use crate::error::Error;
pub use crate::util::init;
