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

//! Errors at the application shell level.

use std::fmt;

use winapi::shared::winerror::HRESULT;

/// Shell errors. At the moment, this is little more than HRESULT, but that
/// might change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A winapi call returned a null handle or pointer.
    Null,
    /// A winapi call failed with the contained result code.
    Hr(HRESULT),
    /// A Direct2D call failed.
    D2Error,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Null => write!(f, "unexpected null pointer"),
            Error::Hr(hr) => write!(f, "hresult 0x{:x}", hr),
            Error::D2Error => write!(f, "direct2d error"),
        }
    }
}

impl std::error::Error for Error {}

impl From<HRESULT> for Error {
    fn from(hr: HRESULT) -> Error {
        Error::Hr(hr)
    }
}
