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

//! Opens a window showing the diagram canvas.

use diagram_win_shell::canvas::DiagramCanvas;
use diagram_win_shell::win_main;
use diagram_win_shell::window::WindowBuilder;

fn main() {
    simple_logger::init_with_level(log::Level::Info).unwrap();
    diagram_win_shell::init();

    let mut run_loop = win_main::RunLoop::new();
    let mut builder = WindowBuilder::new();
    builder.set_handler(Box::new(DiagramCanvas::new()));
    builder.set_title("Diagram Designer");
    let window = builder.build().unwrap();
    window.show();
    run_loop.run();
}
