// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Buttons of the control panel, grouped as they are laid out.

use crate::panel::ViewerPanel;
use crate::params::{CameraType, NavigationMode, ViewType};
use crate::viewer::ViewerBackend;

/// One discrete panel action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Navigate(NavigationMode),
    View(ViewType),
    ZoomToSelection,
    Clip,
    HideClippingControl,
    Unclip,
    ClipBox,
    ReleaseClipBox,
    Camera(CameraType),
    StopCube,
    StartCube,
    StopGrid,
    StartGrid,
}

/// Row of related buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlGroup {
    pub title: Option<&'static str>,
    pub controls: Vec<Control>,
}

impl Control {
    pub fn label(&self) -> &'static str {
        match self {
            Control::Navigate(mode) => mode.label(),
            Control::View(view) => view.label(),
            Control::ZoomToSelection => "Zoom to selection",
            Control::Clip => "Clip model",
            Control::HideClippingControl => "Hide control",
            Control::Unclip => "Reset clipping",
            Control::ClipBox => "Clip model with box",
            Control::ReleaseClipBox => "Release clip box",
            Control::Camera(camera) => camera.label(),
            Control::StopCube => "Stop cube",
            Control::StartCube => "Start cube",
            Control::StopGrid => "Stop grid",
            Control::StartGrid => "Start grid",
        }
    }

    pub fn apply<B: ViewerBackend>(&self, panel: &mut ViewerPanel<B>) {
        match *self {
            Control::Navigate(mode) => panel.set_navigation_mode(mode),
            Control::View(view) => panel.show(view),
            Control::ZoomToSelection => panel.zoom_to_selection(),
            Control::Clip => panel.clip(),
            Control::HideClippingControl => panel.hide_clipping_control(),
            Control::Unclip => panel.unclip(),
            Control::ClipBox => panel.clip_box(),
            Control::ReleaseClipBox => panel.release_clip_box(),
            Control::Camera(camera) => panel.set_camera_type(camera),
            Control::StopCube => panel.stop_cube(),
            Control::StartCube => panel.start_cube(),
            Control::StopGrid => panel.stop_grid(),
            Control::StartGrid => panel.start_grid(),
        }
    }

    /// Every button, in panel order.
    pub fn groups() -> Vec<ControlGroup> {
        let navigation = NavigationMode::ALL.into_iter().map(Control::Navigate).collect();
        let mut views: Vec<Control> = ViewType::ALL.into_iter().map(Control::View).collect();
        views.push(Control::ZoomToSelection);

        vec![
            ControlGroup {
                title: None,
                controls: navigation,
            },
            ControlGroup {
                title: None,
                controls: views,
            },
            ControlGroup {
                title: None,
                controls: vec![
                    Control::Clip,
                    Control::HideClippingControl,
                    Control::Unclip,
                    Control::ClipBox,
                    Control::ReleaseClipBox,
                ],
            },
            ControlGroup {
                title: None,
                controls: vec![
                    Control::Camera(CameraType::Perspective),
                    Control::Camera(CameraType::Orthogonal),
                ],
            },
            ControlGroup {
                title: Some("Grid and navigation cube"),
                controls: vec![
                    Control::StopCube,
                    Control::StartCube,
                    Control::StopGrid,
                    Control::StartGrid,
                ],
            },
        ]
    }
}
