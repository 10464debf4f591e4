// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Camera synchronisation between the main and the picture-in-picture viewer.

use crate::viewer::{FrameLoop, ViewerHandle};

/// Copies the source camera into the target on every tick.
pub struct CameraSync<V: ViewerHandle> {
    source: V,
    target: V,
    ticks: u64,
}

impl<V: ViewerHandle> CameraSync<V> {
    pub fn new(source: V, target: V) -> Self {
        Self {
            source,
            target,
            ticks: 0,
        }
    }

    /// Copy the current transform. Does nothing while the source has no camera.
    pub fn tick(&mut self) {
        self.ticks += 1;
        if let Some(transform) = self.source.camera_transform() {
            self.target.set_camera_transform(&transform);
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Owner of a running frame loop. Cancels it on drop.
pub struct SyncHandle<F: FrameLoop> {
    frames: Option<F>,
}

impl<F: FrameLoop> SyncHandle<F> {
    pub fn new(frames: F) -> Self {
        Self {
            frames: Some(frames),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(mut frames) = self.frames.take() {
            frames.cancel();
            tracing::debug!("Camera sync loop cancelled");
        }
    }

    pub fn is_running(&self) -> bool {
        self.frames.as_ref().is_some_and(|frames| frames.is_running())
    }
}

impl<F: FrameLoop> Drop for SyncHandle<F> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingLoop {
        running: bool,
        cancels: Rc<Cell<u32>>,
    }

    impl FrameLoop for CountingLoop {
        fn cancel(&mut self) {
            if self.running {
                self.running = false;
                self.cancels.set(self.cancels.get() + 1);
            }
        }

        fn is_running(&self) -> bool {
            self.running
        }
    }

    #[test]
    fn test_drop_cancels_once() {
        let cancels = Rc::new(Cell::new(0));
        let mut handle = SyncHandle::new(CountingLoop {
            running: true,
            cancels: cancels.clone(),
        });
        assert!(handle.is_running());
        handle.cancel();
        assert!(!handle.is_running());
        drop(handle);
        assert_eq!(cancels.get(), 1);
    }

    #[test]
    fn test_drop_without_explicit_cancel() {
        let cancels = Rc::new(Cell::new(0));
        {
            let _handle = SyncHandle::new(CountingLoop {
                running: true,
                cancels: cancels.clone(),
            });
        }
        assert_eq!(cancels.get(), 1);
    }
}
