//! Click-to-focus camera moves.
//!
//! Every selection change starts a fresh [`Tween`] from wherever the camera
//! is at that instant. A transition that is still running is dropped, so two
//! quick clicks never blend toward a stale target.

use glam::{Quat, Vec3};

use crate::{
    animation::{easing::Easing, tween::Tween},
    camera::{Camera, CameraState},
};

/// Distance kept between a focused frame and the camera, along the frame's
/// local +Z axis.
pub const FOCUS_DISTANCE: f32 = 2.0;
/// Seconds per camera transition.
pub const TRANSITION_DURATION: f32 = 1.5;
pub const TRANSITION_EASING: Easing = Easing::CubicOut;

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Idle,
    Transitioning,
}

/// World pose of whatever the camera should look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusTarget {
    pub position: Vec3,
    pub orientation: Quat,
}

pub struct CameraController {
    original: CameraState,
    transition: Option<Tween<CameraState>>,
}

impl CameraController {
    pub fn new(original: CameraState) -> Self {
        Self {
            original,
            transition: None,
        }
    }

    /// Where the camera should end up for a given selection.
    ///
    /// Resetting always uses the identity orientation rather than the
    /// orientation captured at startup.
    pub fn target_for(&self, focus: Option<FocusTarget>) -> CameraState {
        match focus {
            Some(focus) => CameraState {
                position: focus.position + focus.orientation * (Vec3::Z * FOCUS_DISTANCE),
                orientation: focus.orientation,
            },
            None => CameraState {
                position: self.original.position,
                orientation: Quat::IDENTITY,
            },
        }
    }

    pub fn on_selection_changed(&mut self, focus: Option<FocusTarget>, camera: &Camera, now: f32) {
        let target = self.target_for(focus);

        if self.transition.is_some() {
            log::debug!("Camera transition superseded");
        }

        self.transition = Some(Tween::new(
            camera.state(),
            target,
            now,
            TRANSITION_DURATION,
            TRANSITION_EASING,
        ));
    }

    /// Advances the active transition, writing the interpolated state into
    /// `camera`. Returns to idle once the target is reached.
    pub fn update(&mut self, camera: &mut Camera, now: f32) {
        let Some(transition) = self.transition else {
            return;
        };

        camera.set_state(transition.sample(now));

        if transition.is_finished(now) {
            log::debug!("Camera transition finished");
            self.transition = None;
        }
    }
}

#[cfg(test)]
impl CameraController {
    pub fn original(&self) -> CameraState {
        self.original
    }

    pub fn state(&self) -> TransitionState {
        match self.transition {
            Some(_) => TransitionState::Transitioning,
            None => TransitionState::Idle,
        }
    }

    pub fn target(&self) -> Option<CameraState> {
        self.transition.map(|transition| transition.to)
    }
}
