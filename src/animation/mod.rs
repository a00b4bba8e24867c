pub mod camera_transition;
pub mod easing;
pub mod hover;
pub mod tween;
