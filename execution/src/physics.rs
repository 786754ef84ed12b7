use serde::{Deserialize, Serialize};
use std::{f64::consts::TAU, time::Duration};
use thiserror::Error;

use crate::defaults;

/// Frame the deflector positions are measured in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeflectorFrame {
    /// Deflectors sit on the static bowl; the absolute ball angle is tested.
    #[default]
    Bowl,
    /// Deflectors rotate with the wheel; the wheel-relative ball angle is tested.
    Wheel,
}

/// Wheel physics as read from a configuration file.
///
/// Every field has a default, so an empty document yields the stock wheel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    #[serde(default = "default_frame_nanos")]
    pub frame_nanos: u64,

    #[serde(default = "default_track_radius")]
    pub track_radius: f64,
    #[serde(default = "default_deflector_radius")]
    pub deflector_radius: f64,
    #[serde(default = "default_deflector_band")]
    pub deflector_band: f64,
    #[serde(default = "default_deflector_count")]
    pub deflector_count: u32,
    #[serde(default = "default_deflector_tolerance")]
    pub deflector_tolerance: f64,
    #[serde(default)]
    pub deflector_frame: DeflectorFrame,
    #[serde(default = "default_pocket_outer_radius")]
    pub pocket_outer_radius: f64,
    #[serde(default = "default_pocket_inner_radius")]
    pub pocket_inner_radius: f64,

    #[serde(default = "default_wheel_decay")]
    pub wheel_decay: f64,
    #[serde(default = "default_ball_decay")]
    pub ball_decay: f64,
    #[serde(default = "default_settled_wheel_decay")]
    pub settled_wheel_decay: f64,

    #[serde(default = "default_wheel_speed_min")]
    pub wheel_speed_min: f64,
    #[serde(default = "default_wheel_speed_max")]
    pub wheel_speed_max: f64,
    #[serde(default = "default_ball_speed_min")]
    pub ball_speed_min: f64,
    #[serde(default = "default_ball_speed_max")]
    pub ball_speed_max: f64,

    #[serde(default = "default_descent_margin")]
    pub descent_margin: f64,
    #[serde(default = "default_wheel_stall_speed")]
    pub wheel_stall_speed: f64,
    #[serde(default = "default_ball_stall_speed")]
    pub ball_stall_speed: f64,
    #[serde(default = "default_descent_kick")]
    pub descent_kick: f64,
    #[serde(default = "default_gravity")]
    pub gravity: f64,

    #[serde(default = "default_deflector_restitution")]
    pub deflector_restitution: f64,
    #[serde(default = "default_inner_rim_restitution")]
    pub inner_rim_restitution: f64,
    #[serde(default = "default_deflector_jitter")]
    pub deflector_jitter: f64,

    #[serde(default = "default_wheel_stop_speed")]
    pub wheel_stop_speed: f64,
    #[serde(default = "default_settle_deadline_frames")]
    pub settle_deadline_frames: u64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            frame_nanos: defaults::FRAME_NANOS,
            track_radius: defaults::DEFAULT_TRACK_RADIUS,
            deflector_radius: defaults::DEFAULT_DEFLECTOR_RADIUS,
            deflector_band: defaults::DEFAULT_DEFLECTOR_BAND,
            deflector_count: defaults::DEFAULT_DEFLECTOR_COUNT,
            deflector_tolerance: defaults::DEFAULT_DEFLECTOR_TOLERANCE,
            deflector_frame: DeflectorFrame::default(),
            pocket_outer_radius: defaults::DEFAULT_POCKET_OUTER_RADIUS,
            pocket_inner_radius: defaults::DEFAULT_POCKET_INNER_RADIUS,
            wheel_decay: defaults::DEFAULT_WHEEL_DECAY,
            ball_decay: defaults::DEFAULT_BALL_DECAY,
            settled_wheel_decay: defaults::DEFAULT_SETTLED_WHEEL_DECAY,
            wheel_speed_min: defaults::DEFAULT_WHEEL_SPEED_MIN,
            wheel_speed_max: defaults::DEFAULT_WHEEL_SPEED_MAX,
            ball_speed_min: defaults::DEFAULT_BALL_SPEED_MIN,
            ball_speed_max: defaults::DEFAULT_BALL_SPEED_MAX,
            descent_margin: defaults::DEFAULT_DESCENT_MARGIN,
            wheel_stall_speed: defaults::DEFAULT_WHEEL_STALL_SPEED,
            ball_stall_speed: defaults::DEFAULT_BALL_STALL_SPEED,
            descent_kick: defaults::DEFAULT_DESCENT_KICK,
            gravity: defaults::DEFAULT_GRAVITY,
            deflector_restitution: defaults::DEFAULT_DEFLECTOR_RESTITUTION,
            inner_rim_restitution: defaults::DEFAULT_INNER_RIM_RESTITUTION,
            deflector_jitter: defaults::DEFAULT_DEFLECTOR_JITTER,
            wheel_stop_speed: defaults::DEFAULT_WHEEL_STOP_SPEED,
            settle_deadline_frames: defaults::DEFAULT_SETTLE_DEADLINE_FRAMES,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be > 0 (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
    #[error("{field} must be in (0, 1) (got {value})")]
    DecayOutOfRange { field: &'static str, value: f64 },
    #[error("wheel_decay must be below ball_decay (wheel_decay={wheel}, ball_decay={ball})")]
    DecayOrder { wheel: f64, ball: f64 },
    #[error("{field} range is empty (min={min}, max={max})")]
    EmptyRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("ball_speed_min must be >= wheel_speed_max (ball_speed_min={ball}, wheel_speed_max={wheel})")]
    BallSlowerThanWheel { ball: f64, wheel: f64 },
    #[error("{inner} must be below {outer} ({inner}={inner_value}, {outer}={outer_value})")]
    RadiusOrder {
        inner: &'static str,
        outer: &'static str,
        inner_value: f64,
        outer_value: f64,
    },
    #[error("deflector_tolerance must be in (0, 0.5] (got {value})")]
    ToleranceOutOfRange { value: f64 },
    #[error("{field} must be in [0, 1] (got {value})")]
    RestitutionOutOfRange { field: &'static str, value: f64 },
}

/// Validated wheel physics, with derived angular quantities.
#[derive(Clone, Debug, PartialEq)]
pub struct WheelPhysics {
    pub frame: Duration,

    pub track_radius: f64,
    pub deflector_radius: f64,
    pub deflector_band: f64,
    pub deflector_count: u32,
    /// Angle between neighbouring deflectors.
    pub deflector_spacing: f64,
    /// Maximum angular distance from a deflector that still registers a hit.
    pub deflector_tolerance: f64,
    pub deflector_frame: DeflectorFrame,
    pub pocket_outer_radius: f64,
    pub pocket_inner_radius: f64,

    pub wheel_decay: f64,
    pub ball_decay: f64,
    pub settled_wheel_decay: f64,

    pub wheel_speed_min: f64,
    pub wheel_speed_max: f64,
    pub ball_speed_min: f64,
    pub ball_speed_max: f64,

    pub descent_margin: f64,
    pub wheel_stall_speed: f64,
    pub ball_stall_speed: f64,
    pub descent_kick: f64,
    pub gravity: f64,

    pub deflector_restitution: f64,
    pub inner_rim_restitution: f64,
    pub deflector_jitter: f64,

    pub wheel_stop_speed: f64,
    pub settle_deadline_frames: u64,
}

impl WheelPhysics {
    /// Number of reference frames covered by `dt`.
    pub fn frames_in(&self, dt: Duration) -> f64 {
        dt.as_secs_f64() / self.frame.as_secs_f64()
    }

    /// Radius the ball is dropped to when the settle deadline passes.
    pub fn pocket_mid_radius(&self) -> f64 {
        (self.pocket_outer_radius + self.pocket_inner_radius) / 2.0
    }
}

impl PhysicsConfig {
    pub fn validate(self) -> Result<WheelPhysics, ConfigError> {
        ensure_nonzero("frame_nanos", self.frame_nanos)?;
        ensure_nonzero("deflector_count", u64::from(self.deflector_count))?;
        ensure_nonzero("settle_deadline_frames", self.settle_deadline_frames)?;

        for (field, value) in [
            ("track_radius", self.track_radius),
            ("deflector_radius", self.deflector_radius),
            ("deflector_band", self.deflector_band),
            ("pocket_outer_radius", self.pocket_outer_radius),
            ("pocket_inner_radius", self.pocket_inner_radius),
            ("wheel_speed_min", self.wheel_speed_min),
            ("ball_speed_min", self.ball_speed_min),
            ("descent_margin", self.descent_margin),
            ("wheel_stall_speed", self.wheel_stall_speed),
            ("ball_stall_speed", self.ball_stall_speed),
            ("descent_kick", self.descent_kick),
            ("gravity", self.gravity),
            ("wheel_stop_speed", self.wheel_stop_speed),
        ] {
            ensure_positive(field, value)?;
        }

        for (field, value) in [
            ("wheel_decay", self.wheel_decay),
            ("ball_decay", self.ball_decay),
            ("settled_wheel_decay", self.settled_wheel_decay),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::DecayOutOfRange { field, value });
            }
        }
        if self.wheel_decay >= self.ball_decay {
            return Err(ConfigError::DecayOrder {
                wheel: self.wheel_decay,
                ball: self.ball_decay,
            });
        }

        ensure_range("wheel_speed", self.wheel_speed_min, self.wheel_speed_max)?;
        ensure_range("ball_speed", self.ball_speed_min, self.ball_speed_max)?;
        if self.ball_speed_min < self.wheel_speed_max {
            return Err(ConfigError::BallSlowerThanWheel {
                ball: self.ball_speed_min,
                wheel: self.wheel_speed_max,
            });
        }

        ensure_below(
            ("pocket_inner_radius", self.pocket_inner_radius),
            ("pocket_outer_radius", self.pocket_outer_radius),
        )?;
        ensure_below(
            ("pocket_outer_radius", self.pocket_outer_radius),
            (
                "deflector_radius - deflector_band",
                self.deflector_radius - self.deflector_band,
            ),
        )?;
        ensure_below(
            (
                "deflector_radius + deflector_band",
                self.deflector_radius + self.deflector_band,
            ),
            ("track_radius", self.track_radius),
        )?;

        if !(self.deflector_tolerance > 0.0 && self.deflector_tolerance <= 0.5) {
            return Err(ConfigError::ToleranceOutOfRange {
                value: self.deflector_tolerance,
            });
        }

        for (field, value) in [
            ("deflector_restitution", self.deflector_restitution),
            ("inner_rim_restitution", self.inner_rim_restitution),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RestitutionOutOfRange { field, value });
            }
        }
        if !(self.deflector_jitter >= 0.0) {
            return Err(ConfigError::NonPositive {
                field: "deflector_jitter",
                value: self.deflector_jitter,
            });
        }

        let deflector_spacing = TAU / f64::from(self.deflector_count);
        Ok(WheelPhysics {
            frame: Duration::from_nanos(self.frame_nanos),
            track_radius: self.track_radius,
            deflector_radius: self.deflector_radius,
            deflector_band: self.deflector_band,
            deflector_count: self.deflector_count,
            deflector_spacing,
            deflector_tolerance: deflector_spacing * self.deflector_tolerance,
            deflector_frame: self.deflector_frame,
            pocket_outer_radius: self.pocket_outer_radius,
            pocket_inner_radius: self.pocket_inner_radius,
            wheel_decay: self.wheel_decay,
            ball_decay: self.ball_decay,
            settled_wheel_decay: self.settled_wheel_decay,
            wheel_speed_min: self.wheel_speed_min,
            wheel_speed_max: self.wheel_speed_max,
            ball_speed_min: self.ball_speed_min,
            ball_speed_max: self.ball_speed_max,
            descent_margin: self.descent_margin,
            wheel_stall_speed: self.wheel_stall_speed,
            ball_stall_speed: self.ball_stall_speed,
            descent_kick: self.descent_kick,
            gravity: self.gravity,
            deflector_restitution: self.deflector_restitution,
            inner_rim_restitution: self.inner_rim_restitution,
            deflector_jitter: self.deflector_jitter,
            wheel_stop_speed: self.wheel_stop_speed,
            settle_deadline_frames: self.settle_deadline_frames,
        })
    }
}

fn ensure_nonzero(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidNonZero { field, value });
    }
    Ok(())
}

fn ensure_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    // Written so NaN is rejected too.
    if !(value > 0.0) {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

fn ensure_range(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(min < max) || !max.is_finite() {
        return Err(ConfigError::EmptyRange { field, min, max });
    }
    Ok(())
}

fn ensure_below(
    (inner, inner_value): (&'static str, f64),
    (outer, outer_value): (&'static str, f64),
) -> Result<(), ConfigError> {
    if !(inner_value < outer_value) {
        return Err(ConfigError::RadiusOrder {
            inner,
            outer,
            inner_value,
            outer_value,
        });
    }
    Ok(())
}

fn default_frame_nanos() -> u64 {
    defaults::FRAME_NANOS
}

fn default_track_radius() -> f64 {
    defaults::DEFAULT_TRACK_RADIUS
}

fn default_deflector_radius() -> f64 {
    defaults::DEFAULT_DEFLECTOR_RADIUS
}

fn default_deflector_band() -> f64 {
    defaults::DEFAULT_DEFLECTOR_BAND
}

fn default_deflector_count() -> u32 {
    defaults::DEFAULT_DEFLECTOR_COUNT
}

fn default_deflector_tolerance() -> f64 {
    defaults::DEFAULT_DEFLECTOR_TOLERANCE
}

fn default_pocket_outer_radius() -> f64 {
    defaults::DEFAULT_POCKET_OUTER_RADIUS
}

fn default_pocket_inner_radius() -> f64 {
    defaults::DEFAULT_POCKET_INNER_RADIUS
}

fn default_wheel_decay() -> f64 {
    defaults::DEFAULT_WHEEL_DECAY
}

fn default_ball_decay() -> f64 {
    defaults::DEFAULT_BALL_DECAY
}

fn default_settled_wheel_decay() -> f64 {
    defaults::DEFAULT_SETTLED_WHEEL_DECAY
}

fn default_wheel_speed_min() -> f64 {
    defaults::DEFAULT_WHEEL_SPEED_MIN
}

fn default_wheel_speed_max() -> f64 {
    defaults::DEFAULT_WHEEL_SPEED_MAX
}

fn default_ball_speed_min() -> f64 {
    defaults::DEFAULT_BALL_SPEED_MIN
}

fn default_ball_speed_max() -> f64 {
    defaults::DEFAULT_BALL_SPEED_MAX
}

fn default_descent_margin() -> f64 {
    defaults::DEFAULT_DESCENT_MARGIN
}

fn default_wheel_stall_speed() -> f64 {
    defaults::DEFAULT_WHEEL_STALL_SPEED
}

fn default_ball_stall_speed() -> f64 {
    defaults::DEFAULT_BALL_STALL_SPEED
}

fn default_descent_kick() -> f64 {
    defaults::DEFAULT_DESCENT_KICK
}

fn default_gravity() -> f64 {
    defaults::DEFAULT_GRAVITY
}

fn default_deflector_restitution() -> f64 {
    defaults::DEFAULT_DEFLECTOR_RESTITUTION
}

fn default_inner_rim_restitution() -> f64 {
    defaults::DEFAULT_INNER_RIM_RESTITUTION
}

fn default_deflector_jitter() -> f64 {
    defaults::DEFAULT_DEFLECTOR_JITTER
}

fn default_wheel_stop_speed() -> f64 {
    defaults::DEFAULT_WHEEL_STOP_SPEED
}

fn default_settle_deadline_frames() -> u64 {
    defaults::DEFAULT_SETTLE_DEADLINE_FRAMES
}
