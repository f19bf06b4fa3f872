//! Proximity and self-destruct fuze.
//!
//! A fuze moves through three states:
//!
//! ```text
//! Armed ──(gate fires)──▶ Detonating ──(disposal sweep)──▶ Disposed
//! ```
//!
//! While armed, [`Fuze::evaluate`] checks the enabled self-destruct gates
//! every tick in a fixed priority order. The first gate that holds wins:
//!
//! 1. **target destroyed**: a target tracked on the previous tick is gone
//! 2. **no fuel**: the tank is empty
//! 3. **proximity miss**: having closed inside `miss_distance`, the body is
//!    now beyond it again
//!
//! Independently, coming within `min_distance` of the target while farther
//! than `safe_distance` from the launcher arms a *shaped* (forward cone)
//! detonation. Shaped mode is sticky once armed.

use serde::{Deserialize, Serialize};

use crate::config::FuzeConfig;
use crate::error::Result;

/// Terminal band upper bound as a multiple of `min_distance`.
const TERMINAL_BAND_FACTOR: f32 = 1.5;

/// Lifecycle state of a fuze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FuzeState {
    /// Evaluating gates.
    #[default]
    Armed,
    /// A gate fired; the entity is flagged for disposal.
    Detonating,
    /// The disposal sweep has finalized the entity.
    Disposed,
}

/// Which gate triggered a detonation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetonationCause {
    /// The tracked target disappeared.
    TargetDestroyed,
    /// The tank ran dry.
    NoFuel,
    /// The body passed its target and is opening range.
    ProximityMiss,
}

/// Per-tick inputs to [`Fuze::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzeReading {
    /// Distance to the live target, `None` if absent or disposed.
    pub target_distance: Option<f32>,
    /// Distance to the launcher, `None` if absent or disposed.
    pub owner_distance: Option<f32>,
    /// Remaining fuel.
    pub fuel: f32,
}

/// Proximity fuze state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fuze {
    config: FuzeConfig,
    state: FuzeState,
    cause: Option<DetonationCause>,
    tracking: bool,
    engaged: bool,
    last_distance: Option<f32>,
    shaped: bool,
}

impl Fuze {
    /// Creates an armed fuze.
    ///
    /// # Errors
    ///
    /// Propagates [`FuzeConfig::validate`].
    pub fn new(config: FuzeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: FuzeState::Armed,
            cause: None,
            tracking: false,
            engaged: false,
            last_distance: None,
            shaped: false,
        })
    }

    /// Fuze tuning.
    #[must_use]
    pub const fn config(&self) -> &FuzeConfig {
        &self.config
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> FuzeState {
        self.state
    }

    /// Gate that fired, once detonating.
    #[must_use]
    pub const fn cause(&self) -> Option<DetonationCause> {
        self.cause
    }

    /// Whether a shaped detonation has been armed.
    #[must_use]
    pub const fn is_shaped(&self) -> bool {
        self.shaped
    }

    /// Whether the body has closed inside the miss radius.
    #[must_use]
    pub const fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Exclusive distance band `(min, 1.5 * min)` in which guidance turns
    /// straight at the target.
    #[must_use]
    pub fn terminal_band(&self) -> (f32, f32) {
        let min = self.config.min_distance;
        (min, min * TERMINAL_BAND_FACTOR)
    }

    /// Whether `distance` lies in the [`terminal_band`](Self::terminal_band).
    #[must_use]
    pub fn in_terminal_band(&self, distance: f32) -> bool {
        let (low, high) = self.terminal_band();
        distance > low && distance < high
    }

    /// Evaluates the gates for this tick.
    ///
    /// Returns the cause if this call moved the fuze from `Armed` to
    /// `Detonating`. Once detonating or disposed the fuze ignores readings.
    pub fn evaluate(&mut self, reading: FuzeReading) -> Option<DetonationCause> {
        if self.state != FuzeState::Armed {
            return None;
        }

        if let Some(distance) = reading.target_distance {
            let owner_clear = reading
                .owner_distance
                .map_or(true, |d| d > self.config.safe_distance);
            if distance <= self.config.min_distance && owner_clear {
                self.shaped = true;
            }
            let closing = self.last_distance.is_some_and(|last| distance < last);
            if closing && distance < self.config.miss_distance {
                self.engaged = true;
            }
        }

        let cause = self.check_gates(&reading);

        self.tracking = reading.target_distance.is_some();
        self.last_distance = reading.target_distance;

        if let Some(cause) = cause {
            self.state = FuzeState::Detonating;
            self.cause = Some(cause);
        }
        cause
    }

    fn check_gates(&self, reading: &FuzeReading) -> Option<DetonationCause> {
        if self.config.on_target_destroyed && self.tracking && reading.target_distance.is_none() {
            return Some(DetonationCause::TargetDestroyed);
        }
        if self.config.on_no_fuel && reading.fuel <= 0.0 {
            return Some(DetonationCause::NoFuel);
        }
        if self.config.on_proximity_miss
            && self.engaged
            && reading
                .target_distance
                .is_some_and(|d| d > self.config.miss_distance)
        {
            return Some(DetonationCause::ProximityMiss);
        }
        None
    }

    /// Final transition, made by the disposal sweep.
    pub(crate) fn mark_disposed(&mut self) {
        self.state = FuzeState::Disposed;
    }
}
