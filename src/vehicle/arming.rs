use embassy_time::Instant;

use crate::config::ArmingConfig;

/// Hold-to-arm detector.
///
/// Low throttle with full left yaw arms, low throttle with full right yaw disarms. Either
/// gesture has to be held continuously for `hold`; letting go restarts the timer.
#[derive(Clone, Debug)]
pub struct ArmingStateMachine {
    config: ArmingConfig,
    armed: bool,
    hold_start: Instant,
    arm_held: bool,
    disarm_held: bool,
}

impl ArmingStateMachine {
    pub fn new(config: ArmingConfig) -> Self {
        ArmingStateMachine {
            config,
            armed: false,
            hold_start: Instant::from_ticks(0),
            arm_held: false,
            disarm_held: false,
        }
    }

    /// Disarm and clear any hold in progress.
    pub fn init(&mut self) {
        *self = ArmingStateMachine::new(self.config);
    }

    /// `throttle_stick` is the polarity-corrected level, low end negative.
    pub fn update(&mut self, throttle_stick: i16, yaw_stick: i16, now: Instant) -> bool {
        let yaw = yaw_stick as i32;
        let edge = self.config.yaw_edge as i32;
        let throttle_low = throttle_stick <= self.config.low_throttle;
        let arm_combo = throttle_low && yaw <= -edge;
        let disarm_combo = throttle_low && yaw >= edge;

        if self.hold(arm_combo, self.arm_held, now) && !self.armed {
            self.armed = true;
            info!("armed");
        }
        self.arm_held = arm_combo;

        if self.hold(disarm_combo, self.disarm_held, now) && self.armed {
            self.armed = false;
            info!("disarmed");
        }
        self.disarm_held = disarm_combo;

        self.armed
    }

    /// Latch the hold start on a rising edge and report whether the hold has completed.
    fn hold(&mut self, combo: bool, previously_held: bool, now: Instant) -> bool {
        if !combo {
            return false;
        }
        if !previously_held {
            self.hold_start = now;
        }
        match now.checked_duration_since(self.hold_start) {
            Some(held) => held >= self.config.hold,
            None => false,
        }
    }

    pub fn armed(&self) -> bool {
        self.armed
    }
}
