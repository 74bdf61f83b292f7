use crate::config::ArmingConfig;

/// Operating mode, decided afresh on every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Motors off, controllers held in reset
    #[default]
    Safe,
    /// Armed with throttle above idle
    Active,
}

/// `throttle_stick` is the polarity-corrected level, low end negative.
pub fn update_mode(mode: &mut Mode, armed: bool, throttle_stick: i16, arming: &ArmingConfig) {
    // Level triggered: a disarm or throttle chop takes effect on the same tick
    let next = if armed && throttle_stick as i32 > arming.idle_threshold() {
        Mode::Active
    } else {
        Mode::Safe
    };

    if next != *mode {
        debug!("mode change, active: {}", next == Mode::Active);
    }
    *mode = next;
}
