//! Build-time constants and runtime settings for SBot

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Arm servo positions, degrees
pub const ARM_LEFT_HOME: u8 = 0;
/// Past the end of travel; the arm controller clamps it to 180
pub const ARM_RIGHT_HOME: u8 = 190;
pub const ARM_LEFT_RAISED: u8 = 130;
pub const ARM_RIGHT_RAISED: u8 = 60;

/// Otto leg servos rest at the middle of their travel
pub const LEG_HOME: u8 = 90;

/// Pause after a servo position change
pub const SERVO_MOVE_DELAY_MS: u32 = 500;
/// Per-step time of a slow LED fade
pub const LED_FADE_STEP_DELAY_MS: u32 = 10;
/// Number of steps in a full 0..=255 fade, stepping by 5
pub const LED_FADE_STEPS: u32 = 52;
pub const MAIN_LOOP_DELAY_MS: u32 = 300;

/// LEDs on each arm strip
pub const NUM_PIXELS: usize = 7;

/// Runtime switches for the scripted behaviors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
  pub sound_effects: bool,
  pub brightness: u8,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      sound_effects: true,
      brightness: 255,
    }
  }
}

impl Settings {
  pub fn muted() -> Self {
    Self { sound_effects: false, ..Self::default() }
  }
}
