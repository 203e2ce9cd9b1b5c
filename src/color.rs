//! RGB colors and the robot's palette

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

impl Rgb {
  pub const fn new(r: u8, g: u8, b: u8) -> Self {
    Self { r, g, b }
  }

  /// Scale every channel by `brightness` (255 leaves the color unchanged).
  pub fn scaled(self, brightness: u8) -> Self {
    let level = brightness as u16 + 1;
    let scale = |c: u8| ((c as u16 * level) >> 8) as u8;
    Self::new(scale(self.r), scale(self.g), scale(self.b))
  }
}

pub const BLACK: Rgb = Rgb::new(0, 0, 0);
pub const RED: Rgb = Rgb::new(255, 0, 0);

pub const MAGENTA: Rgb = Rgb::new(255, 0, 255);
/// 25% magenta
pub const MAGENTA_DIM: Rgb = Rgb::new(64, 0, 64);
pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
pub const ORANGE: Rgb = Rgb::new(255, 127, 0);

pub const MOOD_HAPPY: Rgb = YELLOW;
pub const MOOD_EXCITED: Rgb = MAGENTA;
pub const MOOD_CALM: Rgb = MAGENTA_DIM;
pub const MOOD_ALERT: Rgb = ORANGE;
pub const MOOD_ERROR: Rgb = RED;

/// Half magenta-blue shown at the end of startup
pub const STARTUP_REST: Rgb = Rgb::new(128, 0, 64);
/// Dim white shown while idle
pub const IDLE: Rgb = Rgb::new(50, 50, 50);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn full_brightness_is_identity() {
    assert_eq!(ORANGE.scaled(255), ORANGE);
    assert_eq!(Rgb::new(255, 255, 255).scaled(0), BLACK);
  }

  #[test]
  fn half_brightness_halves() {
    assert_eq!(ORANGE.scaled(127), Rgb::new(127, 63, 0));
  }
}
