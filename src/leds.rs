//! NeoPixel strips on SBot's arms

use embedded_hal::blocking::delay::DelayMs;

use crate::color::{Rgb, BLACK};

/// A strip of addressable LEDs showing one solid color
pub trait PixelStrip {
  type Error;

  fn fill(&mut self, color: Rgb) -> Result<(), Self::Error>;
}

/// Two strips driven as one, left first
impl<A, B> PixelStrip for (A, B)
where
  A: PixelStrip,
  B: PixelStrip<Error = A::Error>,
{
  type Error = A::Error;

  fn fill(&mut self, color: Rgb) -> Result<(), Self::Error> {
    self.0.fill(color)?;
    self.1.fill(color)
  }
}

pub struct LedController<S> {
  strip: S,
  current: Rgb,
  brightness: u8,
}

impl<S: PixelStrip> LedController<S> {
  pub fn new(strip: S, brightness: u8) -> Self {
    Self { strip, current: BLACK, brightness }
  }

  pub fn begin(&mut self) -> Result<(), S::Error> {
    self.off()?;
    debug!("LED controller initialized");
    Ok(())
  }

  /// `current_color` only changes once the strip has taken the write.
  pub fn set_color(&mut self, color: Rgb) -> Result<(), S::Error> {
    self.strip.fill(color.scaled(self.brightness))?;
    self.current = color;
    Ok(())
  }

  pub fn off(&mut self) -> Result<(), S::Error> {
    self.set_color(BLACK)
  }

  /// Show `color` and keep it for `ms`.
  pub fn hold<D>(&mut self, color: Rgb, ms: u32, delay: &mut D) -> Result<(), S::Error>
  where
    D: DelayMs<u32>,
  {
    self.set_color(color)?;
    delay.delay_ms(ms);
    Ok(())
  }

  /// Rewrites the current color at the new level.
  pub fn set_brightness(&mut self, brightness: u8) -> Result<(), S::Error> {
    self.brightness = brightness;
    self.set_color(self.current)
  }

  pub fn current_color(&self) -> Rgb {
    self.current
  }

  pub fn brightness(&self) -> u8 {
    self.brightness
  }

  pub fn strip_mut(&mut self) -> &mut S {
    &mut self.strip
  }
}

#[cfg(feature = "rp2040")]
pub use self::smart::SmartStrip;

#[cfg(feature = "rp2040")]
mod smart {
  use smart_leds::{SmartLedsWrite, RGB8};

  use super::PixelStrip;
  use crate::color::Rgb;

  /// Any `smart-leds` writer with `N` pixels
  pub struct SmartStrip<W, const N: usize> {
    writer: W,
  }

  impl<W, const N: usize> SmartStrip<W, N> {
    pub fn new(writer: W) -> Self {
      Self { writer }
    }
  }

  impl<W, const N: usize> PixelStrip for SmartStrip<W, N>
  where
    W: SmartLedsWrite<Color = RGB8>,
  {
    type Error = W::Error;

    fn fill(&mut self, color: Rgb) -> Result<(), Self::Error> {
      let pixel = RGB8::new(color.r, color.g, color.b);
      self.writer.write(core::iter::repeat(pixel).take(N))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::color::{MAGENTA, ORANGE};
  use crate::testing::{FakeDelay, FakeStrip, StripFault};

  #[test]
  fn both_strips_get_the_color() {
    let mut leds = LedController::new((FakeStrip::default(), FakeStrip::default()), 255);
    leds.set_color(MAGENTA).unwrap();
    assert_eq!(leds.strip.0.shown, vec![MAGENTA]);
    assert_eq!(leds.strip.1.shown, vec![MAGENTA]);
    assert_eq!(leds.current_color(), MAGENTA);
  }

  #[test]
  fn brightness_scales_output_but_not_current_color() {
    let mut leds = LedController::new(FakeStrip::default(), 255);
    leds.set_color(ORANGE).unwrap();
    leds.set_brightness(127).unwrap();
    assert_eq!(leds.strip.shown, vec![ORANGE, Rgb::new(127, 63, 0)]);
    assert_eq!(leds.current_color(), ORANGE);
  }

  #[test]
  fn hold_waits_after_showing() {
    let mut leds = LedController::new(FakeStrip::default(), 255);
    let mut delay = FakeDelay::default();
    leds.hold(ORANGE, 200, &mut delay).unwrap();
    assert_eq!(leds.strip.shown, vec![ORANGE]);
    assert_eq!(delay.calls, vec![200]);
  }

  #[test]
  fn left_failure_skips_right_strip() {
    let left = FakeStrip { fail_after: Some(0), ..FakeStrip::default() };
    let mut leds = LedController::new((left, FakeStrip::default()), 255);
    assert_eq!(leds.off(), Err(StripFault));
    assert!(leds.strip.1.shown.is_empty());
  }

  #[test]
  fn failed_write_keeps_the_shown_color() {
    let mut leds = LedController::new(FakeStrip::default(), 255);
    leds.set_color(ORANGE).unwrap();
    leds.strip.fail_after = Some(1);

    assert_eq!(leds.set_color(MAGENTA), Err(StripFault));
    assert_eq!(leds.current_color(), ORANGE);

    // brightness rewrites what the strip last took
    leds.strip.fail_after = None;
    leds.set_brightness(127).unwrap();
    assert_eq!(leds.strip.shown, vec![ORANGE, Rgb::new(127, 63, 0)]);
  }

  #[test]
  fn failed_first_write_leaves_strip_dark() {
    let strip = FakeStrip { fail_after: Some(0), ..FakeStrip::default() };
    let mut leds = LedController::new(strip, 255);
    assert!(leds.set_color(MAGENTA).is_err());
    assert_eq!(leds.current_color(), BLACK);
    assert!(leds.strip.shown.is_empty());
  }
}
