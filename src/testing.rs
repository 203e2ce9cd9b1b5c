//! Host-side fakes standing in for board hardware in unit tests.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::PwmPin;
use fugit::HertzU32;

use crate::buzzer::Buzzer;
use crate::color::Rgb;
use crate::leds::PixelStrip;
use crate::servo::Servo;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Output {
  Tone(u32),
  Silence,
}

#[derive(Default)]
pub struct RecordingBuzzer {
  pub log: Vec<Output>,
}

impl Buzzer for RecordingBuzzer {
  fn tone(&mut self, frequency: HertzU32) {
    self.log.push(Output::Tone(frequency.raw()));
  }

  fn silence(&mut self) {
    self.log.push(Output::Silence);
  }
}

impl RecordingBuzzer {
  pub fn tones(&self) -> usize {
    self.log.iter().filter(|o| matches!(o, Output::Tone(_))).count()
  }
}

#[derive(Default)]
pub struct FakeDelay {
  pub total_ms: u32,
  pub calls: Vec<u32>,
}

impl DelayMs<u32> for FakeDelay {
  fn delay_ms(&mut self, ms: u32) {
    self.total_ms += ms;
    self.calls.push(ms);
  }
}

/// Strip that records every color written, optionally failing after a
/// number of writes. A transient strip fails once and then recovers.
#[derive(Default)]
pub struct FakeStrip {
  pub shown: Vec<Rgb>,
  pub fail_after: Option<usize>,
  pub transient: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripFault;

impl PixelStrip for FakeStrip {
  type Error = StripFault;

  fn fill(&mut self, color: Rgb) -> Result<(), StripFault> {
    if let Some(limit) = self.fail_after {
      if self.shown.len() >= limit {
        if self.transient {
          self.fail_after = None;
        }
        return Err(StripFault);
      }
    }
    self.shown.push(color);
    Ok(())
  }
}

/// Servo that remembers every angle written to it
#[derive(Default)]
pub struct FakeServo {
  pub angles: Vec<u8>,
  pub detached: bool,
}

impl FakeServo {
  pub fn last(&self) -> Option<u8> {
    self.angles.last().copied()
  }
}

impl Servo for FakeServo {
  fn write_angle(&mut self, degrees: u8) {
    self.detached = false;
    self.angles.push(degrees);
  }

  fn detach(&mut self) {
    self.detached = true;
  }
}

/// PWM channel with a fixed counter top
pub struct FakePwm {
  pub top: u16,
  pub duty: u16,
  pub enabled: bool,
}

impl FakePwm {
  pub fn new(top: u16) -> Self {
    Self { top, duty: 0, enabled: false }
  }
}

impl PwmPin for FakePwm {
  type Duty = u16;

  fn disable(&mut self) {
    self.enabled = false;
  }

  fn enable(&mut self) {
    self.enabled = true;
  }

  fn get_duty(&self) -> u16 {
    self.duty
  }

  fn get_max_duty(&self) -> u16 {
    self.top
  }

  fn set_duty(&mut self, duty: u16) {
    self.duty = duty;
  }
}
