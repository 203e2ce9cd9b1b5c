//! Hobby servos on 50Hz PWM

use embedded_hal::PwmPin;

/// Pulse width at 0 degrees
const MIN_PULSE_US: u32 = 500;
/// Pulse width at 180 degrees
const MAX_PULSE_US: u32 = 2500;
/// 50 Hz frame
const PERIOD_US: u32 = 20_000;

pub trait Servo {
  fn write_angle(&mut self, degrees: u8);

  /// Stop driving the servo so it no longer holds position.
  fn detach(&mut self);
}

impl<T: Servo + ?Sized> Servo for &mut T {
  fn write_angle(&mut self, degrees: u8) {
    (**self).write_angle(degrees)
  }

  fn detach(&mut self) {
    (**self).detach()
  }
}

/// Servo on a PWM channel whose counter wraps once per 20ms frame
pub struct PwmServo<P> {
  pwm: P,
  max_duty: u16,
}

impl<P: PwmPin<Duty = u16>> PwmServo<P> {
  pub fn new(mut pwm: P) -> Self {
    let max_duty = pwm.get_max_duty();
    pwm.set_duty(0);
    pwm.enable();
    Self { pwm, max_duty }
  }

  pub fn angle_to_duty(&self, degrees: u8) -> u16 {
    let angle = degrees.min(180) as u32;
    let pulse_us = MIN_PULSE_US + (angle * (MAX_PULSE_US - MIN_PULSE_US)) / 180;
    ((pulse_us * self.max_duty as u32) / PERIOD_US) as u16
  }

  pub fn release(self) -> P {
    self.pwm
  }
}

impl<P: PwmPin<Duty = u16>> Servo for PwmServo<P> {
  fn write_angle(&mut self, degrees: u8) {
    let duty = self.angle_to_duty(degrees);
    self.pwm.set_duty(duty);
  }

  fn detach(&mut self) {
    self.pwm.set_duty(0);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::FakePwm;

  #[test]
  fn pulse_widths_follow_angle() {
    // top of 20_000 makes one count per microsecond
    let mut servo = PwmServo::new(FakePwm::new(20_000));
    assert_eq!(servo.angle_to_duty(0), 500);
    assert_eq!(servo.angle_to_duty(90), 1500);
    assert_eq!(servo.angle_to_duty(180), 2500);

    servo.write_angle(45);
    assert_eq!(servo.release().get_duty(), 1000);
  }

  #[test]
  fn angles_past_travel_clamp() {
    let servo = PwmServo::new(FakePwm::new(20_000));
    assert_eq!(servo.angle_to_duty(190), servo.angle_to_duty(180));
  }

  #[test]
  fn new_enables_and_detach_drops_the_pulse() {
    let mut servo = PwmServo::new(FakePwm::new(62_499));
    servo.write_angle(90);
    servo.detach();
    let pwm = servo.release();
    assert!(pwm.enabled);
    assert_eq!(pwm.duty, 0);
  }
}
