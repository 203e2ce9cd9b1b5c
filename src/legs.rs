//! Otto's four leg servos: hips then feet, left before right

use embedded_hal::blocking::delay::DelayMs;

use crate::config::LEG_HOME;
use crate::servo::Servo;

const STEP_MS: u32 = 10;
const HOME_TIME_MS: u32 = 500;

pub struct Legs<S> {
  servos: [S; 4],
  trims: [i8; 4],
  positions: [f32; 4],
}

impl<S: Servo> Legs<S> {
  pub fn new(servos: [S; 4], trims: [i8; 4]) -> Self {
    Self { servos, trims, positions: [LEG_HOME as f32; 4] }
  }

  fn write(&mut self, index: usize) {
    let angle = (self.positions[index] + self.trims[index] as f32).clamp(0.0, 180.0);
    self.servos[index].write_angle(angle as u8);
  }

  /// Interpolate every leg to `target` over `time_ms`, one write per 10ms.
  pub fn move_to<D: DelayMs<u32>>(&mut self, target: [u8; 4], time_ms: u32, delay: &mut D) {
    if time_ms > STEP_MS {
      let steps = time_ms / STEP_MS;
      let mut increments = [0.0f32; 4];
      for (i, inc) in increments.iter_mut().enumerate() {
        *inc = (target[i] as f32 - self.positions[i]) / steps as f32;
      }
      for _ in 0..steps {
        for i in 0..4 {
          self.positions[i] += increments[i];
          self.write(i);
        }
        delay.delay_ms(STEP_MS);
      }
    }
    for i in 0..4 {
      self.positions[i] = target[i] as f32;
      self.write(i);
    }
  }

  pub fn home<D: DelayMs<u32>>(&mut self, delay: &mut D) {
    self.move_to([LEG_HOME; 4], HOME_TIME_MS, delay);
  }

  pub fn detach(&mut self) {
    for servo in self.servos.iter_mut() {
      servo.detach();
    }
  }

  pub fn positions(&self) -> [u8; 4] {
    self.positions.map(|p| p as u8)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{FakeDelay, FakeServo};

  fn legs(trims: [i8; 4]) -> Legs<FakeServo> {
    Legs::new(Default::default(), trims)
  }

  #[test]
  fn home_takes_half_a_second_in_ten_ms_steps() {
    let mut legs = legs([0; 4]);
    let mut delay = FakeDelay::default();
    legs.move_to([60, 60, 60, 60], 0, &mut delay);
    legs.home(&mut delay);

    assert_eq!(delay.calls, vec![10; 50]);
    assert_eq!(legs.positions(), [90; 4]);
    assert_eq!(legs.servos[0].last(), Some(90));
  }

  #[test]
  fn short_moves_jump() {
    let mut legs = legs([0; 4]);
    let mut delay = FakeDelay::default();
    legs.move_to([0, 45, 135, 180], 10, &mut delay);
    assert!(delay.calls.is_empty());
    assert_eq!(legs.positions(), [0, 45, 135, 180]);
  }

  #[test]
  fn trims_offset_writes_but_not_positions() {
    let mut legs = legs([5, -5, 0, -10]);
    let mut delay = FakeDelay::default();
    legs.move_to([90, 90, 0, 0], 0, &mut delay);
    assert_eq!(legs.positions(), [90, 90, 0, 0]);
    let written: Vec<_> = legs.servos.iter().map(|s| s.last()).collect();
    assert_eq!(written, vec![Some(95), Some(85), Some(0), Some(0)]);
  }

  #[test]
  fn interpolation_is_monotonic() {
    let mut legs = legs([0; 4]);
    let mut delay = FakeDelay::default();
    legs.move_to([130, 90, 90, 90], 200, &mut delay);
    let hip = &legs.servos[0].angles;
    assert_eq!(hip.len(), 21);
    assert!(hip.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(hip.last(), Some(&130));
  }

  #[test]
  fn detach_releases_all_four() {
    let mut legs = legs([0; 4]);
    legs.detach();
    assert!(legs.servos.iter().all(|s| s.detached));
  }
}
