//! The two arm servos

use embedded_hal::blocking::delay::DelayMs;

use crate::config::{
  ARM_LEFT_HOME, ARM_LEFT_RAISED, ARM_RIGHT_HOME, ARM_RIGHT_RAISED, SERVO_MOVE_DELAY_MS,
};
use crate::servo::Servo;

const MAX_ANGLE: u8 = 180;

fn clamp_angle(angle: i16) -> u8 {
  angle.clamp(0, MAX_ANGLE as i16) as u8
}

pub struct ArmController<S> {
  left: S,
  right: S,
  left_angle: u8,
  right_angle: u8,
}

impl<S: Servo> ArmController<S> {
  pub fn new(left: S, right: S) -> Self {
    Self {
      left,
      right,
      left_angle: ARM_LEFT_HOME.min(MAX_ANGLE),
      right_angle: ARM_RIGHT_HOME.min(MAX_ANGLE),
    }
  }

  pub fn begin<D: DelayMs<u32>>(&mut self, delay: &mut D) {
    self.home(delay);
    debug!("arm controller initialized");
  }

  pub fn home<D: DelayMs<u32>>(&mut self, delay: &mut D) {
    self.set_position(ARM_LEFT_HOME, ARM_RIGHT_HOME);
    delay.delay_ms(SERVO_MOVE_DELAY_MS);
  }

  pub fn raise<D: DelayMs<u32>>(&mut self, delay: &mut D) {
    self.set_position(ARM_LEFT_RAISED, ARM_RIGHT_RAISED);
    delay.delay_ms(SERVO_MOVE_DELAY_MS);
  }

  pub fn lower<D: DelayMs<u32>>(&mut self, delay: &mut D) {
    self.home(delay);
  }

  pub fn set_left(&mut self, angle: u8) {
    self.left_angle = angle.min(MAX_ANGLE);
    self.left.write_angle(self.left_angle);
  }

  pub fn set_right(&mut self, angle: u8) {
    self.right_angle = angle.min(MAX_ANGLE);
    self.right.write_angle(self.right_angle);
  }

  pub fn set_position(&mut self, left: u8, right: u8) {
    self.set_left(left);
    self.set_right(right);
  }

  /// Move both arms relative to where they are, stopping at the ends of travel.
  pub fn nudge(&mut self, left_delta: i16, right_delta: i16) {
    let left = clamp_angle(self.left_angle as i16 + left_delta);
    let right = clamp_angle(self.right_angle as i16 + right_delta);
    self.set_position(left, right);
  }

  /// Walk both arms to the target one degree (of the longer move) per step.
  pub fn smooth_move<D: DelayMs<u32>>(&mut self, left: u8, right: u8, step_ms: u32, delay: &mut D) {
    let left = left.min(MAX_ANGLE);
    let right = right.min(MAX_ANGLE);
    let left_diff = left as i16 - self.left_angle as i16;
    let right_diff = right as i16 - self.right_angle as i16;
    let steps = left_diff.abs().max(right_diff.abs());
    if steps == 0 {
      return;
    }

    let left_step = left_diff as f32 / steps as f32;
    let right_step = right_diff as f32 / steps as f32;
    let mut current_left = self.left_angle as f32;
    let mut current_right = self.right_angle as f32;
    for _ in 0..steps {
      current_left += left_step;
      current_right += right_step;
      self.set_position(current_left as u8, current_right as u8);
      delay.delay_ms(step_ms);
    }
    self.set_position(left, right);
  }

  pub fn wave<D: DelayMs<u32>>(&mut self, waves: u8, delay: &mut D) {
    self.smooth_move(self.left_angle, 90, 10, delay);
    delay.delay_ms(200);
    for _ in 0..waves {
      self.set_right(60);
      delay.delay_ms(200);
      self.set_right(120);
      delay.delay_ms(200);
    }
    self.smooth_move(ARM_LEFT_HOME, ARM_RIGHT_HOME, 10, delay);
  }

  pub fn celebrate<D: DelayMs<u32>>(&mut self, delay: &mut D) {
    self.smooth_move(ARM_LEFT_RAISED, ARM_RIGHT_RAISED, 8, delay);
    delay.delay_ms(200);
    for _ in 0..3 {
      self.set_position(ARM_LEFT_RAISED - 20, ARM_RIGHT_RAISED + 20);
      delay.delay_ms(150);
      self.set_position(ARM_LEFT_RAISED + 20, ARM_RIGHT_RAISED - 20);
      delay.delay_ms(150);
    }
    self.set_position(ARM_LEFT_RAISED, ARM_RIGHT_RAISED);
    delay.delay_ms(SERVO_MOVE_DELAY_MS);
    self.smooth_move(ARM_LEFT_HOME, ARM_RIGHT_HOME, 10, delay);
  }

  pub fn detach(&mut self) {
    self.left.detach();
    self.right.detach();
  }

  pub fn left_angle(&self) -> u8 {
    self.left_angle
  }

  pub fn right_angle(&self) -> u8 {
    self.right_angle
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{FakeDelay, FakeServo};

  fn arms() -> ArmController<FakeServo> {
    ArmController::new(FakeServo::default(), FakeServo::default())
  }

  #[test]
  fn home_clamps_right_arm_and_settles() {
    let mut arms = arms();
    let mut delay = FakeDelay::default();
    arms.begin(&mut delay);
    assert_eq!((arms.left_angle(), arms.right_angle()), (0, 180));
    assert_eq!(arms.right.last(), Some(180));
    assert_eq!(delay.calls, vec![500]);
  }

  #[test]
  fn raise_then_lower() {
    let mut arms = arms();
    let mut delay = FakeDelay::default();
    arms.raise(&mut delay);
    assert_eq!((arms.left_angle(), arms.right_angle()), (130, 60));
    arms.lower(&mut delay);
    assert_eq!((arms.left_angle(), arms.right_angle()), (0, 180));
    assert_eq!(delay.total_ms, 1000);
  }

  #[test]
  fn nudge_saturates_at_travel_ends() {
    let mut arms = arms();
    arms.set_position(10, 170);
    arms.nudge(-22, 22);
    assert_eq!((arms.left_angle(), arms.right_angle()), (0, 180));
    arms.nudge(30, -30);
    assert_eq!((arms.left_angle(), arms.right_angle()), (30, 150));
  }

  #[test]
  fn set_clamps_past_180() {
    let mut arms = arms();
    arms.set_left(250);
    assert_eq!(arms.left_angle(), 180);
    assert_eq!(arms.left.last(), Some(180));
  }

  #[test]
  fn smooth_move_steps_one_degree_at_a_time() {
    let mut arms = arms();
    arms.set_position(0, 180);
    let mut delay = FakeDelay::default();
    arms.smooth_move(30, 150, 5, &mut delay);

    assert_eq!(delay.calls.len(), 30);
    assert_eq!(delay.total_ms, 150);
    assert_eq!(arms.left.angles[1..4], [1, 2, 3]);
    assert_eq!(arms.right.angles[1..4], [179, 178, 177]);
    assert_eq!((arms.left_angle(), arms.right_angle()), (30, 150));
  }

  #[test]
  fn smooth_move_to_current_position_does_nothing() {
    let mut arms = arms();
    arms.set_position(40, 40);
    let mut delay = FakeDelay::default();
    arms.smooth_move(40, 40, 10, &mut delay);
    assert!(delay.calls.is_empty());
    assert_eq!(arms.left.angles, vec![40]);
  }

  #[test]
  fn wave_ends_at_home() {
    let mut arms = arms();
    arms.set_position(0, 180);
    let mut delay = FakeDelay::default();
    arms.wave(2, &mut delay);
    assert!(arms.right.angles.contains(&60));
    assert!(arms.right.angles.contains(&120));
    assert_eq!((arms.left_angle(), arms.right_angle()), (0, 180));
  }

  #[test]
  fn celebrate_wiggles_around_raised() {
    let mut arms = arms();
    arms.set_position(0, 180);
    let mut delay = FakeDelay::default();
    arms.celebrate(&mut delay);
    assert_eq!(arms.left.angles.iter().filter(|&&a| a == 150).count(), 3);
    assert_eq!(arms.right.angles.iter().filter(|&&a| a == 40).count(), 3);
    assert_eq!((arms.left_angle(), arms.right_angle()), (0, 180));
  }

  #[test]
  fn detach_releases_both() {
    let mut arms = arms();
    arms.detach();
    assert!(arms.left.detached && arms.right.detached);
  }
}
