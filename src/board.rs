//! Raspberry Pi Pico wiring for SBot.
//!
//! | part            | pin          | peripheral  |
//! |-----------------|--------------|-------------|
//! | left/right leg  | GP2, GP3     | PWM1 A/B    |
//! | left/right foot | GP4, GP5     | PWM2 A/B    |
//! | left/right arm  | GP8, GP9     | PWM4 A/B    |
//! | arm NeoPixels   | GP10, GP11   | PIO0 sm0/1  |
//! | buzzer          | GP22         | PWM3 A      |

use embedded_hal::PwmPin;
use fugit::HertzU32;
use rp_pico::hal::pwm::{FreeRunning, Pwm3, Slice, SliceId, SliceMode, ValidSliceMode};

use crate::buzzer::Buzzer;

/// External high-speed crystal on the pico board is 12Mhz
pub const EXTERNAL_XTAL_FREQ_HZ: u32 = 12_000_000u32;

pub const AUDIO_PWM_DIVISOR: u8 = 64;

/// 125MHz / 40 / (62_499 + 1) = 50Hz servo frame
pub const SERVO_PWM_DIVISOR: u8 = 40;
pub const SERVO_PWM_TOP: u16 = 62_499;

/// Set up a PWM slice to drive two hobby servos.
pub fn configure_servo_slice<I, M>(slice: &mut Slice<I, M>)
where
  I: SliceId,
  M: SliceMode + ValidSliceMode<I>,
{
  slice.set_div_int(SERVO_PWM_DIVISOR);
  slice.set_div_frac(0u8);
  slice.set_top(SERVO_PWM_TOP);
  slice.channel_a.set_duty(0);
  slice.channel_b.set_duty(0);
  slice.enable();
}

/// Piezo buzzer on channel A of PWM3, square wave at 50% duty
pub struct PwmBuzzer {
  pwm: Slice<Pwm3, FreeRunning>,
  counts_per_second: u32,
}

impl PwmBuzzer {
  /// Channel A must already be routed to the buzzer pin.
  pub fn new(mut pwm: Slice<Pwm3, FreeRunning>, sys_freq: HertzU32) -> Self {
    pwm.set_ph_correct();
    pwm.set_div_int(AUDIO_PWM_DIVISOR); // To set integer part of clock divider
    pwm.set_div_frac(0u8); // To set fractional part of clock divider
    pwm.channel_a.set_duty(0); //initially off
    pwm.enable();

    // phase correct mode counts up then down, halving the output rate
    let counts_per_second = sys_freq.raw() / AUDIO_PWM_DIVISOR as u32 / 2;
    Self { pwm, counts_per_second }
  }

  /// Calculate the pwm counter top value for a given audio frequency
  fn note_count(&self, frequency: HertzU32) -> u16 {
    let count = self.counts_per_second / frequency.raw().max(1);
    count.min(u16::MAX as u32) as u16
  }
}

impl Buzzer for PwmBuzzer {
  fn tone(&mut self, frequency: HertzU32) {
    let top = self.note_count(frequency);
    self.pwm.channel_a.set_duty(top / 2); // 50% duty cycle
    self.pwm.set_top(top);
  }

  fn silence(&mut self) {
    self.pwm.channel_a.set_duty(0);
  }
}
