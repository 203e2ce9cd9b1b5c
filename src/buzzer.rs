//! Blocking tone playback on a piezo buzzer

use embedded_hal::blocking::delay::DelayMs;
use fugit::{HertzU32, MillisDurationU32};

use crate::rtttl::Rtttl;

/// A sound at one frequency followed by a silent gap.
/// A zero frequency is a rest spanning both parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tone {
  pub frequency: HertzU32,
  pub on: MillisDurationU32,
  pub off: MillisDurationU32,
}

impl Tone {
  pub const fn new(frequency_hz: u32, on_ms: u32, off_ms: u32) -> Self {
    Self {
      frequency: HertzU32::from_raw(frequency_hz),
      on: MillisDurationU32::from_ticks(on_ms),
      off: MillisDurationU32::from_ticks(off_ms),
    }
  }

  pub const fn rest(ms: u32) -> Self {
    Self::new(0, 0, ms)
  }

  pub fn is_rest(&self) -> bool {
    self.frequency.raw() == 0
  }

  pub fn duration(&self) -> MillisDurationU32 {
    self.on + self.off
  }
}

/// Square wave output on a buzzer pin
pub trait Buzzer {
  fn tone(&mut self, frequency: HertzU32);
  fn silence(&mut self);
}

impl<T: Buzzer + ?Sized> Buzzer for &mut T {
  fn tone(&mut self, frequency: HertzU32) {
    (**self).tone(frequency)
  }

  fn silence(&mut self) {
    (**self).silence()
  }
}

/// Play one tone, blocking for its full duration.
pub fn play_tone<B, D>(buzzer: &mut B, delay: &mut D, tone: Tone) -> MillisDurationU32
where
  B: Buzzer,
  D: DelayMs<u32>,
{
  if tone.is_rest() {
    buzzer.silence();
    delay.delay_ms(tone.duration().ticks());
  } else {
    buzzer.tone(tone.frequency);
    delay.delay_ms(tone.on.ticks());
    buzzer.silence();
    if tone.off.ticks() > 0 {
      delay.delay_ms(tone.off.ticks());
    }
  }
  tone.duration()
}

/// Play a sequence of tones, returning the elapsed time.
pub fn play_tune<B, D, I>(buzzer: &mut B, delay: &mut D, tune: I) -> MillisDurationU32
where
  B: Buzzer,
  D: DelayMs<u32>,
  I: IntoIterator<Item = Tone>,
{
  tune
    .into_iter()
    .fold(MillisDurationU32::from_ticks(0), |elapsed, tone| {
      elapsed + play_tone(buzzer, delay, tone)
    })
}

pub fn play_rtttl<B, D>(buzzer: &mut B, delay: &mut D, melody: &str) -> MillisDurationU32
where
  B: Buzzer,
  D: DelayMs<u32>,
{
  let rtttl = Rtttl::parse(melody);
  debug!("play rtttl: {} @ {} bpm", rtttl.name(), rtttl.header().bpm);
  play_tune(buzzer, delay, rtttl.tones())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::melodies;
  use crate::testing::{FakeDelay, Output, RecordingBuzzer};

  #[test]
  fn tone_then_silence() {
    let mut buzzer = RecordingBuzzer::default();
    let mut delay = FakeDelay::default();
    let elapsed = play_tone(&mut buzzer, &mut delay, Tone::new(440, 450, 50));

    assert_eq!(elapsed.ticks(), 500);
    assert_eq!(delay.total_ms, 500);
    assert_eq!(buzzer.log, vec![Output::Tone(440), Output::Silence]);
    assert_eq!(delay.calls, vec![450, 50]);
  }

  #[test]
  fn rest_waits_full_duration() {
    let mut buzzer = RecordingBuzzer::default();
    let mut delay = FakeDelay::default();
    let elapsed = play_tone(&mut buzzer, &mut delay, Tone::new(0, 900, 100));

    assert_eq!(elapsed.ticks(), 1000);
    assert_eq!(delay.calls, vec![1000]);
    assert_eq!(buzzer.log, vec![Output::Silence]);
  }

  #[test]
  fn gapless_tone_skips_the_second_wait() {
    let mut buzzer = RecordingBuzzer::default();
    let mut delay = FakeDelay::default();
    play_tone(&mut buzzer, &mut delay, Tone::new(2349, 300, 0));
    assert_eq!(delay.calls, vec![300]);
  }

  #[test]
  fn rtttl_elapsed_matches_parsed_duration() {
    for melody in melodies::ALL {
      let mut buzzer = RecordingBuzzer::default();
      let mut delay = FakeDelay::default();
      let elapsed = play_rtttl(&mut buzzer, &mut delay, melody);
      assert_eq!(elapsed, Rtttl::parse(melody).duration());
      assert_eq!(delay.total_ms, elapsed.ticks());
    }
  }

  #[test]
  fn error_melody_alternates_tone_and_rest() {
    let mut buzzer = RecordingBuzzer::default();
    let mut delay = FakeDelay::default();
    play_rtttl(&mut buzzer, &mut delay, melodies::ERROR);

    // c4 eighths at 120 bpm: 250ms each, 225 sounding
    assert_eq!(
      buzzer.log,
      vec![
        Output::Tone(262),
        Output::Silence,
        Output::Silence,
        Output::Tone(262),
        Output::Silence,
        Output::Silence,
        Output::Tone(262),
        Output::Silence,
      ]
    );
    assert_eq!(delay.calls, vec![225, 25, 250, 225, 25, 250, 225, 25]);
  }

  #[test]
  fn playing_twice_gives_the_same_timeline() {
    let mut first = (RecordingBuzzer::default(), FakeDelay::default());
    let mut second = (RecordingBuzzer::default(), FakeDelay::default());
    play_rtttl(&mut first.0, &mut first.1, melodies::DELLA);
    play_rtttl(&mut second.0, &mut second.1, melodies::DELLA);
    assert_eq!(first.0.log, second.0.log);
    assert_eq!(first.1.calls, second.1.calls);
  }
}
