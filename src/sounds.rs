//! Otto's bank of short sound effects.
//!
//! Each sound is a small table of phrases. A bend sweeps the frequency
//! geometrically by `ratio` each step until it passes the target; a trill
//! repeats one fixed note once per geometric step of a counter.

use crate::buzzer::Tone;

const NOTE_B5: u32 = 988;
const NOTE_C6: u32 = 1047;
const NOTE_E5: u32 = 659;
const NOTE_E6: u32 = 1319;
const NOTE_G6: u32 = 1568;
const NOTE_A6: u32 = 1760;
const NOTE_D7: u32 = 2349;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phrase {
  Tone { hz: u32, on_ms: u32, off_ms: u32 },
  Bend { from_hz: f32, to_hz: f32, ratio: f32, on_ms: u32, off_ms: u32 },
  Trill { from: u32, to: u32, ratio: f32, hz: u32, on_ms: u32, off_ms: u32 },
  Pause(u32),
}

const fn tone(hz: u32, on_ms: u32, off_ms: u32) -> Phrase {
  Phrase::Tone { hz, on_ms, off_ms }
}

const fn bend(from_hz: f32, to_hz: f32, ratio: f32, on_ms: u32, off_ms: u32) -> Phrase {
  Phrase::Bend { from_hz, to_hz, ratio, on_ms, off_ms }
}

impl Phrase {
  pub fn tones(&self) -> PhraseTones {
    let cursor = match *self {
      Phrase::Bend { from_hz, .. } => from_hz,
      Phrase::Trill { from, .. } => from as f32,
      _ => 0.0,
    };
    PhraseTones { phrase: *self, cursor, finished: false }
  }
}

/// Tones of a single phrase, generated step by step
#[derive(Clone, Debug)]
pub struct PhraseTones {
  phrase: Phrase,
  cursor: f32,
  finished: bool,
}

impl Iterator for PhraseTones {
  type Item = Tone;

  fn next(&mut self) -> Option<Tone> {
    if self.finished {
      return None;
    }
    match self.phrase {
      Phrase::Tone { hz, on_ms, off_ms } => {
        self.finished = true;
        Some(Tone::new(hz, on_ms, off_ms))
      }
      Phrase::Pause(ms) => {
        self.finished = true;
        Some(Tone::rest(ms))
      }
      Phrase::Bend { from_hz, to_hz, ratio, on_ms, off_ms } => {
        let rising = from_hz < to_hz;
        let inside = if rising { self.cursor < to_hz } else { self.cursor > to_hz };
        if !inside || ratio <= 1.0 {
          self.finished = true;
          return None;
        }
        let hz = self.cursor as u32;
        self.cursor = if rising { self.cursor * ratio } else { self.cursor / ratio };
        Some(Tone::new(hz, on_ms, off_ms))
      }
      Phrase::Trill { to, ratio, hz, on_ms, off_ms, .. } => {
        let count = self.cursor as u32;
        if count >= to {
          self.finished = true;
          return None;
        }
        // integer counter, truncated after every step
        let next = (self.cursor * ratio) as u32;
        if next <= count {
          self.finished = true;
        }
        self.cursor = next as f32;
        Some(Tone::new(hz, on_ms, off_ms))
      }
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sound {
  Connection,
  Disconnection,
  ButtonPushed,
  Mode1,
  Mode2,
  Mode3,
  Surprise,
  OhOoh,
  OhOoh2,
  Cuddly,
  Sleeping,
  Happy,
  SuperHappy,
  HappyShort,
  Sad,
  Confused,
  Fart1,
  Fart2,
  Fart3,
}

const CONNECTION: [Phrase; 3] = [
  tone(NOTE_E5, 50, 30),
  tone(NOTE_E6, 55, 25),
  tone(NOTE_A6, 60, 10),
];
const DISCONNECTION: [Phrase; 3] = [
  tone(NOTE_E5, 50, 30),
  tone(NOTE_A6, 55, 25),
  tone(NOTE_E6, 50, 10),
];
const BUTTON_PUSHED: [Phrase; 3] = [
  bend(NOTE_E6 as f32, NOTE_G6 as f32, 1.03, 20, 2),
  Phrase::Pause(30),
  bend(NOTE_E6 as f32, NOTE_D7 as f32, 1.04, 10, 2),
];
const MODE1: [Phrase; 1] = [bend(NOTE_E6 as f32, NOTE_A6 as f32, 1.02, 30, 10)];
const MODE2: [Phrase; 1] = [bend(NOTE_G6 as f32, NOTE_D7 as f32, 1.03, 30, 10)];
const MODE3: [Phrase; 3] = [tone(NOTE_E6, 50, 100), tone(NOTE_G6, 50, 80), tone(NOTE_D7, 300, 0)];
const SURPRISE: [Phrase; 2] = [bend(800.0, 2150.0, 1.02, 10, 1), bend(2149.0, 800.0, 1.01, 7, 1)];
const OH_OOH: [Phrase; 3] = [
  bend(880.0, 2000.0, 1.04, 8, 3),
  Phrase::Pause(200),
  Phrase::Trill { from: 880, to: 2000, ratio: 1.04, hz: NOTE_B5, on_ms: 5, off_ms: 10 },
];
const OH_OOH2: [Phrase; 3] = [
  bend(1880.0, 3000.0, 1.03, 8, 3),
  Phrase::Pause(200),
  Phrase::Trill { from: 1880, to: 3000, ratio: 1.03, hz: NOTE_C6, on_ms: 10, off_ms: 10 },
];
const CUDDLY: [Phrase; 2] = [bend(700.0, 900.0, 1.03, 16, 4), bend(899.0, 650.0, 1.01, 18, 7)];
const SLEEPING: [Phrase; 3] = [
  bend(100.0, 500.0, 1.04, 10, 10),
  Phrase::Pause(500),
  bend(400.0, 100.0, 1.04, 10, 1),
];
const HAPPY: [Phrase; 2] = [bend(1500.0, 2500.0, 1.05, 20, 8), bend(2499.0, 1500.0, 1.05, 25, 8)];
const SUPER_HAPPY: [Phrase; 3] = [
  bend(2000.0, 6000.0, 1.05, 8, 3),
  Phrase::Pause(50),
  bend(5999.0, 2000.0, 1.05, 13, 2),
];
const HAPPY_SHORT: [Phrase; 3] = [
  bend(1500.0, 2000.0, 1.05, 15, 8),
  Phrase::Pause(100),
  bend(1900.0, 2500.0, 1.05, 10, 8),
];
const SAD: [Phrase; 1] = [bend(880.0, 669.0, 1.02, 20, 200)];
const CONFUSED: [Phrase; 3] = [
  bend(1000.0, 1700.0, 1.03, 8, 2),
  bend(1699.0, 500.0, 1.04, 8, 3),
  bend(1000.0, 1700.0, 1.05, 9, 10),
];
const FART1: [Phrase; 1] = [bend(1600.0, 3000.0, 1.02, 2, 15)];
const FART2: [Phrase; 1] = [bend(2000.0, 6000.0, 1.02, 2, 20)];
const FART3: [Phrase; 2] = [bend(1600.0, 4000.0, 1.02, 2, 20), bend(4000.0, 3000.0, 1.02, 2, 20)];

impl Sound {
  pub const ALL: [Sound; 19] = [
    Sound::Connection,
    Sound::Disconnection,
    Sound::ButtonPushed,
    Sound::Mode1,
    Sound::Mode2,
    Sound::Mode3,
    Sound::Surprise,
    Sound::OhOoh,
    Sound::OhOoh2,
    Sound::Cuddly,
    Sound::Sleeping,
    Sound::Happy,
    Sound::SuperHappy,
    Sound::HappyShort,
    Sound::Sad,
    Sound::Confused,
    Sound::Fart1,
    Sound::Fart2,
    Sound::Fart3,
  ];

  pub fn phrases(self) -> &'static [Phrase] {
    match self {
      Sound::Connection => &CONNECTION,
      Sound::Disconnection => &DISCONNECTION,
      Sound::ButtonPushed => &BUTTON_PUSHED,
      Sound::Mode1 => &MODE1,
      Sound::Mode2 => &MODE2,
      Sound::Mode3 => &MODE3,
      Sound::Surprise => &SURPRISE,
      Sound::OhOoh => &OH_OOH,
      Sound::OhOoh2 => &OH_OOH2,
      Sound::Cuddly => &CUDDLY,
      Sound::Sleeping => &SLEEPING,
      Sound::Happy => &HAPPY,
      Sound::SuperHappy => &SUPER_HAPPY,
      Sound::HappyShort => &HAPPY_SHORT,
      Sound::Sad => &SAD,
      Sound::Confused => &CONFUSED,
      Sound::Fart1 => &FART1,
      Sound::Fart2 => &FART2,
      Sound::Fart3 => &FART3,
    }
  }

  pub fn tones(self) -> impl Iterator<Item = Tone> {
    self.phrases().iter().flat_map(Phrase::tones)
  }
}
