//! RTTTL (Ring Tone Text Transfer Language) parsing.
//!
//! A melody is written as `Name:d=<duration>,o=<octave>,b=<bpm>:<notes>`,
//! where each comma separated note is `[duration]<letter>[#][.][octave][.]`.
//! Durations are divisors of a whole note (4 is a quarter note), the letter
//! is one of `p c d e f g a b` with `p` meaning a rest.
//!
//! Parsing never fails. Missing header keys keep their defaults, and a note
//! token that does not start with a known letter is dropped.

use fugit::{HertzU32, MillisDurationU32};

use crate::buzzer::Tone;

pub const DEFAULT_DURATION: u32 = 4;
pub const DEFAULT_OCTAVE: u8 = 6;
pub const DEFAULT_BPM: u32 = 63;

/// Octave of the base frequency table
pub const REFERENCE_OCTAVE: u8 = 4;

/// Whole note length at one beat per minute: four beats of 60s
const WHOLE_NOTE_MS_AT_1_BPM: u32 = 60_000 * 4;

/// Octave 4 frequencies in Hz, c through b
const BASE_FREQ_HZ: [u32; 12] = [262, 277, 294, 311, 330, 349, 370, 392, 415, 440, 466, 494];

/// Percentage of a note's duration spent sounding
const SUSTAIN_PERCENT: u32 = 90;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Pitch {
  Rest = 0,
  C = 1,
  CSharp = 2,
  D = 3,
  DSharp = 4,
  E = 5,
  F = 6,
  FSharp = 7,
  G = 8,
  GSharp = 9,
  A = 10,
  ASharp = 11,
  B = 12,
}

impl Pitch {
  /// Semitone index (above c, 1-based) for a note letter. `p` is 0.
  fn semitone_of(letter: u8) -> Option<u8> {
    match letter {
      b'p' => Some(0),
      b'c' => Some(1),
      b'd' => Some(3),
      b'e' => Some(5),
      b'f' => Some(6),
      b'g' => Some(8),
      b'a' => Some(10),
      b'b' => Some(12),
      _ => None,
    }
  }

  /// Indices past b (a sharpened `b`) fall outside the table and are silent.
  fn from_semitone(semitone: u8) -> Self {
    match semitone {
      1 => Pitch::C,
      2 => Pitch::CSharp,
      3 => Pitch::D,
      4 => Pitch::DSharp,
      5 => Pitch::E,
      6 => Pitch::F,
      7 => Pitch::FSharp,
      8 => Pitch::G,
      9 => Pitch::GSharp,
      10 => Pitch::A,
      11 => Pitch::ASharp,
      12 => Pitch::B,
      _ => Pitch::Rest,
    }
  }

  /// Frequency of this pitch in the reference octave, 0 for a rest
  pub fn base_frequency(self) -> u32 {
    match self {
      Pitch::Rest => 0,
      pitch => BASE_FREQ_HZ[pitch as usize - 1],
    }
  }
}

/// Defaults section of a melody
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Header {
  pub default_duration: u32,
  pub default_octave: u8,
  pub bpm: u32,
}

impl Default for Header {
  fn default() -> Self {
    Self {
      default_duration: DEFAULT_DURATION,
      default_octave: DEFAULT_OCTAVE,
      bpm: DEFAULT_BPM,
    }
  }
}

impl Header {
  /// Parse a `d=..,o=..,b=..` section. Unknown bytes are skipped; zero
  /// values for `d` and `b` keep the defaults.
  pub fn parse(section: &str) -> Self {
    let bytes = section.as_bytes();
    let mut header = Header::default();
    let mut pos = 0;

    while pos < bytes.len() {
      if bytes.get(pos + 1) != Some(&b'=') {
        pos += 1;
        continue;
      }
      match bytes[pos] {
        b'd' => {
          let (value, next) = read_number(bytes, pos + 2);
          if value > 0 {
            header.default_duration = value;
          }
          pos = next;
        }
        b'o' => {
          pos += 2;
          if let Some(octave) = bytes.get(pos).copied().and_then(digit) {
            header.default_octave = octave;
            pos += 1;
          }
        }
        b'b' => {
          let (value, next) = read_number(bytes, pos + 2);
          if value > 0 {
            header.bpm = value;
          }
          pos = next;
        }
        _ => pos += 1,
      }
    }
    header
  }

  /// Length of a whole note at this tempo
  pub fn whole_note(&self) -> MillisDurationU32 {
    MillisDurationU32::from_ticks(WHOLE_NOTE_MS_AT_1_BPM / self.bpm.max(1))
  }

  /// Length of a note with the given divisor; dotting adds half again.
  pub fn note_duration(&self, divisor: u32, dotted: bool) -> MillisDurationU32 {
    let mut ms = self.whole_note().ticks() / divisor.max(1);
    if dotted {
      ms += ms / 2;
    }
    MillisDurationU32::from_ticks(ms)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Note {
  pub pitch: Pitch,
  pub octave: u8,
  pub divisor: u32,
  pub dotted: bool,
  pub duration: MillisDurationU32,
}

impl Note {
  pub fn is_rest(&self) -> bool {
    self.pitch == Pitch::Rest
  }

  /// Base frequency shifted by the octave's distance from the reference.
  /// Octaves too far out to shift into a `u32` are silent.
  pub fn frequency(&self) -> HertzU32 {
    let base = self.pitch.base_frequency();
    let hz = if self.octave >= REFERENCE_OCTAVE {
      base.checked_shl(u32::from(self.octave - REFERENCE_OCTAVE))
    } else {
      base.checked_shr(u32::from(REFERENCE_OCTAVE - self.octave))
    };
    HertzU32::from_raw(hz.unwrap_or(0))
  }

  /// Sound for 90% of the note, silence for the remainder.
  pub fn tone(&self) -> Tone {
    let total = self.duration.ticks();
    let on = total * SUSTAIN_PERCENT / 100;
    Tone {
      frequency: self.frequency(),
      on: MillisDurationU32::from_ticks(on),
      off: MillisDurationU32::from_ticks(total - on),
    }
  }
}

/// A parsed melody: name, header defaults and the unparsed note section.
///
/// Notes are tokenized lazily by [`Rtttl::notes`], so parsing the same
/// melody twice always yields the same sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rtttl<'a> {
  name: &'a str,
  header: Header,
  notes: &'a str,
}

impl<'a> Rtttl<'a> {
  pub fn parse(text: &'a str) -> Self {
    let mut sections = text.splitn(3, ':');
    let name = sections.next().unwrap_or("");
    let header = sections.next().map(Header::parse).unwrap_or_default();
    let notes = sections.next().unwrap_or("");
    Self { name, header, notes }
  }

  pub fn name(&self) -> &'a str {
    self.name
  }

  pub fn header(&self) -> Header {
    self.header
  }

  pub fn notes(&self) -> Notes<'a> {
    Notes {
      bytes: self.notes.as_bytes(),
      pos: 0,
      header: self.header,
    }
  }

  pub fn tones(&self) -> impl Iterator<Item = Tone> + 'a {
    self.notes().map(|note| note.tone())
  }

  /// Total playing time of every note
  pub fn duration(&self) -> MillisDurationU32 {
    self
      .notes()
      .fold(MillisDurationU32::from_ticks(0), |total, note| total + note.duration)
  }
}

/// One-pass tokenizer over the note section
#[derive(Clone, Debug)]
pub struct Notes<'a> {
  bytes: &'a [u8],
  pos: usize,
  header: Header,
}

impl<'a> Notes<'a> {
  fn peek(&self) -> Option<u8> {
    self.bytes.get(self.pos).copied()
  }

  fn eat(&mut self, byte: u8) -> bool {
    if self.peek() == Some(byte) {
      self.pos += 1;
      true
    } else {
      false
    }
  }

  fn skip_separators(&mut self) {
    while matches!(self.peek(), Some(b',') | Some(b' ')) {
      self.pos += 1;
    }
  }

  /// Drop whatever is left of the current token.
  fn skip_token(&mut self) {
    while !matches!(self.peek(), None | Some(b',') | Some(b' ')) {
      self.pos += 1;
    }
  }
}

impl<'a> Iterator for Notes<'a> {
  type Item = Note;

  fn next(&mut self) -> Option<Note> {
    loop {
      self.skip_separators();
      self.peek()?;

      let (divisor, next) = read_number(self.bytes, self.pos);
      self.pos = next;
      // no digits reads as zero
      let divisor = if divisor == 0 { self.header.default_duration } else { divisor };

      let Some(mut semitone) = self.peek().and_then(Pitch::semitone_of) else {
        self.skip_token();
        continue;
      };
      self.pos += 1;

      if self.eat(b'#') {
        semitone += 1;
      }
      let mut dotted = self.eat(b'.');
      let octave = match self.peek().and_then(digit) {
        Some(octave) => {
          self.pos += 1;
          octave
        }
        None => self.header.default_octave,
      };
      dotted |= self.eat(b'.');
      self.skip_token();

      return Some(Note {
        pitch: Pitch::from_semitone(semitone),
        octave,
        divisor,
        dotted,
        duration: self.header.note_duration(divisor, dotted),
      });
    }
  }
}

fn digit(byte: u8) -> Option<u8> {
  byte.is_ascii_digit().then(|| byte - b'0')
}

/// Read a run of decimal digits starting at `pos`, returning the value and
/// the position just past the digits.
fn read_number(bytes: &[u8], mut pos: usize) -> (u32, usize) {
  let mut value: u32 = 0;
  while let Some(d) = bytes.get(pos).copied().and_then(digit) {
    value = value.saturating_mul(10).saturating_add(d as u32);
    pos += 1;
  }
  (value, pos)
}
