//! SBot's moods.
//!
//! Which mood may start when is decided by a small hierarchical state
//! machine; `StateManager` feeds it events and plays the scripted light,
//! arm and sound sequence for each mood while it is busy.

use core::fmt;

use embedded_hal::blocking::delay::DelayMs;
use statig::blocking::StateMachine;
use statig::prelude::*;

use crate::arms::ArmController;
use crate::buzzer::{play_rtttl, play_tune, Buzzer};
use crate::color::{
  Rgb, IDLE, MAGENTA, MOOD_ALERT, MOOD_CALM, MOOD_ERROR, MOOD_EXCITED, MOOD_HAPPY, ORANGE, RED,
  STARTUP_REST, YELLOW,
};
use crate::config::{Settings, LED_FADE_STEPS, LED_FADE_STEP_DELAY_MS};
use crate::leds::{LedController, PixelStrip};
use crate::melodies;
use crate::servo::Servo;
use crate::sounds::Sound;

const FADE_IN_MS: u32 = 500;
/// 0..=64 in steps of 2
const CHILL_FADE_STEPS: u32 = 33;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SBotState {
  Idle,
  Startup,
  Dope,
  Chill,
  Alert,
  Sleep,
  Error,
}

impl SBotState {
  pub fn name(self) -> &'static str {
    match self {
      SBotState::Idle => "IDLE",
      SBotState::Startup => "STARTUP",
      SBotState::Dope => "DOPE",
      SBotState::Chill => "CHILL",
      SBotState::Alert => "ALERT",
      SBotState::Sleep => "SLEEP",
      SBotState::Error => "ERROR",
    }
  }
}

impl fmt::Display for SBotState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mood {
  Startup,
  Dope,
  Chill,
  Alert,
  Sleep,
}

impl Mood {
  pub fn state(self) -> SBotState {
    match self {
      Mood::Startup => SBotState::Startup,
      Mood::Dope => SBotState::Dope,
      Mood::Chill => SBotState::Chill,
      Mood::Alert => SBotState::Alert,
      Mood::Sleep => SBotState::Sleep,
    }
  }

  /// The Otto sound announcing this mood, if any
  pub fn cue(self) -> Option<Sound> {
    match self {
      Mood::Startup => None,
      Mood::Dope => Some(Sound::SuperHappy),
      Mood::Chill => Some(Sound::Cuddly),
      Mood::Alert => Some(Sound::Surprise),
      Mood::Sleep => Some(Sound::Sleeping),
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoodError<E> {
  /// Writing to the LED strips failed; SBot is now in `Error`
  Leds(E),
  /// SBot was in this state and would not start the mood
  Refused(SBotState),
}

pub type MoodResult<E> = Result<(), MoodError<E>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
  pub state: SBotState,
  pub previous: SBotState,
  pub left_arm: u8,
  pub right_arm: u8,
  pub color: Rgb,
}

#[derive(Default)]
struct Behavior;

enum Event {
  Begin(Mood),
  Finished,
  Fault,
}

#[state_machine(initial = "State::idle()", state(derive(Debug, Clone, Copy, PartialEq, Eq)))]
impl Behavior {
  #[state]
  fn idle(event: &Event) -> Response<State> {
    match event {
      Event::Begin(mood) => Transition(busy_with(*mood)),
      Event::Finished => Handled,
      Event::Fault => Transition(State::error()),
    }
  }

  #[state(superstate = "busy")]
  fn startup() -> Response<State> {
    Super
  }

  #[state(superstate = "busy")]
  fn dope() -> Response<State> {
    Super
  }

  #[state(superstate = "busy")]
  fn chill() -> Response<State> {
    Super
  }

  #[state(superstate = "busy")]
  fn alert() -> Response<State> {
    Super
  }

  /// A sequence is playing; new moods wait until it finishes.
  #[superstate]
  fn busy(event: &Event) -> Response<State> {
    match event {
      Event::Begin(_) => Handled,
      Event::Finished => Transition(State::idle()),
      Event::Fault => Transition(State::error()),
    }
  }

  #[state]
  fn sleep(event: &Event) -> Response<State> {
    match event {
      Event::Begin(Mood::Sleep) => Handled,
      Event::Begin(mood) => Transition(busy_with(*mood)),
      Event::Finished => Transition(State::idle()),
      Event::Fault => Transition(State::error()),
    }
  }

  #[state]
  fn error(event: &Event) -> Response<State> {
    match event {
      Event::Finished => Transition(State::idle()),
      _ => Handled,
    }
  }
}

fn busy_with(mood: Mood) -> State {
  match mood {
    Mood::Startup => State::startup(),
    Mood::Dope => State::dope(),
    Mood::Chill => State::chill(),
    Mood::Alert => State::alert(),
    Mood::Sleep => State::sleep(),
  }
}

fn sbot_state(state: &State) -> SBotState {
  match state {
    State::Idle {} => SBotState::Idle,
    State::Startup {} => SBotState::Startup,
    State::Dope {} => SBotState::Dope,
    State::Chill {} => SBotState::Chill,
    State::Alert {} => SBotState::Alert,
    State::Sleep {} => SBotState::Sleep,
    State::Error {} => SBotState::Error,
  }
}

/// Runs SBot's mood sequences on its LEDs, arms and buzzer
pub struct StateManager<L, A, B> {
  leds: LedController<L>,
  arms: ArmController<A>,
  buzzer: B,
  settings: Settings,
  machine: StateMachine<Behavior>,
  current: SBotState,
  previous: SBotState,
}

impl<L, A, B> StateManager<L, A, B>
where
  L: PixelStrip,
  A: Servo,
  B: Buzzer,
{
  pub fn new(
    leds: LedController<L>,
    arms: ArmController<A>,
    buzzer: B,
    settings: Settings,
  ) -> Self {
    Self {
      leds,
      arms,
      buzzer,
      settings,
      machine: Behavior::default().state_machine(),
      current: SBotState::Idle,
      previous: SBotState::Idle,
    }
  }

  pub fn current_state(&self) -> SBotState {
    self.current
  }

  pub fn previous_state(&self) -> SBotState {
    self.previous
  }

  pub fn settings(&self) -> Settings {
    self.settings
  }

  pub fn leds_mut(&mut self) -> &mut LedController<L> {
    &mut self.leds
  }

  pub fn arms_mut(&mut self) -> &mut ArmController<A> {
    &mut self.arms
  }

  pub fn status(&self) -> Status {
    Status {
      state: self.current,
      previous: self.previous,
      left_arm: self.arms.left_angle(),
      right_arm: self.arms.right_angle(),
      color: self.leds.current_color(),
    }
  }

  pub fn run_startup<D: DelayMs<u32>>(&mut self, delay: &mut D) -> MoodResult<L::Error> {
    self.perform(Mood::Startup, false, delay)
  }

  pub fn run_dope<D: DelayMs<u32>>(&mut self, delay: &mut D) -> MoodResult<L::Error> {
    self.perform(Mood::Dope, false, delay)
  }

  pub fn run_chill<D: DelayMs<u32>>(&mut self, delay: &mut D) -> MoodResult<L::Error> {
    self.perform(Mood::Chill, false, delay)
  }

  pub fn run_alert<D: DelayMs<u32>>(&mut self, delay: &mut D) -> MoodResult<L::Error> {
    self.perform(Mood::Alert, false, delay)
  }

  /// Dim down and release the arms. SBot stays asleep until the next mood.
  pub fn run_sleep<D: DelayMs<u32>>(&mut self, delay: &mut D) -> MoodResult<L::Error> {
    self.perform(Mood::Sleep, false, delay)
  }

  /// Play the mood's Otto cue, then its sequence.
  pub fn trigger<D>(&mut self, mood: Mood, delay: &mut D) -> MoodResult<L::Error>
  where
    D: DelayMs<u32>,
  {
    self.perform(mood, true, delay)
  }

  /// Fade to the idle glow and bring the arms home. Also clears `Error`.
  pub fn return_to_idle<D: DelayMs<u32>>(&mut self, delay: &mut D) -> MoodResult<L::Error> {
    if let Err(err) = self.crossfade(IDLE, 15, delay) {
      return Err(self.fault(err, delay));
    }
    self.arms.home(delay);
    self.dispatch(Event::Finished);
    Ok(())
  }

  fn perform<D>(&mut self, mood: Mood, with_cue: bool, delay: &mut D) -> MoodResult<L::Error>
  where
    D: DelayMs<u32>,
  {
    self.begin(mood)?;
    if with_cue {
      if let Some(sound) = mood.cue() {
        self.play_sound(sound, delay);
      }
    }

    info!("running {} sequence", mood.state().name());
    let played = match mood {
      Mood::Startup => self.startup_sequence(delay),
      Mood::Dope => self.dope_sequence(delay),
      Mood::Chill => self.chill_sequence(delay),
      Mood::Alert => self.alert_sequence(delay),
      Mood::Sleep => self.sleep_sequence(delay),
    };
    if let Err(err) = played {
      return Err(self.fault(err, delay));
    }
    info!("{} sequence complete", mood.state().name());

    match mood {
      Mood::Startup => {
        self.dispatch(Event::Finished);
        Ok(())
      }
      Mood::Sleep => Ok(()),
      _ => self.return_to_idle(delay),
    }
  }

  fn begin(&mut self, mood: Mood) -> MoodResult<L::Error> {
    let target = mood.state();
    let before = self.current;
    if before == target || self.dispatch(Event::Begin(mood)) != target {
      warn!("{} refused while {}", target.name(), before.name());
      return Err(MoodError::Refused(before));
    }
    Ok(())
  }

  fn dispatch(&mut self, event: Event) -> SBotState {
    self.machine.handle(&event);
    let next = sbot_state(self.machine.state());
    if next != self.current {
      self.previous = self.current;
      self.current = next;
      info!("state transition: {} -> {}", self.previous.name(), self.current.name());
    }
    self.current
  }

  fn fault<D: DelayMs<u32>>(&mut self, err: L::Error, delay: &mut D) -> MoodError<L::Error> {
    error!("LED strip failed during {}", self.current.name());
    self.dispatch(Event::Fault);
    if self.leds.set_color(MOOD_ERROR).is_err() {
      warn!("cannot show the error color");
    }
    self.play_melody(melodies::ERROR, delay);
    MoodError::Leds(err)
  }

  fn play_melody<D: DelayMs<u32>>(&mut self, melody: &str, delay: &mut D) {
    if self.settings.sound_effects {
      play_rtttl(&mut self.buzzer, delay, melody);
    }
  }

  fn play_sound<D: DelayMs<u32>>(&mut self, sound: Sound, delay: &mut D) {
    if self.settings.sound_effects {
      play_tune(&mut self.buzzer, delay, sound.tones());
    }
  }

  /// Cut to `to` and hold it as long as a full fade at `step_ms` would take.
  fn crossfade<D>(&mut self, to: Rgb, step_ms: u32, delay: &mut D) -> Result<(), L::Error>
  where
    D: DelayMs<u32>,
  {
    self.leds.hold(to, step_ms * LED_FADE_STEPS, delay)
  }

  /// Red, orange, yellow, then back to magenta
  fn color_run<D>(&mut self, yellow_ms: u32, delay: &mut D) -> Result<(), L::Error>
  where
    D: DelayMs<u32>,
  {
    self.crossfade(RED, 5, delay)?;
    self.crossfade(ORANGE, 10, delay)?;
    self.crossfade(YELLOW, 10, delay)?;
    self.leds.hold(MOOD_HAPPY, yellow_ms, delay)?;
    self.crossfade(MAGENTA, 10, delay)
  }

  fn startup_sequence<D: DelayMs<u32>>(&mut self, delay: &mut D) -> Result<(), L::Error> {
    self.leds.hold(MAGENTA, FADE_IN_MS, delay)?;

    self.arms.set_position(15, 165);
    delay.delay_ms(500);
    self.arms.raise(delay);
    delay.delay_ms(300);
    self.arms.lower(delay);

    self.color_run(200, delay)?;

    self.arms.nudge(30, -30);
    self.play_melody(melodies::DELLA, delay);
    self.arms.nudge(-22, 22);
    delay.delay_ms(500);
    self.arms.raise(delay);
    delay.delay_ms(300);

    self.crossfade(STARTUP_REST, 20, delay)?;
    self.arms.lower(delay);
    Ok(())
  }

  fn dope_sequence<D: DelayMs<u32>>(&mut self, delay: &mut D) -> Result<(), L::Error> {
    self.leds.hold(MOOD_EXCITED, FADE_IN_MS, delay)?;

    self.arms.raise(delay);
    delay.delay_ms(300);
    self.arms.lower(delay);

    self.color_run(100, delay)?;

    self.arms.nudge(30, -30);
    delay.delay_ms(300);
    self.play_melody(melodies::DELLA, delay);
    self.arms.nudge(-22, 22);
    delay.delay_ms(500);

    self.arms.raise(delay);
    delay.delay_ms(300);
    self.arms.lower(delay);
    Ok(())
  }

  fn chill_sequence<D: DelayMs<u32>>(&mut self, delay: &mut D) -> Result<(), L::Error> {
    self.arms.set_position(15, 175);
    delay.delay_ms(300);
    self.leds.hold(MOOD_CALM, CHILL_FADE_STEPS * LED_FADE_STEP_DELAY_MS, delay)?;
    delay.delay_ms(500);
    self.arms.home(delay);
    Ok(())
  }

  fn alert_sequence<D: DelayMs<u32>>(&mut self, delay: &mut D) -> Result<(), L::Error> {
    for _ in 0..3 {
      self.leds.hold(ORANGE, 200, delay)?;
      self.leds.off()?;
      delay.delay_ms(200);
    }
    self.arms.raise(delay);
    self.play_melody(melodies::ALERT, delay);
    self.leds.hold(MOOD_ALERT, 1000, delay)?;
    self.arms.lower(delay);
    Ok(())
  }

  fn sleep_sequence<D: DelayMs<u32>>(&mut self, delay: &mut D) -> Result<(), L::Error> {
    self.crossfade(MOOD_CALM, 15, delay)?;
    self.arms.home(delay);
    self.play_melody(melodies::SLEEP, delay);
    self.leds.off()?;
    self.arms.detach();
    Ok(())
  }
}
