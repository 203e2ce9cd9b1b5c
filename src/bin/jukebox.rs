
#![no_std]
#![no_main]
use rp_pico::entry;
use defmt::*;
use defmt_rtt as _;
use panic_probe as _;

use rp_pico as bsp;
use embedded_hal::digital::v2::OutputPin;
use bsp::hal as p_hal;

use bsp::hal::{
  clocks::{init_clocks_and_plls, Clock},
  pac,
  sio::Sio,
  watchdog::Watchdog,
};

use sbot::board::{PwmBuzzer, EXTERNAL_XTAL_FREQ_HZ};
use sbot::buzzer::{play_rtttl, play_tune};
use sbot::melodies;
use sbot::rtttl::Rtttl;
use sbot::sounds::Sound;

const PAUSE_BETWEEN_MELODIES_MS: u32 = 2000;
const PAUSE_BETWEEN_SOUNDS_MS: u32 = 500;

/// Plays every stored melody and Otto sound on the buzzer, over and over
#[entry]
fn main() -> ! {

  info!("Program start");
  let mut pac = pac::Peripherals::take().unwrap();
  let core = pac::CorePeripherals::take().unwrap();
  let mut watchdog = Watchdog::new(pac.WATCHDOG);
  let sio = Sio::new(pac.SIO);

  let clocks = init_clocks_and_plls(
    EXTERNAL_XTAL_FREQ_HZ,
    pac.XOSC,
    pac.CLOCKS,
    pac.PLL_SYS,
    pac.PLL_USB,
    &mut pac.RESETS,
    &mut watchdog,
  )
    .ok()
    .unwrap();

  let mut delay = cortex_m::delay::Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());

  let pins = bsp::Pins::new(
    pac.IO_BANK0,
    pac.PADS_BANK0,
    sio.gpio_bank0,
    &mut pac.RESETS,
  );

  let mut led_pin = pins.led.into_push_pull_output();

  let pwm_slices = p_hal::pwm::Slices::new(pac.PWM, &mut pac.RESETS);
  let mut pwm3 = pwm_slices.pwm3;
  // Create PWM driver on GPIO22 / "GP22" pin
  pwm3.channel_a.output_to(pins.gpio22);
  let mut buzzer = PwmBuzzer::new(pwm3, clocks.system_clock.freq());

  println!("enter loop...");
  loop {
    for melody in melodies::ALL {
      let rtttl = Rtttl::parse(melody);
      println!(
        "play {}: {} notes, {} ms",
        rtttl.name(),
        rtttl.notes().count(),
        rtttl.duration().ticks()
      );
      let _ = led_pin.set_high();
      let elapsed = play_rtttl(&mut buzzer, &mut delay, melody);
      let _ = led_pin.set_low();
      debug!("played {} ms", elapsed.ticks());
      delay.delay_ms(PAUSE_BETWEEN_MELODIES_MS);
    }

    for sound in Sound::ALL {
      let elapsed = play_tune(&mut buzzer, &mut delay, sound.tones());
      println!("sound {}: {} ms", sound, elapsed.ticks());
      delay.delay_ms(PAUSE_BETWEEN_SOUNDS_MS);
    }
  }

}
