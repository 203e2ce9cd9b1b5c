
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
  pio::PIOExt,
  sio::Sio,
  timer::Timer,
  watchdog::Watchdog,
};
use ws2812_pio::Ws2812;

use sbot::arms::ArmController;
use sbot::board::{self, PwmBuzzer, EXTERNAL_XTAL_FREQ_HZ};
use sbot::config::{self, Settings, MAIN_LOOP_DELAY_MS, NUM_PIXELS};
use sbot::leds::{LedController, SmartStrip};
use sbot::legs::Legs;
use sbot::mood::StateManager;
use sbot::servo::{PwmServo, Servo};

/// Log the full status every this many main loop ticks
const STATUS_EVERY_TICKS: u32 = 100;

#[entry]
fn main() -> ! {

  info!("SBot v{} start", config::VERSION);
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
  let timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

  let pins = bsp::Pins::new(
    pac.IO_BANK0,
    pac.PADS_BANK0,
    sio.gpio_bank0,
    &mut pac.RESETS,
  );

  let mut led_pin = pins.led.into_push_pull_output();
  led_pin.set_high().unwrap();

  println!("setup PWM...");
  let pwm_slices = p_hal::pwm::Slices::new(pac.PWM, &mut pac.RESETS);

  let mut pwm3 = pwm_slices.pwm3;
  pwm3.channel_a.output_to(pins.gpio22);
  let buzzer = PwmBuzzer::new(pwm3, clocks.system_clock.freq());

  let mut pwm1 = pwm_slices.pwm1;
  let mut pwm2 = pwm_slices.pwm2;
  let mut pwm4 = pwm_slices.pwm4;
  board::configure_servo_slice(&mut pwm1);
  board::configure_servo_slice(&mut pwm2);
  board::configure_servo_slice(&mut pwm4);
  pwm1.channel_a.output_to(pins.gpio2);
  pwm1.channel_b.output_to(pins.gpio3);
  pwm2.channel_a.output_to(pins.gpio4);
  pwm2.channel_b.output_to(pins.gpio5);
  pwm4.channel_a.output_to(pins.gpio8);
  pwm4.channel_b.output_to(pins.gpio9);

  let mut left_leg = PwmServo::new(pwm1.channel_a);
  let mut right_leg = PwmServo::new(pwm1.channel_b);
  let mut left_foot = PwmServo::new(pwm2.channel_a);
  let mut right_foot = PwmServo::new(pwm2.channel_b);
  let mut left_arm = PwmServo::new(pwm4.channel_a);
  let mut right_arm = PwmServo::new(pwm4.channel_b);

  println!("setup NeoPixels...");
  let (mut pio, sm0, sm1, _, _) = pac.PIO0.split(&mut pac.RESETS);
  let left_strip = Ws2812::new(
    pins.gpio10.into_function(),
    &mut pio,
    sm0,
    clocks.peripheral_clock.freq(),
    timer.count_down(),
  );
  let right_strip = Ws2812::new(
    pins.gpio11.into_function(),
    &mut pio,
    sm1,
    clocks.peripheral_clock.freq(),
    timer.count_down(),
  );
  let strips = (
    SmartStrip::<_, NUM_PIXELS>::new(left_strip),
    SmartStrip::<_, NUM_PIXELS>::new(right_strip),
  );

  let settings = Settings::default();
  let mut leds = LedController::new(strips, settings.brightness);
  if leds.begin().is_err() {
    warn!("LED strips not responding");
  }

  let mut legs = Legs::new(
    [&mut left_leg as &mut dyn Servo, &mut right_leg, &mut left_foot, &mut right_foot],
    [0; 4],
  );
  legs.home(&mut delay);

  let mut arms =
    ArmController::new(&mut left_arm as &mut dyn Servo, &mut right_arm as &mut dyn Servo);
  arms.begin(&mut delay);
  println!("hardware ready");

  let mut robot = StateManager::new(leds, arms, buzzer, settings);
  if let Err(err) = robot.run_startup(&mut delay) {
    error!("startup failed: {}", err);
  }
  led_pin.set_low().unwrap();

  println!("enter loop...");
  let mut ticks: u32 = 0;
  loop {
    delay.delay_ms(MAIN_LOOP_DELAY_MS);
    ticks = ticks.wrapping_add(1);
    // heartbeat
    if ticks % 2 == 0 {
      let _ = led_pin.set_high();
    } else {
      let _ = led_pin.set_low();
    }
    if ticks % STATUS_EVERY_TICKS == 0 {
      info!("status: {}", robot.status());
    }
  }

}
