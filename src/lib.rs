//! SBot: an Otto DIY based companion robot with NeoPixel arms,
//! arm servos and a piezo buzzer that plays RTTTL melodies.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod arms;
pub mod buzzer;
pub mod color;
pub mod config;
pub mod legs;
pub mod leds;
pub mod melodies;
pub mod mood;
pub mod rtttl;
pub mod servo;
pub mod sounds;

#[cfg(feature = "rp2040")]
pub mod board;

#[cfg(test)]
mod testing;
