extern crate byteorder;
#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;

pub mod disk;
mod error;
#[macro_use]
pub(crate) mod utils;
pub mod fs;

pub use error::*;

#[cfg(test)]
extern crate better_panic;

#[cfg(test)]
pub(crate) fn tests_init() {
    better_panic::install();
}
