#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
extern crate contracts;

#[macro_use]
extern crate log;

pub mod array2d;
pub mod cogs;
pub mod event_log;
pub mod record;
pub mod reporter;
pub mod simulation;
pub mod tree;
