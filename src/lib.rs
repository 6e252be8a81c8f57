//! `regasm` turns register-machine assembly text into an ordered
//! sequence of decoded instruction records.
#[macro_use] extern crate log;
extern crate thiserror;

pub mod assembler;
