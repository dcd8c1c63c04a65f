#![allow(warnings)]
#![allow(dead_code)]

#[macro_use]
extern crate num_derive;

#[macro_use]
extern crate lazy_static;

pub mod api;
pub mod def;
pub mod plane;
pub mod quant;
pub mod tq;

mod rdpcm;
mod tbl;
mod tracer;
mod trans;
