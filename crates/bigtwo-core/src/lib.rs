#![deny(warnings)]
pub mod combo;
pub mod game;
pub mod model;
