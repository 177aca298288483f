#![allow(dead_code)]

#[macro_use]
pub mod contract;
pub mod repos;
