#![allow(dead_code)]

pub mod pools;
