// src/exam/mod.rs

pub mod assembler;
pub mod config;
pub mod scoring;
