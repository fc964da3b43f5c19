pub mod app;
pub mod cli;
pub mod control;
pub mod render;
pub mod replay;
pub mod views;
