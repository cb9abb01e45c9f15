pub mod cli;
mod commands;
mod fixture;
mod output;
