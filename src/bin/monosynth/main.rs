//! monosynth - terminal monophonic synthesizer
//!
//! Run with: cargo run --bin monosynth
//!
//! Logging goes to stderr; set RUST_LOG=debug and redirect stderr to a file
//! to watch note and parameter events without tearing the UI.

mod app;
mod keys;
mod ui;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    app::run()
}
