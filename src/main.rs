use std::process::ExitCode;

mod client;
mod config;
mod drag;
mod effect;
mod error;
mod geometry;
mod key_mapping;
mod keyboard;
mod spawn;
mod state;
mod wm;
mod x11;

fn main() -> ExitCode {
    env_logger::init();

    match wm::WindowManager::new() {
        Ok(mut wm) => {
            if let Err(e) = wm.run() {
                log::error!("Window manager runtime error: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to initialize window manager: {e}");
            ExitCode::FAILURE
        }
    }
}
