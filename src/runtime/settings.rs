use crate::config;

/// Load settings, falling back to defaults. Runs before logging exists, so
/// problems go to stderr.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("musicblue: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("musicblue: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
