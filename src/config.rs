use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub poll_interval: Duration,
    // splash after startup, transient trend overlay
    pub splash_duration: Duration,
    pub overlay_duration: Duration,
}

impl Default for Config {
    fn default() -> Self {
        return Config {
            poll_interval: Duration::from_secs(1),
            splash_duration: Duration::from_secs(3),
            overlay_duration: Duration::from_secs(10),
        };
    }
}
