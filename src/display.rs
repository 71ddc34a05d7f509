use crate::engine::Trend;

/// Surface the core pushes computed values into. Calls must not block; the
/// core never reads anything back.
pub trait DisplaySurface: Send {
    fn set_connection_status(&mut self, connected: bool);
    fn set_trend_value(&mut self, text: &str);
    fn set_trend_direction(&mut self, trend: Trend);
    fn set_uptime_text(&mut self, text: &str);
    fn set_clock_text(&mut self, text: &str);
}

pub struct LogDisplay;

impl DisplaySurface for LogDisplay {
    fn set_connection_status(&mut self, connected: bool) {
        if connected {
            log::info!("strap connected");
        } else {
            log::info!("strap disconnected");
        }
    }

    fn set_trend_value(&mut self, text: &str) {
        log::info!("altitude {}", text);
    }

    fn set_trend_direction(&mut self, trend: Trend) {
        log::info!("trend {:?}", trend);
    }

    fn set_uptime_text(&mut self, text: &str) {
        log::info!("strap uptime {}s", text);
    }

    fn set_clock_text(&mut self, text: &str) {
        log::info!("clock {}", text);
    }
}
