use citywx_core::{Session, WeatherView};
use std::fmt::Write;

pub fn render_view(view: &WeatherView) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", view.location);
    let _ = writeln!(out, "{}", view.date);
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}  {}", view.temperature, view.description);
    let _ = writeln!(out, "  Feels like: {}", view.feels_like);
    let _ = writeln!(
        out,
        "  Humidity: {}   Wind: {}   Pressure: {}",
        view.humidity, view.wind, view.pressure
    );
    let _ = writeln!(out, "  Icon: {}", view.icon_url);
    let _ = writeln!(
        out,
        "  Background: {} ({})",
        view.background,
        view.background.asset()
    );

    out
}

/// One frame of the interactive screen. Loading wins over errors, errors
/// over results.
pub fn render_screen(session: &Session, view: Option<&WeatherView>) -> String {
    if session.is_loading() {
        return "Loading...\n".to_string();
    }

    if let Some(err) = session.visible_error() {
        return format!("{}\n", err.user_message());
    }

    match view {
        Some(view) => {
            let mut out = render_view(view);
            let _ = writeln!(
                out,
                "\n[:u] {}   [:r] Reset   [:q] Quit",
                view.toggle_label
            );
            out
        }
        None => "Search... (type a city and press Enter)\n".to_string(),
    }
}
