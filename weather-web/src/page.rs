//! Minimal HTML for the dashboard.

use std::fmt::Write;

use weather_core::Dashboard;

/// Escape text for use in HTML element content and quoted attributes.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render(dashboard: &Dashboard, flashes: &[String]) -> String {
    let mut body = String::new();

    for message in flashes.iter().chain(dashboard.warnings.iter()) {
        let _ = writeln!(body, r#"<p class="alert">{}</p>"#, escape(message));
    }

    body.push_str(
        r#"<form method="POST" action="/">
<input type="text" name="city_name" placeholder="Enter a city name">
<button type="submit">Add</button>
</form>
"#,
    );

    for (name, snap) in &dashboard.weather {
        let _ = writeln!(
            body,
            r#"<div class="card {period}">
<div class="degrees">{temp:.0}<span class="celsius">°C</span></div>
<div class="state">{condition}</div>
<div class="city">{name}</div>
<form method="POST" action="/delete/{id}"><button type="submit">&times;</button></form>
</div>"#,
            period = snap.day_period,
            temp = snap.temperature,
            condition = escape(&snap.condition),
            name = escape(name),
            id = snap.city_id,
        );
    }

    for city in &dashboard.stale {
        let _ = writeln!(
            body,
            r#"<div class="card stale">
<div class="city">{name}</div>
<form method="POST" action="/delete/{id}"><button type="submit">Remove</button></form>
</div>"#,
            name = escape(&city.name),
            id = city.id,
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Weather</title>
</head>
<body>
{body}</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::{City, DayPeriod, WeatherSnapshot};

    fn paris() -> Dashboard {
        let mut dashboard = Dashboard::default();
        dashboard.weather.insert(
            "Paris".into(),
            WeatherSnapshot {
                city_id: 7,
                temperature: 20.4,
                condition: "Clear".into(),
                day_period: DayPeriod::EveningMorning,
            },
        );
        dashboard
    }

    #[test]
    fn renders_city_card() {
        let html = render(&paris(), &[]);

        assert!(html.contains(r#"class="card evening-morning""#));
        assert!(html.contains(">20<"));
        assert!(html.contains("Clear"));
        assert!(html.contains(r#"action="/delete/7""#));
        assert!(!html.contains("alert"));
    }

    #[test]
    fn renders_flashes_warnings_and_stale_cities() {
        let mut dashboard = Dashboard::default();
        dashboard.stale.push(City { id: 3, name: "Atlantis".into() });
        dashboard.warnings.push("The city doesn't exist!".into());

        let html = render(&dashboard, &["Please enter a city name!".to_string()]);

        assert!(html.contains("Please enter a city name!"));
        assert!(html.contains("The city doesn&#39;t exist!"));
        assert!(html.contains("Atlantis"));
        assert!(html.contains(r#"action="/delete/3""#));
    }

    #[test]
    fn escapes_city_names() {
        let mut dashboard = Dashboard::default();
        dashboard.stale.push(City { id: 1, name: "<script>".into() });

        let html = render(&dashboard, &[]);

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
