use std::sync::Arc;

use anyhow::{Context, Result};
use skycast_widget::{RenderPort, WeatherView, WeatherWidget};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Prints render-port calls to stdout.
struct ConsoleRender;

impl RenderPort for ConsoleRender {
    fn show_suggestions(&self, labels: &[String]) {
        println!("Suggestions:");
        for (i, label) in labels.iter().enumerate() {
            println!("  {}. {}", i + 1, label);
        }
    }

    fn hide_suggestions(&self) {}

    fn set_loading(&self, loading: bool) {
        if loading {
            println!("Loading...");
        }
    }

    fn show_error(&self, message: &str) {
        println!("Error: {}", message);
    }

    fn hide_error(&self) {}

    fn show_weather(&self, view: &WeatherView) {
        println!("{}  ({})", view.location, view.date);
        println!("  {}°C  {}", view.temperature, view.description);
        println!("  Feels like {}", view.feels_like);
        println!("  Humidity {}  Wind {}", view.humidity, view.wind_speed);
    }

    fn hide_weather(&self) {}
}

#[tokio::main]
async fn main() -> Result<()> {
    skycast_core::init();

    let (config, _) =
        skycast_core::Config::load_validated().context("Failed to load configuration")?;

    let widget = WeatherWidget::from_config(&config, Arc::new(ConsoleRender))
        .context("Failed to start weather widget")?;

    tracing::info!("SkyCast started");
    println!("SkyCast - type a city name to see suggestions.");
    println!("  :pick N   show weather for suggestion N");
    println!("  :go       search for the last typed text");
    println!("  :dismiss  hide suggestions");
    println!("  :quit     exit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut typed = String::new();

    while let Some(line) = lines.next_line().await? {
        let command = line.trim();
        if command == ":quit" {
            break;
        } else if command == ":go" {
            widget.submit(typed.as_str()).await?;
        } else if command == ":dismiss" {
            widget.dismiss().await?;
        } else if let Some(n) = command.strip_prefix(":pick") {
            match n.trim().parse::<usize>() {
                Ok(n) if n > 0 => widget.select(n - 1).await?,
                _ => println!("Usage: :pick N"),
            }
        } else {
            typed = line;
            widget.input(typed.as_str()).await?;
        }
    }

    widget.shutdown().await;
    Ok(())
}
