use chrono::Local;
use wardrobe_core::{Advice, SavedOutfit};

pub fn print_advice(advice: &Advice, saved: bool) {
    let w = &advice.weather;
    let marker = if saved { " [saved]" } else { "" };

    println!("{}{marker}", advice.location);
    println!("  {}", advice.summary);
    println!();
    println!(
        "  {:.0}°C (feels like {:.0}°C), {}",
        w.temperature, w.feels_like, w.condition
    );
    println!(
        "  Humidity {}%  Wind {:.0} km/h  Precipitation {:.0}",
        w.humidity, w.wind_speed, w.precipitation
    );
    println!();
    println!("  Base:  {}", advice.outfit.base_layers);
    println!("  Mid:   {}", advice.outfit.mid_layers);
    println!("  Outer: {}", advice.outfit.outer_layers);
    if !advice.outfit.wildcard.is_empty() {
        println!("  Wildcard: {}", advice.outfit.wildcard);
    }
    println!();
    println!("  {}", advice.outfit.flourish);

    if !w.forecast.is_empty() {
        println!();
        for day in &w.forecast {
            println!("  {:<4} {:>4.0}°C  {}", day.day, day.temperature, day.condition);
        }
    }
}

pub fn print_saved(outfits: &[&SavedOutfit]) {
    if outfits.is_empty() {
        println!("No saved outfits.");
        return;
    }

    for outfit in outfits {
        let when = outfit.saved_at.with_timezone(&Local).format("%d %b %Y %H:%M");
        println!(
            "{} ({}, {:.0}°C) saved {when}",
            outfit.location, outfit.weather_type, outfit.temperature
        );
        println!("  id: {}", outfit.id);
        println!("  {}", outfit.weather_summary);
        println!("  Base:  {}", outfit.base_layers);
        println!("  Mid:   {}", outfit.mid_layers);
        println!("  Outer: {}", outfit.outer_layers);
        if !outfit.wildcard.is_empty() {
            println!("  Wildcard: {}", outfit.wildcard);
        }
        println!();
    }
}

pub fn print_favorites(favorites: &[String]) {
    if favorites.is_empty() {
        println!("No favourite locations.");
    }
    for location in favorites {
        println!("{location}");
    }
}
