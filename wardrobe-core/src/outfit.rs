use std::sync::Arc;

use crate::{
    classify::{
        CLOUD_WORDS, Condition, SNOW_WORDS, SUN_WORDS, TempBand, WET_WORDS, WINDY_ABOVE,
    },
    model::{OutfitRecommendation, WeatherObservation},
    phrases::{PhrasePicker, ThreadRngPicker, choose},
};

const HUMID_ABOVE: i32 = 70;
const WET_PRECIPITATION_ABOVE: f64 = 50.0;
const BREEZY_ABOVE: f64 = 15.0;
const INSULATE_BELOW: f64 = 10.0;

pub const RAIN_WILDCARDS: [&str; 4] = [
    "A colorful umbrella to brighten the day",
    "Water-resistant bag to protect your belongings",
    "Hat with brim to keep rain off your face",
    "Waterproof watch or jewelry that can handle dampness",
];

pub const WIND_WILDCARDS: [&str; 4] = [
    "Secure hat that won't blow away",
    "Scarf that can double as a face shield",
    "Earrings that won't catch the wind",
    "A bag that can be worn close to the body",
];

pub const CLOUD_WILDCARDS: [&str; 4] = [
    "A piece of statement jewelry to combat the grey",
    "Colorful scarf to add visual interest",
    "Textured accessories for depth on a flat day",
    "A hint of color in your socks or pocket square",
];

pub const SUN_WILDCARDS: [&str; 4] = [
    "Sunglasses with personality",
    "Light-colored hat with good brim",
    "A piece of statement jewelry that catches the light",
    "Playful pocket square or hair accessory",
];

pub const SNOW_WILDCARDS: [&str; 4] = [
    "Touchscreen-compatible gloves",
    "Colorful knit hat to stand out against the white",
    "Thermal flask for hot drinks",
    "Snow-appropriate boots with personality",
];

pub const RAIN_FLOURISHES: [&str; 3] = [
    "A day for embracing the melancholy with thoughtful accessories",
    "The patter of rain calls for quiet confidence in your styling",
    "Weather for introspection reflected in subtle details",
];

pub const SUN_FLOURISHES: [&str; 3] = [
    "A morning for bold earrings and no regrets",
    "Weather that deserves your most confident silhouette",
    "Let your accessories catch the light as boldly as you please",
];

pub const COLD_FLOURISHES: [&str; 3] = [
    "Cold that demands defiance through careful layering",
    "Weather that rewards those who understand the art of insulation",
    "A day when style lies in the subtle balance of necessity and flair",
];

pub const HOT_FLOURISHES: [&str; 3] = [
    "Heat that calls for elegant minimalism",
    "A day when less truly becomes more",
    "Weather for celebrating the luxury of simplicity",
];

pub const NEUTRAL_FLOURISHES: [&str; 3] = [
    "A day that rewards thoughtful accessorizing",
    "Weather that asks for balance in all things",
    "Consider this a canvas for your personal expression",
];

/// Rule-based clothing advice for a single observation.
///
/// Layers are deterministic; wildcard and flourish are drawn from fixed
/// lists with the injected picker.
#[derive(Debug, Clone)]
pub struct OutfitAdvisor {
    picker: Arc<dyn PhrasePicker>,
}

impl Default for OutfitAdvisor {
    fn default() -> Self {
        Self::new(Arc::new(ThreadRngPicker))
    }
}

impl OutfitAdvisor {
    pub fn new(picker: Arc<dyn PhrasePicker>) -> Self {
        Self { picker }
    }

    pub fn recommend(&self, weather: &WeatherObservation) -> OutfitRecommendation {
        let condition = Condition::from(weather);

        OutfitRecommendation {
            base_layers: base_layers(weather.temperature).to_string(),
            mid_layers: mid_layers(weather.temperature, weather.humidity).to_string(),
            outer_layers: outer_layers(weather, &condition).to_string(),
            wildcard: self.pick(wildcards(weather, &condition)).to_string(),
            flourish: self.pick(flourishes(weather, &condition)).to_string(),
        }
    }

    fn pick(&self, candidates: &'static [&'static str]) -> &'static str {
        choose(self.picker.as_ref(), candidates).unwrap_or_default()
    }
}

pub fn base_layers(temperature: f64) -> &'static str {
    match TempBand::of(temperature) {
        TempBand::Freezing => {
            "Thermal underwear, heavy cotton or wool socks, long-sleeve cotton shirt"
        }
        TempBand::Cold => "Long-sleeve cotton shirt, warm socks, light thermal layer if needed",
        TempBand::Cool => "Cotton t-shirt or light long-sleeve, regular socks",
        TempBand::Mild => "Light cotton t-shirt, thin socks",
        TempBand::Warm => "Breathable t-shirt, thin cotton socks or no-show socks",
    }
}

pub fn mid_layers(temperature: f64, humidity: i32) -> &'static str {
    let humid = humidity > HUMID_ABOVE;

    match TempBand::of(temperature) {
        TempBand::Freezing => "Heavy wool sweater or fleece, lined trousers",
        TempBand::Cold => "Light wool jumper or cardigan, regular trousers or jeans",
        TempBand::Cool if humid => {
            "Light cardigan or cotton jumper, non-clingy trousers or jeans"
        }
        TempBand::Cool => "Light jumper or button-up shirt, regular trousers or jeans",
        TempBand::Mild => "Optional light shirt or blouse for layering, casual trousers or skirt",
        TempBand::Warm if humid => "Minimal layering, loose-fitting shorts or skirt",
        TempBand::Warm => "No mid layer needed, shorts, skirt or light trousers",
    }
}

/// Wet and windy rules pre-empt the temperature bands entirely.
pub fn outer_layers(weather: &WeatherObservation, condition: &Condition) -> &'static str {
    let insulate = weather.temperature < INSULATE_BELOW;

    if weather.precipitation > WET_PRECIPITATION_ABOVE || condition.mentions_any(WET_WORDS) {
        return if insulate {
            "Waterproof coat with insulation, consider hood or hat, waterproof boots"
        } else {
            "Lightweight waterproof jacket, water-resistant footwear"
        };
    }

    if weather.wind_speed > WINDY_ABOVE {
        return if insulate {
            "Windproof coat with good structure, scarf for neck protection, sturdy shoes"
        } else {
            "Windbreaker or light jacket with structure, secure hat if needed"
        };
    }

    match TempBand::of(weather.temperature) {
        TempBand::Freezing => "Heavy winter coat, gloves, hat, insulated boots",
        TempBand::Cold => "Medium weight coat or jacket, light gloves if windy",
        TempBand::Cool => "Light jacket or heavy cardigan, closed shoes",
        TempBand::Mild if weather.wind_speed > BREEZY_ABOVE => {
            "Light jacket or overshirt, any footwear appropriate"
        }
        TempBand::Mild => "Optional light overshirt or jacket, any footwear",
        TempBand::Warm => {
            "No outer layer needed, perhaps a light shawl for evening, sandals or light shoes"
        }
    }
}

/// Candidate accessories; empty when nothing matches.
pub fn wildcards(weather: &WeatherObservation, condition: &Condition) -> &'static [&'static str] {
    if condition.mentions_any(WET_WORDS) {
        &RAIN_WILDCARDS
    } else if weather.wind_speed > WINDY_ABOVE {
        &WIND_WILDCARDS
    } else if condition.mentions_any(CLOUD_WORDS) {
        &CLOUD_WILDCARDS
    } else if condition.mentions_any(SUN_WORDS) {
        &SUN_WILDCARDS
    } else if condition.mentions_any(SNOW_WORDS) {
        &SNOW_WILDCARDS
    } else {
        &[]
    }
}

pub fn flourishes(weather: &WeatherObservation, condition: &Condition) -> &'static [&'static str] {
    if condition.mentions("rain") {
        &RAIN_FLOURISHES
    } else if condition.mentions_any(SUN_WORDS) {
        &SUN_FLOURISHES
    } else if weather.temperature < 5.0 {
        &COLD_FLOURISHES
    } else if weather.temperature > 25.0 {
        &HOT_FLOURISHES
    } else {
        &NEUTRAL_FLOURISHES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::observation;
    use crate::phrases::{FixedPicker, SeededPicker};

    fn advisor() -> OutfitAdvisor {
        OutfitAdvisor::default()
    }

    fn with(
        condition: &str,
        temperature: f64,
        wind_speed: f64,
        humidity: i32,
        precipitation: f64,
    ) -> WeatherObservation {
        WeatherObservation {
            humidity,
            precipitation,
            ..observation(condition, temperature, wind_speed)
        }
    }

    #[test]
    fn base_layer_bands() {
        assert!(base_layers(-3.0).starts_with("Thermal underwear"));
        assert!(base_layers(5.0).starts_with("Long-sleeve cotton shirt"));
        assert!(base_layers(9.9).starts_with("Long-sleeve cotton shirt"));
        assert!(base_layers(10.0).starts_with("Cotton t-shirt"));
        assert!(base_layers(15.0).starts_with("Light cotton t-shirt"));
        assert!(base_layers(20.0).starts_with("Breathable t-shirt"));
        assert!(base_layers(40.0).starts_with("Breathable t-shirt"));
    }

    #[test]
    fn mid_layers_branch_on_humidity_only_in_cool_and_warm_bands() {
        assert_eq!(mid_layers(2.0, 90), mid_layers(2.0, 10));
        assert_eq!(mid_layers(7.0, 90), mid_layers(7.0, 10));
        assert_eq!(mid_layers(17.0, 90), mid_layers(17.0, 10));

        assert!(mid_layers(12.0, 71).contains("non-clingy"));
        assert!(!mid_layers(12.0, 70).contains("non-clingy"));
        assert!(mid_layers(22.0, 71).starts_with("Minimal layering"));
        assert!(mid_layers(22.0, 70).starts_with("No mid layer needed"));
    }

    #[test]
    fn negative_humidity_is_accepted() {
        assert!(mid_layers(22.0, -5).starts_with("No mid layer needed"));
    }

    #[test]
    fn rain_dominates_temperature_for_outer_layer() {
        let w = with("light rain", 28.0, 5.0, 50, 80.0);
        let outfit = advisor().recommend(&w);
        assert_eq!(outfit.outer_layers, "Lightweight waterproof jacket, water-resistant footwear");
    }

    #[test]
    fn heavy_precipitation_alone_is_wet() {
        let w = with("overcast", 4.0, 5.0, 50, 51.0);
        assert!(
            advisor()
                .recommend(&w)
                .outer_layers
                .starts_with("Waterproof coat with insulation")
        );

        let w = with("overcast", 4.0, 5.0, 50, 50.0);
        assert!(advisor().recommend(&w).outer_layers.starts_with("Heavy winter coat"));
    }

    #[test]
    fn wind_overrides_clear_mild_day() {
        let w = observation("clear", 15.0, 25.0);
        let outfit = advisor().recommend(&w);
        assert!(outfit.outer_layers.starts_with("Windbreaker"));

        let w = observation("clear", 9.0, 25.0);
        assert!(advisor().recommend(&w).outer_layers.starts_with("Windproof coat"));
    }

    #[test]
    fn calm_outer_layers_follow_bands() {
        let outer =
            |t: f64, wind: f64| outer_layers(&observation("fog", t, wind), &Condition::new("fog"));
        assert!(outer(0.0, 0.0).starts_with("Heavy winter coat"));
        assert!(outer(5.0, 0.0).starts_with("Medium weight coat"));
        assert!(outer(10.0, 0.0).starts_with("Light jacket or heavy cardigan"));
        assert!(outer(15.0, 0.0).starts_with("Optional light overshirt"));
        assert!(outer(15.0, 18.0).starts_with("Light jacket or overshirt"));
        assert!(outer(20.0, 0.0).starts_with("No outer layer needed"));
    }

    #[test]
    fn wildcard_precedence() {
        let pick = |w: &WeatherObservation| wildcards(w, &Condition::from(w));

        assert_eq!(pick(&observation("rain and wind", 12.0, 40.0)), RAIN_WILDCARDS);
        assert_eq!(pick(&observation("cloudy", 12.0, 40.0)), WIND_WILDCARDS);
        assert_eq!(pick(&observation("overcast", 12.0, 5.0)), CLOUD_WILDCARDS);
        assert_eq!(pick(&observation("sunny", 12.0, 5.0)), SUN_WILDCARDS);
        assert_eq!(pick(&observation("light snow", -2.0, 5.0)), SNOW_WILDCARDS);
        // Shower is not a wildcard rain word.
        assert!(pick(&observation("showers", 12.0, 5.0)).is_empty());
    }

    #[test]
    fn wildcard_is_empty_when_nothing_matches() {
        let outfit = advisor().recommend(&observation("mist", 12.0, 5.0));
        assert_eq!(outfit.wildcard, "");
        assert!(!outfit.flourish.is_empty());
    }

    #[test]
    fn flourish_precedence() {
        let pick = |w: &WeatherObservation| flourishes(w, &Condition::from(w));

        assert_eq!(pick(&observation("Rain", 30.0, 0.0)), RAIN_FLOURISHES);
        // Drizzle alone does not trigger the rain flourish.
        assert_eq!(pick(&observation("drizzle", 12.0, 0.0)), NEUTRAL_FLOURISHES);
        assert_eq!(pick(&observation("clear", 0.0, 0.0)), SUN_FLOURISHES);
        assert_eq!(pick(&observation("fog", 4.9, 0.0)), COLD_FLOURISHES);
        assert_eq!(pick(&observation("fog", 5.0, 0.0)), NEUTRAL_FLOURISHES);
        assert_eq!(pick(&observation("fog", 25.1, 0.0)), HOT_FLOURISHES);
        assert_eq!(pick(&observation("fog", 25.0, 0.0)), NEUTRAL_FLOURISHES);
    }

    #[test]
    fn fixed_picker_selects_exact_phrases() {
        let advisor = OutfitAdvisor::new(Arc::new(FixedPicker(2)));
        let outfit = advisor.recommend(&observation("sunny", 22.0, 5.0));
        assert_eq!(outfit.wildcard, SUN_WILDCARDS[2]);
        assert_eq!(outfit.flourish, SUN_FLOURISHES[2]);
    }

    #[test]
    fn layers_are_stable_and_random_fields_stay_in_domain() {
        let advisor = OutfitAdvisor::new(Arc::new(SeededPicker::new(42)));
        let w = with("Overcast with a stiff breeze", 13.0, 10.0, 80, 10.0);
        let first = advisor.recommend(&w);

        for _ in 0..50 {
            let next = advisor.recommend(&w);
            assert_eq!(next.base_layers, first.base_layers);
            assert_eq!(next.mid_layers, first.mid_layers);
            assert_eq!(next.outer_layers, first.outer_layers);
            assert!(CLOUD_WILDCARDS.contains(&next.wildcard.as_str()));
            assert!(NEUTRAL_FLOURISHES.contains(&next.flourish.as_str()));
        }
    }

    #[test]
    fn every_input_yields_layers_and_flourish() {
        let advisor = advisor();
        for t in [-30.0, 4.99, 5.0, 10.0, 15.0, 20.0, 25.0, 45.0, f64::NAN] {
            for condition in ["", "rain", "snow", "thunder", "clear"] {
                let outfit = advisor.recommend(&with(condition, t, 22.0, 101, -1.0));
                assert!(!outfit.base_layers.is_empty());
                assert!(!outfit.mid_layers.is_empty());
                assert!(!outfit.outer_layers.is_empty());
                assert!(!outfit.flourish.is_empty());
            }
        }
    }
}
