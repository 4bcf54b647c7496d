//! Simulated weather payloads for the weather view.
//!
//! No network I/O: the report is a pure constructor returning the same
//! static conditions every time, stamped with the caller's location.

use serde::{Deserialize, Serialize};

/// Geographic coordinates supplied by the environment, with a fixed
/// fallback when unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    /// New York City, used when no environment location exists.
    pub fn fallback() -> Self {
        Self {
            lat: 40.7128,
            lon: -74.0060,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: i32,
    pub feels_like_c: i32,
    pub humidity_pct: u32,
    pub pressure_hpa: u32,
    pub visibility_km: u32,
    pub wind_speed_kmh: u32,
    pub wind_direction: String,
    pub wind_gust_kmh: u32,
    pub dew_point_c: i32,
    pub condition: String,
    pub icon: String,
    pub sunrise: String,
    pub sunset: String,
    pub moon_phase: String,
    pub cloud_cover_pct: u32,
    pub precipitation_mm: u32,
    pub precipitation_probability_pct: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    pub day: String,
    pub high_c: i32,
    pub low_c: i32,
    pub condition: String,
    pub icon: String,
    pub precipitation_pct: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub time: String,
    pub temp_c: i32,
    pub icon: String,
    pub precipitation_pct: u32,
    pub wind_speed_kmh: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQuality {
    pub aqi: u32,
    pub quality: String,
    pub pm25: u32,
    pub pm10: u32,
    pub o3: u32,
    pub no2: u32,
    pub so2: u32,
    pub co: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UvIndex {
    pub current: u32,
    pub max: u32,
    pub level: String,
    pub protection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub kind: String,
    pub severity: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarSummary {
    pub precipitation: String,
    pub intensity: String,
    pub movement: String,
}

/// The full simulated report the weather view renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: Vec<DailyForecast>,
    pub hourly: Vec<HourlyForecast>,
    pub air_quality: AirQuality,
    pub uv_index: UvIndex,
    pub alerts: Vec<WeatherAlert>,
    pub radar: RadarSummary,
}

impl WeatherReport {
    pub fn simulated(location: Location) -> Self {
        let daily = |day: &str, high_c: i32, low_c: i32, condition: &str, icon: &str, precipitation_pct: u32| {
            DailyForecast {
                day: day.into(),
                high_c,
                low_c,
                condition: condition.into(),
                icon: icon.into(),
                precipitation_pct,
            }
        };
        let hourly = |time: &str, temp_c: i32, icon: &str, precipitation_pct: u32, wind_speed_kmh: u32| {
            HourlyForecast {
                time: time.into(),
                temp_c,
                icon: icon.into(),
                precipitation_pct,
                wind_speed_kmh,
            }
        };

        Self {
            location,
            current: CurrentConditions {
                temperature_c: 22,
                feels_like_c: 25,
                humidity_pct: 65,
                pressure_hpa: 1013,
                visibility_km: 10,
                wind_speed_kmh: 12,
                wind_direction: "NW".into(),
                wind_gust_kmh: 18,
                dew_point_c: 16,
                condition: "Partly Cloudy".into(),
                icon: "⛅".into(),
                sunrise: "06:30".into(),
                sunset: "19:45".into(),
                moon_phase: "Waxing Crescent".into(),
                cloud_cover_pct: 40,
                precipitation_mm: 0,
                precipitation_probability_pct: 20,
            },
            forecast: vec![
                daily("Today", 25, 18, "Partly Cloudy", "⛅", 20),
                daily("Tomorrow", 28, 20, "Sunny", "☀️", 5),
                daily("Friday", 24, 16, "Rainy", "🌧️", 80),
                daily("Saturday", 22, 14, "Cloudy", "☁️", 30),
                daily("Sunday", 26, 19, "Sunny", "☀️", 10),
                daily("Monday", 23, 17, "Thunderstorms", "⛈️", 90),
                daily("Tuesday", 21, 15, "Partly Cloudy", "⛅", 25),
            ],
            hourly: vec![
                hourly("12:00", 22, "⛅", 20, 12),
                hourly("13:00", 24, "☀️", 10, 14),
                hourly("14:00", 25, "☀️", 5, 16),
                hourly("15:00", 26, "⛅", 15, 18),
                hourly("16:00", 25, "⛅", 25, 15),
                hourly("17:00", 23, "🌧️", 60, 20),
                hourly("18:00", 21, "🌧️", 70, 22),
                hourly("19:00", 20, "☁️", 40, 18),
            ],
            air_quality: AirQuality {
                aqi: 45,
                quality: "Good".into(),
                pm25: 12,
                pm10: 18,
                o3: 65,
                no2: 25,
                so2: 8,
                co: 0.5,
            },
            uv_index: UvIndex {
                current: 6,
                max: 8,
                level: "High".into(),
                protection: "Wear sunscreen and protective clothing".into(),
            },
            alerts: vec![WeatherAlert {
                kind: "Heat Advisory".into(),
                severity: "Moderate".into(),
                description: "High temperatures expected this afternoon".into(),
                start_time: "14:00".into(),
                end_time: "18:00".into(),
            }],
            radar: RadarSummary {
                precipitation: "Light rain approaching from the west".into(),
                intensity: "Moderate".into(),
                movement: "Moving northeast at 15 km/h".into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_location_is_nyc() {
        let loc = Location::fallback();
        assert_eq!(loc.lat, 40.7128);
        assert_eq!(loc.lon, -74.0060);
    }

    #[test]
    fn simulated_report_shape() {
        let report = WeatherReport::simulated(Location::fallback());
        assert_eq!(report.forecast.len(), 7);
        assert_eq!(report.hourly.len(), 8);
        assert_eq!(report.air_quality.quality, "Good");
        assert_eq!(report.alerts.len(), 1);
    }

    #[test]
    fn report_serializes() {
        let report = WeatherReport::simulated(Location::fallback());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["current"]["temperature_c"], 22);
    }
}
