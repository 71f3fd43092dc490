//! Metric registry
//!
//! Declarative tables mapping each exported metric to a pure extraction
//! function over a snapshot type. The tables can be enumerated without any
//! snapshot (descriptor advertisement) and evaluated against any snapshot,
//! fresh or cached. Adding a metric means adding a row here.

use std::fmt;

use chrono::{DateTime, Utc};
use domain::{PollutionSnapshot, UltravioletSnapshot, WeatherSnapshot};

/// Prometheus metric type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Value that can go up and down
    Gauge,
    /// Monotonically increasing count
    Counter,
}

impl MetricKind {
    /// Name used in `# TYPE` lines
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gauge => "gauge",
            Self::Counter => "counter",
        }
    }
}

/// Static metadata of one exported metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Descriptor {
    /// Metric name
    pub name: &'static str,
    /// Help text
    pub help: &'static str,
    /// Label names, in the order label values are produced
    pub labels: &'static [&'static str],
    /// Metric type
    pub kind: MetricKind,
}

/// One evaluated sample
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Metric the sample belongs to
    pub descriptor: Descriptor,
    /// Label values, parallel to `descriptor.labels`
    pub label_values: Vec<String>,
    /// Sample value
    pub value: f64,
}

impl Sample {
    /// Iterate over `(label name, label value)` pairs
    pub fn labels(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.descriptor
            .labels
            .iter()
            .copied()
            .zip(self.label_values.iter().map(String::as_str))
    }

    /// Look up a label value by name
    #[must_use]
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels()
            .find_map(|(label, value)| (label == name).then_some(value))
    }
}

const LOCATION_LABELS: &[&str] = &["location"];
const CONDITION_LABELS: &[&str] = &["location", "currentconditions"];

fn location_only<S>(_snapshot: &S, location: &str) -> Vec<String> {
    vec![location.to_string()]
}

/// A registry row: metric identity plus extraction functions
pub struct MetricDescriptor<S> {
    descriptor: Descriptor,
    value: fn(&S) -> f64,
    label_values: fn(&S, &str) -> Vec<String>,
}

impl<S> MetricDescriptor<S> {
    /// Gauge labeled by `location` only
    pub const fn gauge(name: &'static str, help: &'static str, value: fn(&S) -> f64) -> Self {
        Self {
            descriptor: Descriptor {
                name,
                help,
                labels: LOCATION_LABELS,
                kind: MetricKind::Gauge,
            },
            value,
            label_values: location_only::<S>,
        }
    }

    /// Gauge with a custom label schema
    pub const fn labeled_gauge(
        name: &'static str,
        help: &'static str,
        labels: &'static [&'static str],
        value: fn(&S) -> f64,
        label_values: fn(&S, &str) -> Vec<String>,
    ) -> Self {
        Self {
            descriptor: Descriptor {
                name,
                help,
                labels,
                kind: MetricKind::Gauge,
            },
            value,
            label_values,
        }
    }

    /// Static metadata of this metric
    pub const fn descriptor(&self) -> Descriptor {
        self.descriptor
    }

    /// Evaluate this metric against a snapshot
    pub fn evaluate(&self, snapshot: &S, location: &str) -> Sample {
        Sample {
            descriptor: self.descriptor,
            label_values: (self.label_values)(snapshot, location),
            value: (self.value)(snapshot),
        }
    }
}

impl<S> fmt::Debug for MetricDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricDescriptor")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

#[allow(clippy::cast_precision_loss)]
fn unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp() as f64
}

/// Current weather metrics, always collected
pub static WEATHER_METRICS: [MetricDescriptor<WeatherSnapshot>; 12] = [
    MetricDescriptor::gauge(
        "openweather_temperature",
        "Current temperature in degrees",
        |s: &WeatherSnapshot| s.temperature,
    ),
    MetricDescriptor::gauge(
        "openweather_humidity",
        "Current relative humidity",
        |s: &WeatherSnapshot| s.humidity,
    ),
    MetricDescriptor::gauge(
        "openweather_feelslike",
        "Current feels_like temperature in degrees",
        |s: &WeatherSnapshot| s.feels_like,
    ),
    MetricDescriptor::gauge(
        "openweather_pressure",
        "Current Atmospheric pressure hPa",
        |s: &WeatherSnapshot| s.pressure,
    ),
    MetricDescriptor::gauge(
        "openweather_windspeed",
        "Current Wind Speed in mph or meters/sec if imperial",
        |s: &WeatherSnapshot| s.wind_speed,
    ),
    MetricDescriptor::gauge(
        "openweather_rain1h",
        "Rain volume for last hour, in millimeters",
        |s: &WeatherSnapshot| s.rain_1h,
    ),
    MetricDescriptor::gauge(
        "openweather_snow1h",
        "Snow volume for last hour, in millimeters",
        |s: &WeatherSnapshot| s.snow_1h,
    ),
    MetricDescriptor::gauge(
        "openweather_winddegree",
        "Wind direction, degrees (meteorological)",
        |s: &WeatherSnapshot| s.wind_degree,
    ),
    MetricDescriptor::gauge(
        "openweather_cloudiness",
        "Cloudiness percentage",
        |s: &WeatherSnapshot| s.clouds,
    ),
    MetricDescriptor::gauge(
        "openweather_sunrise",
        "Sunrise time, unix, UTC",
        |s: &WeatherSnapshot| unix_seconds(s.sunrise),
    ),
    MetricDescriptor::gauge(
        "openweather_sunset",
        "Sunset time, unix, UTC",
        |s: &WeatherSnapshot| unix_seconds(s.sunset),
    ),
    MetricDescriptor::labeled_gauge(
        "openweather_currentconditions",
        "Current weather conditions",
        CONDITION_LABELS,
        |_: &WeatherSnapshot| 0.0,
        |s: &WeatherSnapshot, location: &str| {
            vec![location.to_string(), s.current_conditions().to_string()]
        },
    ),
];

/// Air pollution metrics, collected when pollution is enabled
pub static POLLUTION_METRICS: [MetricDescriptor<PollutionSnapshot>; 9] = [
    MetricDescriptor::gauge(
        "openweather_pollution_airqualityindex",
        "Air Quality Index. Possible values: 1, 2, 3, 4, 5. Where 1 = Good, 2 = Fair, 3 = Moderate, 4 = Poor, 5 = Very Poor",
        |s: &PollutionSnapshot| s.air_quality_index,
    ),
    MetricDescriptor::gauge(
        "openweather_pollution_carbonmonoxide",
        "Concentration of CO (Carbon monoxide), μg/m3",
        |s: &PollutionSnapshot| s.carbon_monoxide,
    ),
    MetricDescriptor::gauge(
        "openweather_pollution_nitrogenmonoxide",
        "Concentration of NO (Nitrogen monoxide), μg/m3",
        |s: &PollutionSnapshot| s.nitrogen_monoxide,
    ),
    MetricDescriptor::gauge(
        "openweather_pollution_nitrogendioxide",
        "Concentration of NO2 (Nitrogen dioxide), μg/m3",
        |s: &PollutionSnapshot| s.nitrogen_dioxide,
    ),
    MetricDescriptor::gauge(
        "openweather_pollution_ozone",
        "Concentration of O3 (Ozone), μg/m3",
        |s: &PollutionSnapshot| s.ozone,
    ),
    MetricDescriptor::gauge(
        "openweather_pollution_sulphurdioxide",
        "Concentration of SO2 (Sulphur dioxide), μg/m3",
        |s: &PollutionSnapshot| s.sulphur_dioxide,
    ),
    MetricDescriptor::gauge(
        "openweather_pollution_pm25",
        "Concentration of PM2.5 (Fine particles matter), μg/m3",
        |s: &PollutionSnapshot| s.pm2_5,
    ),
    MetricDescriptor::gauge(
        "openweather_pollution_pm10",
        "Concentration of PM10 (Coarse particulate matter), μg/m3",
        |s: &PollutionSnapshot| s.pm10,
    ),
    MetricDescriptor::gauge(
        "openweather_pollution_nh3",
        "Concentration of NH3 (Ammonia), μg/m3",
        |s: &PollutionSnapshot| s.ammonia,
    ),
];

/// Ultraviolet metrics, collected when UV is enabled
pub static ULTRAVIOLET_METRICS: [MetricDescriptor<UltravioletSnapshot>; 1] =
    [MetricDescriptor::gauge(
        "openweather_ultraviolet_index",
        "Ultraviolet Index",
        |s: &UltravioletSnapshot| s.index,
    )];

/// Counter of outbound API calls
pub const API_CALLS_DESCRIPTOR: Descriptor = Descriptor {
    name: "openweather_api_calls_total",
    help: "Number of API calls to openweathermap.org",
    labels: &["location", "endpoint", "response_status"],
    kind: MetricKind::Counter,
};
