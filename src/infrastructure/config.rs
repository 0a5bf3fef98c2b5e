use crate::domain::meter::MeterDescriptor;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub server: ServerSettings,
    pub samples: SamplesSettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub listen: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SamplesSettings {
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartSettings {
    #[serde(default = "default_days")]
    pub default_days: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            default_days: default_days(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_days() -> u32 {
    1
}

/// Descriptor list the dashboard hands to the widget at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct MetersConfig {
    #[serde(default)]
    pub meters: Vec<MeterDescriptor>,
}

pub fn load_widget_config() -> anyhow::Result<WidgetConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/widget"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_meters_config() -> anyhow::Result<MetersConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/meters"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::meter::MeterType;
    use config::{Config, File, FileFormat};

    fn parse<T: serde::de::DeserializeOwned>(toml: &str) -> T {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_widget_config_defaults() {
        let cfg: WidgetConfig = parse(
            r#"
            [server]
            listen = "127.0.0.1:9000"

            [samples]
            url = "http://dashboard/admin/metering/samples"
            "#,
        );
        assert_eq!(cfg.server.listen, "127.0.0.1:9000");
        assert_eq!(cfg.samples.timeout_secs, 30);
        assert_eq!(cfg.chart.default_days, 1);
    }

    #[test]
    fn test_meters_config() {
        let cfg: MetersConfig = parse(
            r#"
            [[meters]]
            name = "cpu_util"
            resource_id = "r1"
            unit = "%"
            type = "gauge"

            [[meters]]
            name = "cpu"
            resource_id = "r1"
            type = "cumulative"
            "#,
        );
        assert_eq!(
            cfg.meters,
            vec![
                MeterDescriptor::new("cpu_util", "r1", "%", MeterType::Gauge),
                MeterDescriptor::new("cpu", "r1", "", MeterType::Cumulative),
            ]
        );
    }

    #[test]
    fn test_shipped_config_files_load() {
        let widget = load_widget_config().unwrap();
        assert!(widget.samples.url.starts_with("http"));
        let meters = load_meters_config().unwrap();
        assert!(!meters.meters.is_empty());
    }
}
