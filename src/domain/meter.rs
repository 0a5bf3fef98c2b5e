// Meter domain model
use serde::{Deserialize, Serialize};

/// Aggregation type of a meter. Only cumulative meters are drawn as a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeterType {
    Cumulative,
    #[default]
    Gauge,
    Delta,
}

impl MeterType {
    pub fn is_cumulative(self) -> bool {
        self == MeterType::Cumulative
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterDescriptor {
    pub name: String,
    pub resource_id: String,
    #[serde(default)]
    pub unit: String,
    #[serde(rename = "type", default)]
    pub meter_type: MeterType,
}

impl MeterDescriptor {
    pub fn new(name: &str, resource_id: &str, unit: &str, meter_type: MeterType) -> Self {
        Self {
            name: name.to_string(),
            resource_id: resource_id.to_string(),
            unit: unit.to_string(),
            meter_type,
        }
    }
}

/// Resource ids of every descriptor named `meter_name`, in descriptor order.
pub fn resource_options(descriptors: &[MeterDescriptor], meter_name: &str) -> Vec<String> {
    descriptors
        .iter()
        .filter(|d| d.name == meter_name)
        .map(|d| d.resource_id.clone())
        .collect()
}

/// First descriptor for a meter; unit and type are shared by all its resources.
pub fn find_meter<'a>(descriptors: &'a [MeterDescriptor], meter_name: &str) -> Option<&'a MeterDescriptor> {
    descriptors.iter().find(|d| d.name == meter_name)
}

/// Distinct meter names in order of first appearance.
pub fn meter_names(descriptors: &[MeterDescriptor]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for d in descriptors {
        if !names.iter().any(|n| n == &d.name) {
            names.push(d.name.clone());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors() -> Vec<MeterDescriptor> {
        vec![
            MeterDescriptor::new("cpu_util", "r2", "%", MeterType::Gauge),
            MeterDescriptor::new("disk.read.bytes", "r1", "B", MeterType::Cumulative),
            MeterDescriptor::new("cpu_util", "r1", "%", MeterType::Gauge),
            MeterDescriptor::new("cpu_util", "r3", "%", MeterType::Gauge),
        ]
    }

    #[test]
    fn test_resource_options_keep_descriptor_order() {
        let options = resource_options(&descriptors(), "cpu_util");
        assert_eq!(options, vec!["r2", "r1", "r3"]);
    }

    #[test]
    fn test_resource_options_exclude_other_meters() {
        assert_eq!(resource_options(&descriptors(), "disk.read.bytes"), vec!["r1"]);
        assert!(resource_options(&descriptors(), "memory").is_empty());
        assert!(resource_options(&[], "cpu_util").is_empty());
    }

    #[test]
    fn test_meter_names_are_distinct() {
        assert_eq!(meter_names(&descriptors()), vec!["cpu_util", "disk.read.bytes"]);
    }

    #[test]
    fn test_type_defaults_to_gauge() {
        let d: MeterDescriptor =
            serde_json::from_str(r#"{"name":"cpu_util","resource_id":"r1"}"#).unwrap();
        assert_eq!(d.meter_type, MeterType::Gauge);
        assert_eq!(d.unit, "");

        let d: MeterDescriptor = serde_json::from_str(
            r#"{"name":"cpu","resource_id":"r1","unit":"ns","type":"cumulative"}"#,
        )
        .unwrap();
        assert!(d.meter_type.is_cumulative());
    }
}
