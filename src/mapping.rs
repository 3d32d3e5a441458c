use crate::model::{BasicRecord, Column, RawRecord};
use serde::Deserialize;
use serde::de::value::{Error, MapDeserializer};

pub fn map_record(raw: &RawRecord) -> BasicRecord {
    let shadowed = |key: &str| {
        Column::SOURCE
            .iter()
            .any(|c| c.aliases().contains(&key) && raw.contains_key(c.header()))
    };
    let cells = raw
        .iter()
        .filter(|(key, _)| !shadowed(key.as_str()))
        .map(|(key, value)| (key.as_str(), value.as_str()));

    BasicRecord::deserialize(MapDeserializer::<_, Error>::new(cells)).unwrap_or_else(|err| {
        log::warn!("row could not be mapped: {err}");
        BasicRecord::default()
    })
}
