use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::host::HostContainer;

use super::config::ChartKind;
use super::{ChartInput, ContentKey, Gantt, GanttContent, OneOrMany, Timeline, TimelineContent};

pub const CHART_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Reference to loaded content in an unload payload: either the bare key
/// or the content object that was loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentKeyRef {
    Key(ContentKey),
    Object { key: ContentKey },
}

impl From<ContentKeyRef> for ContentKey {
    fn from(value: ContentKeyRef) -> Self {
        match value {
            ContentKeyRef::Key(key) | ContentKeyRef::Object { key } => key,
        }
    }
}

/// Inspectable state of one chart after its last layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub kind: ChartKind,
    pub keys: Vec<String>,
    pub shown_targets: Vec<String>,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub height: f64,
    pub x_range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: ChartSnapshot,
}

impl ChartSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartSnapshotJsonContractV1 {
            schema_version: CHART_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize chart snapshot contract v1: {e}"))
        })
    }

    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<ChartSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: ChartSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse chart snapshot json payload: {e}"))
        })?;
        if payload.schema_version != CHART_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported chart snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

impl ChartInput {
    /// Parses consumer input; a blank document or `null` is [`ChartError::NoData`].
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        parse_payload::<Option<ChartInput>>(input, "chart input")?.ok_or(ChartError::NoData)
    }
}

impl Gantt {
    pub fn from_json_str(input: &str, container: impl HostContainer + 'static) -> ChartResult<Self> {
        Self::new(&ChartInput::from_json_str(input)?, container)
    }

    /// Loads a track object or an array of track objects.
    pub fn load_content_json(&mut self, input: &str) -> ChartResult<&mut Self> {
        let content: OneOrMany<GanttContent> = parse_payload(input, "gantt content")?;
        self.load_content(content)
    }

    /// Unloads by key, content object, or an array of either.
    pub fn unload_content_json(&mut self, input: &str) -> ChartResult<&mut Self> {
        self.unload_content(parse_content_keys(input)?)
    }

    #[must_use]
    pub fn snapshot(&self) -> ChartSnapshot {
        let config = self.config();
        ChartSnapshot {
            kind: config.kind,
            keys: self.keys().iter().map(ToString::to_string).collect(),
            shown_targets: config.shown_targets.iter().cloned().collect(),
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            height: config.height,
            x_range: self.scales().map(|scales| scales.x.range()),
        }
    }
}

impl Timeline {
    pub fn from_json_str(input: &str, container: impl HostContainer + 'static) -> ChartResult<Self> {
        Self::new(&ChartInput::from_json_str(input)?, container)
    }

    pub fn load_content_json(&mut self, input: &str) -> ChartResult<&mut Self> {
        let content: OneOrMany<TimelineContent> = parse_payload(input, "timeline content")?;
        self.load_content(content)
    }

    pub fn unload_content_json(&mut self, input: &str) -> ChartResult<&mut Self> {
        self.unload_content(parse_content_keys(input)?)
    }

    #[must_use]
    pub fn snapshot(&self) -> ChartSnapshot {
        let config = self.config();
        ChartSnapshot {
            kind: config.kind,
            keys: self.keys().map(ToString::to_string).collect(),
            shown_targets: config.shown_targets.iter().cloned().collect(),
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            height: config.height,
            x_range: self.scales().map(|scales| scales.x.range()),
        }
    }
}

/// Parses an unload payload into keys.
pub fn parse_content_keys(input: &str) -> ChartResult<OneOrMany<ContentKey>> {
    let keys: OneOrMany<ContentKeyRef> = parse_payload(input, "content keys")?;
    Ok(OneOrMany::Many(
        keys.into_vec().into_iter().map(ContentKey::from).collect(),
    ))
}

fn parse_payload<T: DeserializeOwned>(input: &str, what: &str) -> ChartResult<T> {
    if input.trim().is_empty() {
        return Err(ChartError::NoData);
    }
    serde_json::from_str(input)
        .map_err(|e| ChartError::InvalidData(format!("failed to parse {what} json payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::{ContentKeyRef, parse_content_keys};
    use crate::api::{ChartInput, ContentKey};
    use crate::error::ChartError;

    #[test]
    fn blank_and_null_input_are_no_data() {
        assert_eq!(ChartInput::from_json_str("  "), Err(ChartError::NoData));
        assert_eq!(ChartInput::from_json_str("null"), Err(ChartError::NoData));
    }

    #[test]
    fn unload_payload_accepts_keys_and_objects() {
        let keys = parse_content_keys(r#"["a", {"key": "b", "trackLabel": {"display": "B"}}]"#)
            .expect("keys")
            .into_vec();
        assert_eq!(keys, vec![ContentKey::from("a"), ContentKey::from("b")]);

        let single: ContentKeyRef = serde_json::from_str(r#"{"key": "t1"}"#).expect("object");
        assert_eq!(ContentKey::from(single), ContentKey::from("t1"));
    }

    #[test]
    fn malformed_json_maps_to_invalid_data() {
        assert!(matches!(
            ChartInput::from_json_str("{not json"),
            Err(ChartError::InvalidData(_))
        ));
    }
}
