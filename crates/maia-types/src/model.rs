//! Value objects returned by the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Kind of memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryType {
    #[default]
    Semantic,
    Episodic,
    Working,
}

impl MemoryType {
    pub fn as_str(self) -> &'static str {
        match self {
            MemoryType::Semantic => "semantic",
            MemoryType::Episodic => "episodic",
            MemoryType::Working => "working",
        }
    }
}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryType {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "semantic" => Ok(MemoryType::Semantic),
            "episodic" => Ok(MemoryType::Episodic),
            "working" => Ok(MemoryType::Working),
            _ => Err(ParseTagError::new("memory type", s)),
        }
    }
}

/// How a memory came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemorySource {
    #[default]
    User,
    Extracted,
    Inferred,
    Imported,
}

impl MemorySource {
    pub fn as_str(self) -> &'static str {
        match self {
            MemorySource::User => "user",
            MemorySource::Extracted => "extracted",
            MemorySource::Inferred => "inferred",
            MemorySource::Imported => "imported",
        }
    }
}

impl std::fmt::Display for MemorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemorySource {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MemorySource::User),
            "extracted" => Ok(MemorySource::Extracted),
            "inferred" => Ok(MemorySource::Inferred),
            "imported" => Ok(MemorySource::Imported),
            _ => Err(ParseTagError::new("memory source", s)),
        }
    }
}

/// Unknown enum tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseTagError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseTagError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// A single stored memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub id: String,
    pub namespace: String,
    pub content: String,
    #[serde(rename = "type")]
    pub memory_type: MemoryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub accessed_at: DateTime<Utc>,
    pub access_count: u64,
    /// Nominally in [0, 1]; the server owns the range check.
    pub confidence: f64,
    pub source: MemorySource,
}

/// Per-namespace settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespaceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_budget: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_memories: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_types: Option<Vec<MemoryType>>,
    #[serde(default)]
    pub inherit_from_parent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_scoring: Option<HashMap<String, f64>>,
}

/// A named partition of memories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default)]
    pub config: NamespaceConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub memory: Memory,
    pub score: f64,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub count: usize,
    pub offset: usize,
    pub limit: usize,
}

impl<T> ListResponse<T> {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T> IntoIterator for ListResponse<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

/// A memory as placed into an assembled context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMemory {
    pub id: String,
    pub content: String,
    /// Free-form on this endpoint; not restricted to [`MemoryType`].
    #[serde(rename = "type")]
    pub memory_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub position: String,
    pub token_count: u32,
    pub truncated: bool,
}

/// Used and budgeted tokens of one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneUsage {
    pub used: u32,
    pub budget: u32,
}

/// Token usage per zone of an assembled context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextZoneStats {
    pub critical_used: u32,
    pub critical_budget: u32,
    pub middle_used: u32,
    pub middle_budget: u32,
    pub recency_used: u32,
    pub recency_budget: u32,
}

impl ContextZoneStats {
    pub fn critical(&self) -> ZoneUsage {
        ZoneUsage {
            used: self.critical_used,
            budget: self.critical_budget,
        }
    }

    pub fn middle(&self) -> ZoneUsage {
        ZoneUsage {
            used: self.middle_used,
            budget: self.middle_budget,
        }
    }

    pub fn recency(&self) -> ZoneUsage {
        ZoneUsage {
            used: self.recency_used,
            budget: self.recency_budget,
        }
    }
}

/// Result of context assembly for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextResponse {
    pub content: String,
    pub memories: Vec<ContextMemory>,
    pub token_count: u32,
    pub token_budget: u32,
    pub truncated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_stats: Option<ContextZoneStats>,
    /// Server-formatted duration, e.g. `"1.2ms"`.
    pub query_time: String,
}

/// Storage statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_memories: u64,
    pub total_namespaces: u64,
    pub storage_size_bytes: u64,
    pub last_compaction: DateTime<Utc>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn memory_json() -> serde_json::Value {
        json!({
            "id": "mem-123",
            "namespace": "test",
            "content": "Test memory",
            "type": "semantic",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "accessed_at": "2024-01-01T00:00:00Z",
            "access_count": 0,
            "confidence": 1.0,
            "source": "user"
        })
    }

    #[test]
    fn memory_from_required_fields() {
        let m: Memory = serde_json::from_value(memory_json()).unwrap();
        assert_eq!(m.id, "mem-123");
        assert_eq!(m.namespace, "test");
        assert_eq!(m.content, "Test memory");
        assert_eq!(m.memory_type, MemoryType::Semantic);
        assert_eq!(m.access_count, 0);
        assert_eq!(m.confidence, 1.0);
        assert_eq!(m.source, MemorySource::User);
        assert!(m.embedding.is_none());
        assert!(m.metadata.is_none());
        assert!(m.tags.is_none());
        assert_eq!(m.created_at.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn memory_serializes_without_unset_optionals() {
        let m: Memory = serde_json::from_value(memory_json()).unwrap();
        let v = serde_json::to_value(&m).unwrap();
        let obj = v.as_object().unwrap();
        assert!(!obj.contains_key("embedding"));
        assert!(!obj.contains_key("metadata"));
        assert!(!obj.contains_key("tags"));
        assert_eq!(obj["type"], "semantic");
    }

    #[test]
    fn memory_with_optionals() {
        let mut j = memory_json();
        j["embedding"] = json!([0.1, 0.2]);
        j["tags"] = json!(["a", "b"]);
        j["metadata"] = json!({"k": 1});
        j["type"] = json!("episodic");
        j["source"] = json!("imported");
        let m: Memory = serde_json::from_value(j).unwrap();
        assert_eq!(m.embedding.as_deref(), Some(&[0.1_f32, 0.2][..]));
        assert_eq!(m.tags.unwrap(), vec!["a", "b"]);
        assert_eq!(m.metadata.unwrap()["k"], json!(1));
        assert_eq!(m.memory_type, MemoryType::Episodic);
        assert_eq!(m.source, MemorySource::Imported);
    }

    #[test]
    fn unknown_memory_type_rejected() {
        let mut j = memory_json();
        j["type"] = json!("procedural");
        assert!(serde_json::from_value::<Memory>(j).is_err());
    }

    #[test]
    fn enum_tags_parse_and_display() {
        assert_eq!("Working".parse::<MemoryType>().unwrap(), MemoryType::Working);
        assert_eq!(MemoryType::Episodic.to_string(), "episodic");
        assert_eq!("inferred".parse::<MemorySource>().unwrap(), MemorySource::Inferred);
        let err = "bogus".parse::<MemorySource>().unwrap_err();
        assert_eq!(err.to_string(), "unknown memory source: bogus");
    }

    #[test]
    fn namespace_config_defaults() {
        let ns: Namespace = serde_json::from_value(json!({
            "id": "ns-1",
            "name": "default",
            "config": {},
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(ns.config, NamespaceConfig::default());
        assert!(!ns.config.inherit_from_parent);
        assert!(ns.parent.is_none());

        let v = serde_json::to_value(&ns.config).unwrap();
        assert_eq!(v, json!({"inherit_from_parent": false}));
    }

    #[test]
    fn context_response_zone_accessors() {
        let ctx: ContextResponse = serde_json::from_value(json!({
            "content": "User prefers dark mode",
            "memories": [{
                "id": "mem-1",
                "content": "User prefers dark mode",
                "type": "semantic",
                "score": 0.9,
                "position": "critical",
                "token_count": 5,
                "truncated": false
            }],
            "token_count": 5,
            "token_budget": 2000,
            "truncated": false,
            "zone_stats": {
                "critical_used": 5, "critical_budget": 300,
                "middle_used": 0, "middle_budget": 1300,
                "recency_used": 0, "recency_budget": 400
            },
            "query_time": "1.5ms"
        }))
        .unwrap();
        assert_eq!(ctx.memories[0].memory_type, "semantic");
        assert_eq!(ctx.memories[0].score, Some(0.9));
        let zones = ctx.zone_stats.unwrap();
        assert_eq!(zones.critical(), ZoneUsage { used: 5, budget: 300 });
        assert_eq!(zones.middle().budget, 1300);
        assert_eq!(zones.recency().budget, 400);
    }

    #[test]
    fn list_response_is_generic() {
        let page: ListResponse<SearchResult> = serde_json::from_value(json!({
            "data": [{"memory": memory_json(), "score": 0.5}],
            "count": 1,
            "offset": 0,
            "limit": 10
        }))
        .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.iter().next().unwrap().memory.id, "mem-123");
        let ids: Vec<String> = page.into_iter().map(|r| r.memory.id).collect();
        assert_eq!(ids, vec!["mem-123"]);
    }
}
