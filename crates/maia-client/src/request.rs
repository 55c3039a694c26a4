//! Per-operation validation and request construction.
//!
//! Both facades go through these functions, so input checks and wire shapes
//! live in one place regardless of how the request is eventually sent.

use crate::error::{Result, ValidationError};
use maia_types::{
    CreateMemoryInput, CreateNamespaceInput, GetContextInput, ListOptions, SearchMemoriesInput,
    UpdateMemoryInput, UpdateNamespaceInput,
};
use reqwest::Method;
use serde::Serialize;

/// Transport-agnostic description of one API call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub query: Vec<(&'static str, String)>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
        }
    }

    fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    fn page(mut self, options: Option<&ListOptions>) -> Self {
        if let Some(opts) = options {
            // Zero reads as "unset".
            if let Some(limit) = opts.limit.filter(|n| *n > 0) {
                self.query.push(("limit", limit.to_string()));
            }
            if let Some(offset) = opts.offset.filter(|n| *n > 0) {
                self.query.push(("offset", offset.to_string()));
            }
        }
        self
    }
}

fn require(field: &str, value: &str) -> std::result::Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Percent-encode a single path segment, `/` included.
fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

pub(crate) fn health() -> ApiRequest {
    ApiRequest::new(Method::GET, "/health")
}

pub(crate) fn ready() -> ApiRequest {
    ApiRequest::new(Method::GET, "/ready")
}

pub(crate) fn stats() -> ApiRequest {
    ApiRequest::new(Method::GET, "/v1/stats")
}

pub(crate) fn create_memory(input: &CreateMemoryInput) -> Result<ApiRequest> {
    require("namespace", &input.namespace)?;
    require("content", &input.content)?;
    ApiRequest::new(Method::POST, "/v1/memories").json(input)
}

pub(crate) fn get_memory(id: &str) -> Result<ApiRequest> {
    require("id", id)?;
    Ok(ApiRequest::new(
        Method::GET,
        format!("/v1/memories/{}", segment(id)),
    ))
}

pub(crate) fn update_memory(id: &str, input: &UpdateMemoryInput) -> Result<ApiRequest> {
    require("id", id)?;
    ApiRequest::new(Method::PUT, format!("/v1/memories/{}", segment(id))).json(input)
}

pub(crate) fn delete_memory(id: &str) -> Result<ApiRequest> {
    require("id", id)?;
    Ok(ApiRequest::new(
        Method::DELETE,
        format!("/v1/memories/{}", segment(id)),
    ))
}

pub(crate) fn search_memories(input: Option<&SearchMemoriesInput>) -> Result<ApiRequest> {
    let req = ApiRequest::new(Method::POST, "/v1/memories/search");
    match input {
        Some(input) => req.json(input),
        None => req.json(&SearchMemoriesInput::default()),
    }
}

pub(crate) fn create_namespace(input: &CreateNamespaceInput) -> Result<ApiRequest> {
    require("name", &input.name)?;
    ApiRequest::new(Method::POST, "/v1/namespaces").json(input)
}

pub(crate) fn get_namespace(id_or_name: &str) -> Result<ApiRequest> {
    if id_or_name.is_empty() {
        return Err(ValidationError::new("id_or_name", "id or name is required").into());
    }
    Ok(ApiRequest::new(
        Method::GET,
        format!("/v1/namespaces/{}", segment(id_or_name)),
    ))
}

pub(crate) fn update_namespace(id: &str, input: &UpdateNamespaceInput) -> Result<ApiRequest> {
    require("id", id)?;
    ApiRequest::new(Method::PUT, format!("/v1/namespaces/{}", segment(id))).json(input)
}

pub(crate) fn delete_namespace(id: &str) -> Result<ApiRequest> {
    require("id", id)?;
    Ok(ApiRequest::new(
        Method::DELETE,
        format!("/v1/namespaces/{}", segment(id)),
    ))
}

pub(crate) fn list_namespaces(options: Option<&ListOptions>) -> ApiRequest {
    ApiRequest::new(Method::GET, "/v1/namespaces").page(options)
}

pub(crate) fn list_namespace_memories(
    namespace: &str,
    options: Option<&ListOptions>,
) -> Result<ApiRequest> {
    require("namespace", namespace)?;
    Ok(ApiRequest::new(
        Method::GET,
        format!("/v1/namespaces/{}/memories", segment(namespace)),
    )
    .page(options))
}

pub(crate) fn get_context(input: &GetContextInput) -> Result<ApiRequest> {
    require("query", &input.query)?;
    ApiRequest::new(Method::POST, "/v1/context").json(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;

    fn field_of(err: Error) -> String {
        match err {
            Error::Validation(v) => v.field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_memory_requires_namespace_then_content() {
        let err = create_memory(&CreateMemoryInput::new("", "Test")).unwrap_err();
        assert_eq!(field_of(err), "namespace");
        let err = create_memory(&CreateMemoryInput::new("test", "")).unwrap_err();
        assert_eq!(field_of(err), "content");
    }

    #[test]
    fn identifier_operations_require_id() {
        assert_eq!(field_of(get_memory("").unwrap_err()), "id");
        assert_eq!(
            field_of(update_memory("", &UpdateMemoryInput::default()).unwrap_err()),
            "id"
        );
        assert_eq!(field_of(delete_memory("").unwrap_err()), "id");
        assert_eq!(field_of(get_namespace("").unwrap_err()), "id_or_name");
        assert_eq!(
            field_of(update_namespace("", &UpdateNamespaceInput::default()).unwrap_err()),
            "id"
        );
        assert_eq!(field_of(delete_namespace("").unwrap_err()), "id");
        assert_eq!(
            field_of(list_namespace_memories("", None).unwrap_err()),
            "namespace"
        );
        assert_eq!(
            field_of(create_namespace(&CreateNamespaceInput::default()).unwrap_err()),
            "name"
        );
        assert_eq!(
            field_of(get_context(&GetContextInput::default()).unwrap_err()),
            "query"
        );
    }

    #[test]
    fn identifiers_are_percent_encoded() {
        let req = get_memory("a/b c?").unwrap();
        assert_eq!(req.path, "/v1/memories/a%2Fb%20c%3F");
        let req = list_namespace_memories("team/alpha", None).unwrap();
        assert_eq!(req.path, "/v1/namespaces/team%2Falpha/memories");
    }

    #[test]
    fn pagination_only_when_present() {
        assert!(list_namespaces(None).query.is_empty());
        assert!(list_namespaces(Some(&ListOptions::new())).query.is_empty());
        let req = list_namespaces(Some(&ListOptions::new().limit(10)));
        assert_eq!(req.query, vec![("limit", "10".to_string())]);
        let req = list_namespaces(Some(&ListOptions::new().limit(5).offset(20)));
        assert_eq!(
            req.query,
            vec![("limit", "5".to_string()), ("offset", "20".to_string())]
        );
        let req = list_namespaces(Some(&ListOptions::new().limit(0).offset(0)));
        assert!(req.query.is_empty());
    }

    #[test]
    fn absent_search_input_is_empty_filter() {
        let req = search_memories(None).unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "/v1/memories/search");
        assert_eq!(req.body, Some(json!({})));
    }

    #[test]
    fn create_memory_body_matches_input() {
        let req = create_memory(&CreateMemoryInput::new("default", "likes tea")).unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(
            req.body,
            Some(json!({"namespace": "default", "content": "likes tea"}))
        );
    }

    #[test]
    fn bodiless_requests() {
        for req in [health(), ready(), stats(), delete_memory("m").unwrap()] {
            assert!(req.body.is_none());
            assert!(req.query.is_empty());
        }
        assert_eq!(stats().path, "/v1/stats");
    }
}
