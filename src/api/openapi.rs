//! OpenAPI documentation and schema generation
//!
//! Defines the OpenAPI specification for the vidgrab REST API using utoipa
//! for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the vidgrab REST API
///
/// Served as JSON from `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "vidgrab REST API",
        version = "0.1.0",
        description = "Look up video metadata and download a chosen format with streamed progress",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        crate::api::routes::video_info,
        crate::api::routes::download,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::types::VideoInfoRequest,
        crate::types::DownloadRequest,
        crate::types::VideoInfo,
        crate::types::FormatInfo,

        crate::config::Config,
        crate::config::DownloadConfig,
        crate::config::ToolsConfig,
        crate::config::FileCollisionAction,
        crate::config::ProgressMode,
        crate::config::ServerIntegrationConfig,
        crate::config::ApiConfig,

        crate::error::ApiError,
    )),
    tags(
        (name = "video", description = "Metadata lookup for a video URL"),
        (name = "download", description = "Download a format with newline-delimited JSON progress"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec"),
    )
)]
pub struct ApiDoc;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_has_endpoints() {
        let spec = ApiDoc::openapi();

        for path in ["/video-info", "/download", "/health", "/openapi.json"] {
            assert!(
                spec.paths.paths.contains_key(path),
                "OpenAPI spec should document {path}"
            );
        }
    }

    #[test]
    fn test_openapi_spec_has_schemas() {
        let spec = ApiDoc::openapi();
        let components = spec.components.expect("components should be defined");

        for schema in ["VideoInfo", "FormatInfo", "DownloadRequest", "ApiError"] {
            assert!(
                components.schemas.contains_key(schema),
                "missing schema {schema}"
            );
        }
    }

    #[test]
    fn test_openapi_spec_has_tags() {
        let spec = ApiDoc::openapi();
        let tags = spec.tags.expect("tags should be defined");

        let tag_names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tag_names, vec!["video", "download", "system"]);
    }

    #[test]
    fn test_openapi_spec_info() {
        let spec = ApiDoc::openapi();

        assert_eq!(spec.info.title, "vidgrab REST API");
        assert!(spec.info.description.is_some());
    }

    #[test]
    fn test_openapi_spec_version() {
        let json = serde_json::to_value(ApiDoc::openapi()).expect("Should serialize to JSON");
        let version = json.get("openapi").and_then(|v| v.as_str());
        assert!(
            version.unwrap().starts_with("3."),
            "Should use OpenAPI 3.x version"
        );
    }
}
