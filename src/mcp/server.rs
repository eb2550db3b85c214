//! ULC MCP Server Implementation
//!
//! Exposes converter sessions as MCP tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::session::{SessionError, SessionStore};
use crate::tools::converter::{self, SessionCreate};
use crate::tools::status::StatusTracker;

/// ULC MCP Service
#[derive(Clone)]
pub struct UlcService {
    status_tracker: Arc<StatusTracker>,
    sessions: SessionStore,
    tool_router: ToolRouter<UlcService>,
}

impl UlcService {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            status_tracker: Arc::new(StatusTracker::new()),
            sessions: SessionStore::new(config.max_sessions),
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateSessionParams {
    /// Initial input unit: cm, m, ft or mm (default m)
    pub input_unit: Option<String>,
    /// Initial output unit: cm, m, ft or mm (default m)
    pub output_unit: Option<String>,
    /// Initial input text
    pub input_text: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SessionIdParams {
    /// Session ID returned by create_session
    pub session_id: u64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetInputTextParams {
    pub session_id: u64,
    /// Raw text as typed; non-numeric text converts as 0
    pub text: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetUnitParams {
    pub session_id: u64,
    /// Unit id: cm, m, ft or mm
    pub unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertParams {
    /// Value to convert, as text
    pub value: String,
    pub from_unit: String,
    pub to_unit: String,
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Caller mistakes become invalid_params, store failures internal_error
fn to_mcp_error(e: SessionError) -> McpError {
    match e {
        SessionError::NotFound(_) | SessionError::LimitReached(_) | SessionError::Conversion(_) => {
            McpError::invalid_params(e.to_string(), None)
        }
        SessionError::LockPoisoned => McpError::internal_error(e.to_string(), None),
    }
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl UlcService {
    // --- Status ---

    #[tool(description = "Get the current status of the ULC service including build info, open sessions, and process information")]
    fn ulc_status(&self) -> Result<CallToolResult, McpError> {
        let (active, max) = self
            .sessions
            .with_registry(|r| Ok((r.len(), r.max_sessions())))
            .map_err(to_mcp_error)?;
        to_json(&self.status_tracker.get_status(active, max))
    }

    #[tool(description = "Get instructions for using the converter tools. Call this when unsure how sessions or unit ids work.")]
    fn converter_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::CONVERTER_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(CONVERTER_INSTRUCTIONS)]))
    }

    // --- Units ---

    #[tool(description = "List the selectable length units in order (cm, m, ft, mm) with their meters-per-unit factors")]
    fn list_units(&self) -> Result<CallToolResult, McpError> {
        to_json(&converter::list_units())
    }

    #[tool(description = "Convert a value between two units without opening a session")]
    fn convert(&self, Parameters(p): Parameters<ConvertParams>) -> Result<CallToolResult, McpError> {
        let result = converter::convert(&p.value, &p.from_unit, &p.to_unit).map_err(to_mcp_error)?;
        to_json(&result)
    }

    // --- Sessions ---

    #[tool(description = "Open a converter session. Both units default to m and the input text to empty.")]
    fn create_session(&self, Parameters(p): Parameters<CreateSessionParams>) -> Result<CallToolResult, McpError> {
        let data = SessionCreate {
            input_unit: p.input_unit,
            output_unit: p.output_unit,
            input_text: p.input_text,
        };
        let result = converter::create_session(&self.sessions, data).map_err(to_mcp_error)?;
        to_json(&result)
    }

    #[tool(description = "Set the session's input text and return the recomputed result")]
    fn set_input_text(&self, Parameters(p): Parameters<SetInputTextParams>) -> Result<CallToolResult, McpError> {
        let result = converter::set_input_text(&self.sessions, p.session_id, p.text).map_err(to_mcp_error)?;
        to_json(&result)
    }

    #[tool(description = "Select the session's input unit and return the recomputed result. Invalid units leave the session unchanged.")]
    fn set_input_unit(&self, Parameters(p): Parameters<SetUnitParams>) -> Result<CallToolResult, McpError> {
        let result = converter::set_input_unit(&self.sessions, p.session_id, &p.unit).map_err(to_mcp_error)?;
        to_json(&result)
    }

    #[tool(description = "Select the session's output unit and return the recomputed result. Invalid units leave the session unchanged.")]
    fn set_output_unit(&self, Parameters(p): Parameters<SetUnitParams>) -> Result<CallToolResult, McpError> {
        let result = converter::set_output_unit(&self.sessions, p.session_id, &p.unit).map_err(to_mcp_error)?;
        to_json(&result)
    }

    #[tool(description = "Get the session's current input, units, result and revision")]
    fn get_result(&self, Parameters(p): Parameters<SessionIdParams>) -> Result<CallToolResult, McpError> {
        let result = converter::get_result(&self.sessions, p.session_id).map_err(to_mcp_error)?;
        to_json(&result)
    }

    #[tool(description = "List open converter sessions")]
    fn list_sessions(&self) -> Result<CallToolResult, McpError> {
        let result = converter::list_sessions(&self.sessions).map_err(to_mcp_error)?;
        to_json(&result)
    }

    #[tool(description = "Close a converter session and discard its state")]
    fn close_session(&self, Parameters(p): Parameters<SessionIdParams>) -> Result<CallToolResult, McpError> {
        let result = converter::close_session(&self.sessions, p.session_id).map_err(to_mcp_error)?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for UlcService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "ulc".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Unit Length Converter".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Unit Length Converter (ULC) - live conversion between cm, m, ft and mm. \
                 Call converter_instructions for details. \
                 One-shot: convert. Units: list_units. \
                 Sessions: create_session, set_input_text, set_input_unit, set_output_unit, \
                 get_result, list_sessions, close_session. Status: ulc_status."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    fn service() -> UlcService {
        UlcService::new(&ServerConfig { max_sessions: 2 })
    }

    #[test]
    fn test_server_info() {
        let info = service().get_info();
        assert_eq!(info.server_info.name, "ulc");
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_session_tools() {
        let svc = service();
        svc.create_session(Parameters(CreateSessionParams {
            input_unit: Some("cm".to_string()),
            output_unit: None,
            input_text: None,
        }))
        .unwrap();

        let result = svc.set_input_text(Parameters(SetInputTextParams {
            session_id: 1,
            text: "100".to_string(),
        }));
        assert!(result.is_ok());

        let rejected = svc.set_output_unit(Parameters(SetUnitParams {
            session_id: 1,
            unit: "xyz".to_string(),
        }));
        assert!(rejected.is_err());

        assert!(svc.close_session(Parameters(SessionIdParams { session_id: 1 })).is_ok());
        assert!(svc.get_result(Parameters(SessionIdParams { session_id: 1 })).is_err());
    }

    #[test]
    fn test_convert_tool_rejects_unknown_unit() {
        let svc = service();
        let err = svc
            .convert(Parameters(ConvertParams {
                value: "1".to_string(),
                from_unit: "m".to_string(),
                to_unit: "yd".to_string(),
            }))
            .unwrap_err();
        assert!(err.message.contains("yd"));
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn test_poisoned_store_is_internal_error() {
        let svc = service();
        svc.create_session(Parameters(CreateSessionParams {
            input_unit: None,
            output_unit: None,
            input_text: None,
        }))
        .unwrap();

        let sessions = svc.sessions.clone();
        let _ = std::thread::spawn(move || {
            let _ = sessions.with_registry(|_| -> crate::session::SessionResult<()> {
                panic!("poison the store")
            });
        })
        .join();

        let err = svc
            .get_result(Parameters(SessionIdParams { session_id: 1 }))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);

        let err = svc
            .set_input_text(Parameters(SetInputTextParams {
                session_id: 1,
                text: "1".to_string(),
            }))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }

    #[test]
    fn test_missing_session_is_invalid_params() {
        let err = service()
            .get_result(Parameters(SessionIdParams { session_id: 42 }))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }
}
