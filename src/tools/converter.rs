//! Converter MCP Tools
//!
//! Tools for driving converter sessions: open a session, feed it text and unit
//! selections, read back the result.

use serde::Serialize;

use crate::conversion::{self, available_units, ConversionEngine, ConversionSnapshot, LengthUnit};
use crate::session::{SessionError, SessionResult, SessionStore};

/// Unit entry for list_units
#[derive(Debug, Serialize)]
pub struct UnitInfo {
    pub id: LengthUnit,
    pub display_name: &'static str,
    pub meters_per_unit: f64,
}

/// Response for list_units
#[derive(Debug, Serialize)]
pub struct ListUnitsResponse {
    pub base_unit: LengthUnit,
    pub units: Vec<UnitInfo>,
}

/// Session state returned by every session tool
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: u64,
    #[serde(flatten)]
    pub state: ConversionSnapshot,
}

/// Session summary for listing
#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: u64,
    pub created_at: String,
    pub input_unit: LengthUnit,
    pub output_unit: LengthUnit,
    pub result: String,
    pub revision: u64,
}

/// Response for list_sessions
#[derive(Debug, Serialize)]
pub struct ListSessionsResponse {
    pub sessions: Vec<SessionSummary>,
    pub total: usize,
    pub max_sessions: usize,
}

/// Response for close_session
#[derive(Debug, Serialize)]
pub struct CloseSessionResponse {
    pub success: bool,
    pub closed_id: u64,
}

/// Optional initial state for create_session
#[derive(Debug, Default)]
pub struct SessionCreate {
    pub input_unit: Option<String>,
    pub output_unit: Option<String>,
    pub input_text: Option<String>,
}

fn snapshot_of(session_id: u64, engine: &ConversionEngine) -> SessionSnapshot {
    SessionSnapshot {
        session_id,
        state: engine.snapshot(),
    }
}

/// List the selectable units in selector order
pub fn list_units() -> ListUnitsResponse {
    ListUnitsResponse {
        base_unit: LengthUnit::M,
        units: available_units()
            .iter()
            .map(|unit| UnitInfo {
                id: *unit,
                display_name: unit.display_name(),
                meters_per_unit: unit.factor(),
            })
            .collect(),
    }
}

/// Open a new session
///
/// The initial selections are validated before anything is registered.
pub fn create_session(store: &SessionStore, data: SessionCreate) -> SessionResult<SessionSnapshot> {
    let mut engine = ConversionEngine::new();
    if let Some(unit) = data.input_unit.as_deref() {
        engine.set_input_unit(unit)?;
    }
    if let Some(unit) = data.output_unit.as_deref() {
        engine.set_output_unit(unit)?;
    }
    if let Some(text) = data.input_text {
        engine.set_input_text(text);
    }

    store
        .with_registry(|registry| {
            let session = registry.open(engine)?;
            Ok(snapshot_of(session.id, &session.engine))
        })
}

/// Replace the session's input text
pub fn set_input_text(store: &SessionStore, session_id: u64, text: String) -> SessionResult<SessionSnapshot> {
    store
        .with_engine(session_id, |engine| {
            engine.set_input_text(text);
            Ok(snapshot_of(session_id, engine))
        })
}

/// Select the session's input unit
pub fn set_input_unit(store: &SessionStore, session_id: u64, unit: &str) -> SessionResult<SessionSnapshot> {
    store
        .with_engine(session_id, |engine| {
            engine.set_input_unit(unit)?;
            Ok(snapshot_of(session_id, engine))
        })
}

/// Select the session's output unit
pub fn set_output_unit(store: &SessionStore, session_id: u64, unit: &str) -> SessionResult<SessionSnapshot> {
    store
        .with_engine(session_id, |engine| {
            engine.set_output_unit(unit)?;
            Ok(snapshot_of(session_id, engine))
        })
}

/// Read the session's current state
pub fn get_result(store: &SessionStore, session_id: u64) -> SessionResult<SessionSnapshot> {
    store
        .with_engine(session_id, |engine| Ok(snapshot_of(session_id, engine)))
}

/// List open sessions
pub fn list_sessions(store: &SessionStore) -> SessionResult<ListSessionsResponse> {
    store
        .with_registry(|registry| {
            let sessions: Vec<SessionSummary> = registry
                .iter()
                .map(|s| SessionSummary {
                    session_id: s.id,
                    created_at: s.created_at.clone(),
                    input_unit: s.engine.input_unit(),
                    output_unit: s.engine.output_unit(),
                    result: s.engine.result().to_string(),
                    revision: s.engine.revision(),
                })
                .collect();
            Ok(ListSessionsResponse {
                total: sessions.len(),
                sessions,
                max_sessions: registry.max_sessions(),
            })
        })
}

/// Close a session and discard its state
pub fn close_session(store: &SessionStore, session_id: u64) -> SessionResult<CloseSessionResponse> {
    store
        .with_registry(|registry| registry.close(session_id))
        .map(|session| CloseSessionResponse {
            success: true,
            closed_id: session.id,
        })
}

/// Stateless one-shot conversion
pub fn convert(value: &str, from_unit: &str, to_unit: &str) -> SessionResult<ConversionSnapshot> {
    conversion::convert(value, from_unit, to_unit).map_err(SessionError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(store: &SessionStore) -> u64 {
        create_session(store, SessionCreate::default()).unwrap().session_id
    }

    #[test]
    fn test_list_units() {
        let response = list_units();
        let ids: Vec<&str> = response.units.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["cm", "m", "ft", "mm"]);
        assert_eq!(response.units[2].meters_per_unit, 0.3048);
    }

    #[test]
    fn test_create_session_defaults() {
        let store = SessionStore::new(4);
        let snapshot = create_session(&store, SessionCreate::default()).unwrap();
        assert_eq!(snapshot.session_id, 1);
        assert_eq!(snapshot.state.input_unit, LengthUnit::M);
        assert_eq!(snapshot.state.output_unit, LengthUnit::M);
        assert_eq!(snapshot.state.result, "");
    }

    #[test]
    fn test_create_session_with_initial_state() {
        let store = SessionStore::new(4);
        let snapshot = create_session(
            &store,
            SessionCreate {
                input_unit: Some("ft".to_string()),
                output_unit: Some("mm".to_string()),
                input_text: Some("1".to_string()),
            },
        )
        .unwrap();
        assert_eq!(snapshot.state.result, "304.8");
    }

    #[test]
    fn test_create_session_rejects_invalid_unit() {
        let store = SessionStore::new(4);
        let err = create_session(
            &store,
            SessionCreate {
                output_unit: Some("xyz".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::Conversion(_)));
        assert!(err.to_string().contains("xyz"));
        assert_eq!(list_sessions(&store).unwrap().total, 0);
    }

    #[test]
    fn test_session_flow() {
        let store = SessionStore::new(4);
        let id = open(&store);

        set_input_unit(&store, id, "cm").unwrap();
        let snapshot = set_input_text(&store, id, "100".to_string()).unwrap();
        assert_eq!(snapshot.state.result, "1.0");

        let err = set_output_unit(&store, id, "xyz").unwrap_err();
        assert!(err.to_string().contains("Invalid unit"));

        let current = get_result(&store, id).unwrap();
        assert_eq!(current.state.output_unit, LengthUnit::M);
        assert_eq!(current.state.result, "1.0");
    }

    #[test]
    fn test_close_session() {
        let store = SessionStore::new(4);
        let id = open(&store);
        let response = close_session(&store, id).unwrap();
        assert!(response.success);
        assert!(matches!(get_result(&store, id), Err(SessionError::NotFound(_))));
        assert!(close_session(&store, id).is_err());
    }

    #[test]
    fn test_session_limit() {
        let store = SessionStore::new(1);
        open(&store);
        let err = create_session(&store, SessionCreate::default()).unwrap_err();
        assert!(matches!(err, SessionError::LimitReached(1)));
    }

    #[test]
    fn test_list_sessions() {
        let store = SessionStore::new(4);
        let a = open(&store);
        let b = open(&store);
        set_input_text(&store, b, "2".to_string()).unwrap();

        let response = list_sessions(&store).unwrap();
        assert_eq!(response.total, 2);
        assert_eq!(response.max_sessions, 4);
        assert_eq!(response.sessions[0].session_id, a);
        assert_eq!(response.sessions[1].result, "2.0");
    }

    #[test]
    fn test_convert() {
        assert_eq!(convert("2.5", "m", "ft").unwrap().result, "8.2");
        assert!(matches!(convert("1", "in", "m"), Err(SessionError::Conversion(_))));
    }

    #[test]
    fn test_snapshot_serializes_flat() {
        let store = SessionStore::new(1);
        let id = open(&store);
        let snapshot = set_input_text(&store, id, "1".to_string()).unwrap();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["session_id"], 1);
        assert_eq!(json["result"], "1.0");
        assert_eq!(json["input_unit"], "m");
    }
}
