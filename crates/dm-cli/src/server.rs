use std::sync::Arc;

use dm_core::{Arcana, BirthDate, build_matrix, compose, describe, pair_id};
use dm_store::{DataDir, HistoryEntry};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct DmServer {
    state: Arc<Mutex<DataDir>>,
    tool_router: ToolRouter<Self>,
}

impl DmServer {
    pub fn new(data: DataDir) -> Self {
        Self {
            state: Arc::new(Mutex::new(data)),
            tool_router: Self::tool_router(),
        }
    }
}

fn date_param(input: &str) -> Result<BirthDate, McpError> {
    BirthDate::parse_input(input).map_err(|e| McpError::invalid_params(e.to_string(), None))
}

fn arcana_param(n: u8) -> Result<Arcana, McpError> {
    Arcana::new(n).map_err(|e| McpError::invalid_params(e.to_string(), None))
}

fn json_result(value: &serde_json::Value) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(value).unwrap_or_default(),
    )])
}

fn entry_json(e: &HistoryEntry) -> serde_json::Value {
    serde_json::json!({
        "id": e.id.to_string(),
        "name": e.person_name,
        "birthDate": e.birth_date.to_display(),
        "mainArcana": e.matrix.main_arcana().get(),
        "isFavorite": e.is_favorite,
        "createdAt": e.created_at,
    })
}

#[derive(Debug, Deserialize, JsonSchema)]
struct MatrixRequest {
    /// Birth date as YYYY-MM-DD or DD.MM.YYYY
    date: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CompatibilityRequest {
    /// First partner's birth date
    date1: String,
    /// Second partner's birth date
    date2: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ArcanaRequest {
    /// Arcana number, 1 to 22
    number: u8,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CelebritiesRequest {
    /// Arcana number to match. Ignored when `date` is given.
    arcana: Option<u8>,
    /// Birth date whose main arcana should be matched
    date: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SaveMatrixRequest {
    /// Birth date to compute and save
    date: String,
    /// Person's name (blank is stored as "Unnamed")
    name: Option<String>,
    /// History owner; defaults to the configured owner
    owner: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct HistoryRequest {
    /// Case-insensitive filter on name or date
    query: Option<String>,
    /// Only favourites
    favorites: Option<bool>,
    /// History owner; defaults to the configured owner
    owner: Option<String>,
}

#[tool_router]
impl DmServer {
    #[tool(
        description = "Compute the personal destiny matrix for a birth date. Returns every point (1..=22), the main arcana and its description."
    )]
    async fn dm_matrix(
        &self,
        Parameters(req): Parameters<MatrixRequest>,
    ) -> Result<CallToolResult, McpError> {
        let date = date_param(&req.date)?;
        let matrix = build_matrix(date);
        let main = matrix.main_arcana();
        Ok(json_result(&serde_json::json!({
            "birthDate": date.to_display(),
            "mainArcana": main.get(),
            "description": describe(main),
            "matrix": matrix,
        })))
    }

    #[tool(
        description = "Compute the compatibility matrix of two birth dates. Order of the dates does not matter."
    )]
    async fn dm_compatibility(
        &self,
        Parameters(req): Parameters<CompatibilityRequest>,
    ) -> Result<CallToolResult, McpError> {
        let a = date_param(&req.date1)?;
        let b = date_param(&req.date2)?;
        let matrix = compose(&build_matrix(a), &build_matrix(b));
        Ok(json_result(&serde_json::json!({
            "pairId": pair_id(a, b),
            "matrix": matrix,
        })))
    }

    #[tool(description = "Describe one arcana: name, meaning, strengths and weaknesses.")]
    async fn dm_arcana(
        &self,
        Parameters(req): Parameters<ArcanaRequest>,
    ) -> Result<CallToolResult, McpError> {
        let arcana = arcana_param(req.number)?;
        Ok(json_result(&serde_json::json!(describe(arcana))))
    }

    #[tool(
        description = "List public figures sharing a main arcana, given either the arcana number or a birth date."
    )]
    async fn dm_celebrities(
        &self,
        Parameters(req): Parameters<CelebritiesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let arcana = match (&req.date, req.arcana) {
            (Some(date), _) => build_matrix(date_param(date)?).main_arcana(),
            (None, Some(n)) => arcana_param(n)?,
            (None, None) => {
                return Err(McpError::invalid_params(
                    "either `arcana` or `date` is required",
                    None,
                ));
            }
        };
        let state = self.state.lock().await;
        let records = state
            .store()
            .celebrities_by_arcana(arcana)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(json_result(&serde_json::json!({
            "arcana": arcana.get(),
            "celebrities": records,
        })))
    }

    #[tool(
        description = "Compute a matrix and save it to history. Saving the same birth date twice returns the existing entry."
    )]
    async fn dm_save_matrix(
        &self,
        Parameters(req): Parameters<SaveMatrixRequest>,
    ) -> Result<CallToolResult, McpError> {
        let date = date_param(&req.date)?;
        let state = self.state.lock().await;
        let owner = state.owner(req.owner.as_deref()).to_string();
        let outcome = state
            .store()
            .save_matrix(
                &owner,
                req.name.as_deref().unwrap_or(""),
                date,
                &build_matrix(date),
            )
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(json_result(&serde_json::json!({
            "id": outcome.id().to_string(),
            "saved": outcome.is_new(),
        })))
    }

    #[tool(description = "List saved matrices, newest first, optionally filtered.")]
    async fn dm_history(
        &self,
        Parameters(req): Parameters<HistoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        let state = self.state.lock().await;
        let owner = state.owner(req.owner.as_deref()).to_string();
        let store = state.store();
        let listed = if req.favorites.unwrap_or(false) {
            store.list_favorites(&owner)
        } else {
            store.search_history(&owner, req.query.as_deref().unwrap_or(""))
        };
        let entries = listed.map_err(|e| McpError::internal_error(e.to_string(), None))?;

        let items: Vec<_> = entries.iter().map(entry_json).collect();
        Ok(json_result(&serde_json::json!({
            "owner": owner,
            "count": items.len(),
            "entries": items,
        })))
    }
}

#[tool_handler]
impl ServerHandler for DmServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Destiny matrix calculator.\n\n\
                 - dm_matrix turns a birth date into 32 arcana points on two squares.\n\
                 - dm_compatibility merges two people's matrices point by point.\n\
                 - dm_arcana explains a single number from 1 to 22.\n\
                 - dm_celebrities finds public figures with the same main arcana.\n\
                 - dm_save_matrix and dm_history manage the saved history.\n\n\
                 Dates must be real calendar dates after 1900 and before today."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_server() -> DmServer {
        DmServer::new(DataDir::open_in_memory().unwrap())
    }

    fn text_from_result(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| match &c.raw {
                RawContent::Text(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    fn parse_result(result: &CallToolResult) -> serde_json::Value {
        let text = text_from_result(result);
        serde_json::from_str(&text).expect("handler should return valid JSON")
    }

    #[tokio::test]
    async fn test_dm_matrix() {
        let server = make_server();
        let result = server
            .dm_matrix(Parameters(MatrixRequest {
                date: "01.06.1926".into(),
            }))
            .await
            .unwrap();
        let json = parse_result(&result);
        assert_eq!(json["mainArcana"], 5);
        assert_eq!(json["description"]["name"], "The Hierophant");
        assert_eq!(json["matrix"]["personal"]["right"], 18);
        assert_eq!(json["matrix"]["wellbeing"]["pAy"], 12);
    }

    #[tokio::test]
    async fn test_dm_matrix_rejects_bad_date() {
        let server = make_server();
        let err = server
            .dm_matrix(Parameters(MatrixRequest {
                date: "31.02.1990".into(),
            }))
            .await
            .unwrap_err();
        assert!(err.message.contains("does not exist"));
    }

    #[tokio::test]
    async fn test_dm_matrix_accepts_bare_digits() {
        let server = make_server();
        let result = server
            .dm_matrix(Parameters(MatrixRequest {
                date: "01061926".into(),
            }))
            .await
            .unwrap();
        assert_eq!(parse_result(&result)["mainArcana"], 5);
    }

    #[tokio::test]
    async fn test_dm_compatibility_is_symmetric() {
        let server = make_server();
        let ab = server
            .dm_compatibility(Parameters(CompatibilityRequest {
                date1: "01.06.1926".into(),
                date2: "02.09.1964".into(),
            }))
            .await
            .unwrap();
        let ba = server
            .dm_compatibility(Parameters(CompatibilityRequest {
                date1: "1964-09-02".into(),
                date2: "1926-06-01".into(),
            }))
            .await
            .unwrap();
        let (ab, ba) = (parse_result(&ab), parse_result(&ba));
        assert_eq!(ab, ba);
        assert_eq!(ab["pairId"], "1926-06-01_1964-09-02");
        assert_eq!(ab["matrix"]["personal"]["right"], 16);
    }

    #[tokio::test]
    async fn test_dm_arcana() {
        let server = make_server();
        let json = parse_result(
            &server
                .dm_arcana(Parameters(ArcanaRequest { number: 22 }))
                .await
                .unwrap(),
        );
        assert_eq!(json["name"], "The Fool");

        assert!(
            server
                .dm_arcana(Parameters(ArcanaRequest { number: 0 }))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_dm_celebrities_by_date() {
        let server = make_server();
        let json = parse_result(
            &server
                .dm_celebrities(Parameters(CelebritiesRequest {
                    arcana: None,
                    date: Some("01.06.1926".into()),
                }))
                .await
                .unwrap(),
        );
        assert_eq!(json["arcana"], 5);
        let names: Vec<_> = json["celebrities"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect();
        assert!(names.contains(&"Marilyn Monroe".to_string()));
    }

    #[tokio::test]
    async fn test_dm_celebrities_needs_input() {
        let server = make_server();
        let result = server
            .dm_celebrities(Parameters(CelebritiesRequest {
                arcana: None,
                date: None,
            }))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_save_then_history() {
        let server = make_server();
        let save = |name: &str| SaveMatrixRequest {
            date: "02.09.1964".into(),
            name: Some(name.into()),
            owner: None,
        };
        let first = parse_result(&server.dm_save_matrix(Parameters(save("Keanu"))).await.unwrap());
        assert_eq!(first["saved"], true);
        let again = parse_result(&server.dm_save_matrix(Parameters(save("K"))).await.unwrap());
        assert_eq!(again["saved"], false);
        assert_eq!(again["id"], first["id"]);

        let history = parse_result(
            &server
                .dm_history(Parameters(HistoryRequest {
                    query: Some("kea".into()),
                    favorites: None,
                    owner: None,
                }))
                .await
                .unwrap(),
        );
        assert_eq!(history["owner"], "local");
        assert_eq!(history["count"], 1);
        assert_eq!(history["entries"][0]["mainArcana"], 8);
        assert_eq!(history["entries"][0]["birthDate"], "02.09.1964");
    }

    #[test]
    fn test_tool_registration() {
        let server = make_server();
        let info = server.get_info();
        assert!(info.instructions.is_some());
        assert!(info.capabilities.tools.is_some());
    }
}
