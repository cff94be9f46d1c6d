//! MCP ServerHandler implementation for SkillService.
//!
//! - `list_resources()` - lists every resolved skill as `skill://<name>`
//! - `read_resource()` - returns a skill's SKILL.md with location metadata
//! - `list_tools()` - the `skill`, `list-skills` and `refresh-skills` tools
//! - `call_tool()` - dispatches tool calls to specific handlers

use crate::app::tools::skill_name_arg;
use crate::app::SkillService;
use crate::tool_schemas::skill_tools;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, InitializeResult, ListResourcesResult, ListToolsResult,
    PaginatedRequestParam, ReadResourceRequestParam, ReadResourceResult, ServerCapabilities,
};
use rmcp::ServerHandler;

impl ServerHandler for SkillService {
    /// List all available skill resources.
    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, rmcp::ErrorData>> + Send + '_
    {
        std::future::ready(Ok(ListResourcesResult {
            resources: self.list_resources_payload(),
            next_cursor: None,
        }))
    }

    /// Read the content of a specific resource identified by its URI.
    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, rmcp::ErrorData>> + Send + '_
    {
        let result = match self.read_resource_sync(&request.uri) {
            Ok(Some(result)) => Ok(result),
            Ok(None) => Err(rmcp::ErrorData::resource_not_found(
                format!("skill not found: {}", request.uri),
                None,
            )),
            Err(e) => Err(rmcp::ErrorData::internal_error(format!("{e:#}"), None)),
        };
        std::future::ready(result)
    }

    /// Lists the tools provided by this service.
    ///
    /// The `skill` tool's description is rebuilt from the current snapshot on
    /// every call so clients see newly installed skills.
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, rmcp::ErrorData>> + Send + '_
    {
        std::future::ready(Ok(ListToolsResult {
            tools: skill_tools(self.skill_tool_description()),
            next_cursor: None,
        }))
    }

    /// Executes a specific tool identified by `request.name`.
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, rmcp::ErrorData>> + Send + '_
    {
        Box::pin(async move {
            let args = request.arguments.unwrap_or_default();
            match request.name.as_ref() {
                "skill" => {
                    let name = skill_name_arg(&args)
                        .map_err(|msg| rmcp::ErrorData::invalid_params(msg, None))?;
                    Ok(self.skill_tool(name))
                }
                "list-skills" => Ok(self.list_skills_tool()),
                "refresh-skills" => Ok(self.refresh_skills_tool().await),
                other => Err(rmcp::ErrorData::invalid_params(
                    format!("unknown tool {other}"),
                    None,
                )),
            }
        })
    }

    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            capabilities: ServerCapabilities {
                resources: Some(Default::default()),
                tools: Some(Default::default()),
                ..Default::default()
            },
            instructions: Some(
                "Skills discovered from ./.agent/skills, ./.claude/skills, ~/.agent/skills and \
                 ~/.claude/skills. Call the `skill` tool with a name to load its instructions."
                    .into(),
            ),
            ..Default::default()
        }
    }
}
