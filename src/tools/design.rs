//! Document tools: requirements, tech designs, interaction and API specs, tech design rules.

use crate::error::ApiError;
use crate::tools::context::{parse_args, ToolContext};
use crate::tools::registry::{object_schema, project_root_property, ToolSpec};
use crate::workspace::{document_stem, DocKind, DocumentLookup};
use serde::Deserialize;
use serde_json::{json, Value};

fn document_schema(what: &str) -> Value {
    object_schema(
        json!({
            "projectRoot": project_root_property(),
            "name": {
                "type": "string",
                "description": format!("{} name (without the .md suffix)", what)
            }
        }),
        &["name"],
    )
}

pub(crate) fn tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "get_requirement",
            description: "Read a requirement document from .aiwork/requirements/.",
            input_schema: || document_schema("Requirement document"),
            handler: |ctx, args| read_document(ctx, DocKind::Requirement, args),
        },
        ToolSpec {
            name: "get_tech_design",
            description: "Read a technical design document from .aiwork/designs/.",
            input_schema: || document_schema("Tech design"),
            handler: |ctx, args| read_document(ctx, DocKind::Design, args),
        },
        ToolSpec {
            name: "get_interaction_spec",
            description: "Read an interaction document from .aiwork/interactions/.",
            input_schema: || document_schema("Interaction document"),
            handler: |ctx, args| read_document(ctx, DocKind::Interaction, args),
        },
        ToolSpec {
            name: "get_api_spec",
            description: "Read an API document from .aiwork/api/.",
            input_schema: || document_schema("API document"),
            handler: |ctx, args| read_document(ctx, DocKind::Api, args),
        },
        ToolSpec {
            name: "save_document",
            description: "Save a requirement, tech design, interaction or API document into the \
                .aiwork/ workspace.",
            input_schema: || {
                object_schema(
                    json!({
                        "projectRoot": project_root_property(),
                        "type": {
                            "type": "string",
                            "description": "Document type: requirement, design, interaction, api"
                        },
                        "name": { "type": "string", "description": "Document name (without the .md suffix)" },
                        "content": { "type": "string", "description": "Document content" }
                    }),
                    &["type", "name", "content"],
                )
            },
            handler: save_document,
        },
        ToolSpec {
            name: "get_tech_design_rules",
            description: "Read the template and conventions used to write technical designs.",
            input_schema: || object_schema(json!({ "projectRoot": project_root_property() }), &[]),
            handler: get_tech_design_rules,
        },
    ]
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentArgs {
    project_root: Option<String>,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveDocumentArgs {
    project_root: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    name: String,
    content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RootArgs {
    project_root: Option<String>,
}

fn read_document(ctx: &ToolContext, kind: DocKind, args: Value) -> Result<Value, ApiError> {
    let args: DocumentArgs = parse_args(args)?;
    let workspace = ctx.workspace(&ctx.resolve_root(args.project_root.as_deref()));

    match workspace.read_document(kind, &args.name)? {
        DocumentLookup::Found { path, content } => Ok(json!({
            "success": true,
            "name": args.name,
            "content": content,
            "filePath": path,
        })),
        DocumentLookup::Missing {
            file_name,
            available,
        } => Ok(json!({
            "success": false,
            "error": format!("{} not found: {}", kind.label(), file_name),
            "availableFiles": available,
        })),
    }
}

fn save_document(ctx: &ToolContext, args: Value) -> Result<Value, ApiError> {
    let args: SaveDocumentArgs = parse_args(args)?;
    let kind = DocKind::parse(&args.kind)
        .ok_or_else(|| ApiError::InvalidDocumentKind(args.kind.clone()))?;
    let workspace = ctx.workspace(&ctx.resolve_root(args.project_root.as_deref()));
    let path = workspace.save_document(kind, &args.name, &args.content)?;

    Ok(json!({
        "success": true,
        "message": "Document saved successfully",
        "filePath": path,
        "type": kind,
        "name": document_stem(args.name.trim()),
    }))
}

fn get_tech_design_rules(ctx: &ToolContext, args: Value) -> Result<Value, ApiError> {
    let args: RootArgs = parse_args(args)?;
    let workspace = ctx.workspace(&ctx.resolve_root(args.project_root.as_deref()));
    let rules = workspace.tech_design_rules()?;
    Ok(json!({
        "success": true,
        "rules": rules.content,
        "rulesPath": rules.source,
    }))
}
