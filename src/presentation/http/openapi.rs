// src/presentation/http/openapi.rs
use crate::domain::cases::{
    AffaireData, AlerteData, AudienceData, AvertissementData, DecisionData, ExecutionData,
    VoieDeRecoursData,
};
use crate::presentation::http::controllers::records::{HttpResource, ScopeParams};
use axum::{Router, response::Redirect, routing::get};
use serde::{Deserialize, Serialize};
use std::{env, fs::File, io::BufWriter, path::Path};
use utoipa::openapi::{
    Components, RefOr, Required,
    content::Content,
    path::{HttpMethod, OperationBuilder, Parameter, ParameterBuilder, ParameterIn},
    request_body::{RequestBody, RequestBodyBuilder},
    response::ResponseBuilder,
    schema::{Object, Schema, Type},
    security::{ApiKey, ApiKeyValue, SecurityScheme},
};
use utoipa::{IntoParams, Modify, OpenApi, ToSchema};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::auth::login_page,
        crate::presentation::http::controllers::auth::login,
        crate::presentation::http::controllers::auth::logout,
        crate::presentation::http::controllers::auth::me,
        crate::presentation::http::controllers::audit::list_audit_logs,
        crate::presentation::http::controllers::sync::list_sync_results,
        super::routes::health
    ),
    components(
        schemas(
            StatusResponse,
            crate::presentation::http::error::ErrorResponse,
            crate::presentation::http::controllers::auth::LoginForm,
            crate::presentation::http::controllers::audit::AuditLogListResponse,
            crate::application::dto::AuditLogDto,
            crate::application::dto::CurrentUser,
            crate::application::dto::SyncResultDto,
            crate::application::dto::UiResponse
        )
    ),
    tags(
        (name = "Auth", description = "Cookie session endpoints"),
        (name = "Affaires", description = "Case files"),
        (name = "Audiences", description = "Hearings"),
        (name = "Decisions", description = "Court decisions"),
        (name = "Recours", description = "Appeals and their deadlines"),
        (name = "Executions", description = "Enforcement of decisions"),
        (name = "Avertissements", description = "Formal notices"),
        (name = "Alertes", description = "Deadline reminders"),
        (name = "Audit", description = "Field-level audit trail"),
        (name = "System", description = "System level endpoints")
    ),
    modifiers(&ApiDocCustomizer),
    security(("sessionCookie" = [])),
    info(
        title = "Cabinet API",
        description = "Case management backend for a law office",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

struct ApiDocCustomizer;

impl Modify for ApiDocCustomizer {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let cookie_name =
            env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "auth_token".to_string());
        let components = openapi.components.get_or_insert_with(Components::default);
        components.add_security_scheme(
            "sessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(cookie_name))),
        );

        add_resource_paths::<AffaireData>(openapi);
        add_resource_paths::<AudienceData>(openapi);
        add_resource_paths::<DecisionData>(openapi);
        add_resource_paths::<VoieDeRecoursData>(openapi);
        add_resource_paths::<ExecutionData>(openapi);
        add_resource_paths::<AvertissementData>(openapi);
        add_resource_paths::<AlerteData>(openapi);
    }
}

/// The record handlers are generic, so their operations are described here
/// instead of through `#[utoipa::path]`.
fn add_resource_paths<R: HttpResource>(openapi: &mut utoipa::openapi::OpenApi) {
    let collection = format!("/api/v1/{}", R::PATH);
    let item = format!("{collection}/{{id}}");
    let model = R::MODEL;
    let paths = &mut openapi.paths;

    paths.add_path_operation(
        &collection,
        vec![HttpMethod::Get],
        operation::<R>(&format!("list_{}", R::PATH), "List records")
            .parameters(Some(scope_params()))
            .response("200", ResponseBuilder::new().description(format!("{model} records")))
            .build(),
    );
    paths.add_path_operation(
        &collection,
        vec![HttpMethod::Post],
        operation::<R>(&format!("create_{model}"), "Create a record")
            .request_body(Some(json_body(model)))
            .response("201", ResponseBuilder::new().description("Created; body carries the audited change set"))
            .response("400", ResponseBuilder::new().description("Validation failed"))
            .response("409", ResponseBuilder::new().description("Unique constraint violated"))
            .build(),
    );
    paths.add_path_operation(
        &item,
        vec![HttpMethod::Get],
        operation::<R>(&format!("get_{model}"), "Fetch one record")
            .parameter(id_param())
            .parameters(Some(scope_params()))
            .response("200", ResponseBuilder::new().description(format!("The {model}")))
            .response("404", ResponseBuilder::new().description("Not found in the requested scope"))
            .build(),
    );
    paths.add_path_operation(
        &item,
        vec![HttpMethod::Put],
        operation::<R>(&format!("update_{model}"), "Replace the payload of an active record")
            .parameter(id_param())
            .request_body(Some(json_body(model)))
            .response("200", ResponseBuilder::new().description("Updated; an empty change set means nothing was written"))
            .response("404", ResponseBuilder::new().description("Not found or soft-deleted"))
            .build(),
    );
    paths.add_path_operation(
        &item,
        vec![HttpMethod::Delete],
        operation::<R>(&format!("delete_{model}"), "Soft delete")
            .parameter(id_param())
            .response("200", ResponseBuilder::new().description("Marked deleted"))
            .response("404", ResponseBuilder::new().description("Not found or already deleted"))
            .build(),
    );
    paths.add_path_operation(
        format!("{item}/restore"),
        vec![HttpMethod::Post],
        operation::<R>(&format!("restore_{model}"), "Undo a soft delete")
            .parameter(id_param())
            .response("200", ResponseBuilder::new().description("Restored"))
            .response("409", ResponseBuilder::new().description("Record is not deleted"))
            .build(),
    );
    paths.add_path_operation(
        format!("{item}/purge"),
        vec![HttpMethod::Delete],
        operation::<R>(&format!("purge_{model}"), "Remove a soft-deleted row for good")
            .parameter(id_param())
            .response("200", ResponseBuilder::new().description("Purged"))
            .response("409", ResponseBuilder::new().description("Record must be soft deleted first, or is still referenced"))
            .build(),
    );
}

fn operation<R: HttpResource>(operation_id: &str, summary: &str) -> OperationBuilder {
    OperationBuilder::new()
        .tag(R::TAG)
        .operation_id(Some(operation_id))
        .summary(Some(summary))
}

fn id_param() -> Parameter {
    ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(RefOr::T(Schema::Object(Object::with_type(Type::Integer)))))
        .build()
}

fn scope_params() -> Vec<Parameter> {
    ScopeParams::into_params(|| Some(ParameterIn::Query))
}

fn json_body(model: &str) -> RequestBody {
    RequestBodyBuilder::new()
        .description(Some(format!("{model} payload")))
        .content(
            "application/json",
            Content::new(Some(RefOr::T(Schema::Object(Object::with_type(Type::Object))))),
        )
        .required(Some(Required::True))
        .build()
}

pub fn docs_router() -> Router {
    let openapi = ApiDoc::openapi();
    let swagger = SwaggerUi::new("/docs").url(OPENAPI_JSON_PATH, openapi.clone());
    let redoc = Redoc::with_url("/redoc", openapi);
    Router::new()
        .merge(swagger)
        .merge(redoc)
        .route("/", get(|| async { Redirect::to("/docs") }))
}

pub fn write_openapi_snapshot() -> std::io::Result<()> {
    let spec = ApiDoc::openapi();
    let output_path =
        env::var("OPENAPI_SNAPSHOT_PATH").unwrap_or_else(|_| "spec/openapi.json".to_string());
    let path = Path::new(&output_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &spec)?;
    Ok(())
}
