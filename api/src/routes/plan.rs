use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::Value;

use eduplan_core::error::ApiError;
use eduplan_core::normalize;
use eduplan_core::plan::{GeneratePlanRequest, PlanRequestError, Trimester};

use crate::error::AppError;
use crate::openai::CompletionClient;
use crate::prompt;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/generate-plan", post(generate_plan))
}

/// Generate a trimester or single-class plan
///
/// Validates the request, sends one completion call and returns the
/// normalized plan document. The response always contains a non-empty
/// `desarrolloClases` map, even when the model answer could not be parsed.
#[utoipa::path(
    post,
    path = "/api/generate-plan",
    request_body = GeneratePlanRequest,
    responses(
        (status = 200, description = "Normalized plan document"),
        (status = 400, description = "Missing field or unknown trimester label", body = ApiError),
        (status = 429, description = "Completion API rate limit reached", body = ApiError),
        (status = 500, description = "Server misconfiguration or upstream failure", body = ApiError)
    ),
    tag = "plans"
)]
pub async fn generate_plan(
    State(state): State<AppState>,
    Json(request): Json<GeneratePlanRequest>,
) -> Result<Json<Value>, AppError> {
    let scope = request.validate().map_err(validation_error)?;

    // Config check comes before any outbound work
    let Some(openai) = state.config.openai.as_ref() else {
        return Err(AppError::Configuration {
            message: "OPENAI_API_KEY is not set".to_string(),
        });
    };

    tracing::info!(
        grado = %request.grado_plan,
        materia = %request.materia,
        "Generating plan"
    );

    let user_prompt = prompt::build_user_prompt(&request, &scope);
    let completion = CompletionClient::new(&state.http, openai)
        .chat(prompt::SYSTEM_PROMPT, &user_prompt)
        .await?;

    let mut plan = normalize::normalize_plan(&completion, &request);
    plan.insert("generadoPorIA".to_string(), Value::Bool(true));
    plan.insert(
        "fechaGeneracion".to_string(),
        Value::String(Utc::now().to_rfc3339()),
    );

    tracing::info!("Plan generated");
    Ok(Json(Value::Object(plan)))
}

fn validation_error(err: PlanRequestError) -> AppError {
    let received = match &err {
        PlanRequestError::InvalidTrimester(label) => Some(Value::String(label.clone())),
        _ => None,
    };
    let docs_hint = match &err {
        PlanRequestError::InvalidTrimester(_) | PlanRequestError::MissingScope => Some(format!(
            "Valores aceptados para trimestre: {}. Alternativamente envía 'tema' y 'duracionClase'.",
            Trimester::LABELS.join(", ")
        )),
        PlanRequestError::MissingField(_) => None,
    };
    AppError::Validation {
        message: err.to_string(),
        field: Some(err.field().to_string()),
        received,
        docs_hint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_trimester_carries_received_value_and_labels() {
        let err = validation_error(PlanRequestError::InvalidTrimester("Cuarto Trimestre".to_string()));
        let AppError::Validation {
            message,
            field,
            received,
            docs_hint,
        } = err
        else {
            panic!("expected validation error");
        };

        assert_eq!(field.as_deref(), Some("trimestre"));
        assert_eq!(received, Some(Value::String("Cuarto Trimestre".to_string())));
        for label in Trimester::LABELS {
            assert!(message.contains(label));
        }
        assert!(docs_hint.unwrap().contains("Primer Trimestre"));
    }

    #[test]
    fn missing_field_names_the_field() {
        let err = validation_error(PlanRequestError::MissingField("gradoPlan"));
        let AppError::Validation { field, message, .. } = err else {
            panic!("expected validation error");
        };
        assert_eq!(field.as_deref(), Some("gradoPlan"));
        assert!(message.contains("gradoPlan"));
    }
}
