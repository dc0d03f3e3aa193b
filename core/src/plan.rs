use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// The three trimester labels recognized by the MEDUCA school calendar.
/// The wire value is the full Spanish label, exactly as the frontend sends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Trimester {
    #[serde(rename = "Primer Trimestre")]
    First,
    #[serde(rename = "Segundo Trimestre")]
    Second,
    #[serde(rename = "Tercer Trimestre")]
    Third,
}

impl Trimester {
    pub const LABELS: [&'static str; 3] =
        ["Primer Trimestre", "Segundo Trimestre", "Tercer Trimestre"];

    pub fn as_str(self) -> &'static str {
        match self {
            Trimester::First => "Primer Trimestre",
            Trimester::Second => "Segundo Trimestre",
            Trimester::Third => "Tercer Trimestre",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Primer Trimestre" => Some(Trimester::First),
            "Segundo Trimestre" => Some(Trimester::Second),
            "Tercer Trimestre" => Some(Trimester::Third),
            _ => None,
        }
    }
}

/// Default class duration when the topic mode does not specify one.
pub const DEFAULT_CLASS_DURATION: &str = "45 minutos";

/// Request body for POST /api/generate-plan.
///
/// Field names are the legacy camelCase Spanish names the frontend has
/// always sent. The request carries either a trimester (full trimester
/// plan) or a topic plus optional class duration (single-class plan).
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanRequest {
    pub nombre_profesor: String,
    pub institucion: String,
    pub grado_plan: String,
    pub materia: String,
    /// Trimester label — required unless `tema` is given
    #[serde(default)]
    pub trimestre: Option<String>,
    /// Specific topic for a single-class plan — required unless `trimestre` is given
    #[serde(default)]
    pub tema: Option<String>,
    /// Class duration for the topic mode (e.g. "45 minutos")
    #[serde(default)]
    pub duracion_clase: Option<String>,
}

/// The validated planning scope of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanScope {
    Trimester(Trimester),
    Topic { tema: String, duracion_clase: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanRequestError {
    #[error("El campo '{0}' es requerido")]
    MissingField(&'static str),
    #[error("Trimestre debe ser: Primer Trimestre, Segundo Trimestre o Tercer Trimestre")]
    InvalidTrimester(String),
    #[error("Se requiere 'trimestre' o 'tema' para generar un plan")]
    MissingScope,
}

impl PlanRequestError {
    /// Which request field the error refers to, for the error envelope.
    pub fn field(&self) -> &'static str {
        match self {
            PlanRequestError::MissingField(field) => field,
            PlanRequestError::InvalidTrimester(_) => "trimestre",
            PlanRequestError::MissingScope => "trimestre",
        }
    }
}

impl GeneratePlanRequest {
    /// Validates the request and resolves its planning scope.
    ///
    /// All identity fields must be non-blank. Exactly one scope applies:
    /// a valid trimester label wins over `tema` when both are present.
    pub fn validate(&self) -> Result<PlanScope, PlanRequestError> {
        fn required(value: &str, name: &'static str) -> Result<(), PlanRequestError> {
            if value.trim().is_empty() {
                Err(PlanRequestError::MissingField(name))
            } else {
                Ok(())
            }
        }

        required(&self.nombre_profesor, "nombreProfesor")?;
        required(&self.institucion, "institucion")?;
        required(&self.grado_plan, "gradoPlan")?;
        required(&self.materia, "materia")?;

        if let Some(label) = self.trimestre.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let trimester = Trimester::parse(label)
                .ok_or_else(|| PlanRequestError::InvalidTrimester(label.to_string()))?;
            return Ok(PlanScope::Trimester(trimester));
        }

        if let Some(tema) = self.tema.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let duracion = self
                .duracion_clase
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_CLASS_DURATION);
            return Ok(PlanScope::Topic {
                tema: tema.to_string(),
                duracion_clase: duracion.to_string(),
            });
        }

        Err(PlanRequestError::MissingScope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(trimestre: Option<&str>, tema: Option<&str>) -> GeneratePlanRequest {
        GeneratePlanRequest {
            nombre_profesor: "Ana Pérez".to_string(),
            institucion: "Instituto Urracá".to_string(),
            grado_plan: "5° grado".to_string(),
            materia: "Matemática".to_string(),
            trimestre: trimestre.map(str::to_string),
            tema: tema.map(str::to_string),
            duracion_clase: None,
        }
    }

    #[test]
    fn valid_trimester_resolves_to_trimester_scope() {
        let scope = request(Some("Segundo Trimestre"), None).validate().unwrap();
        assert_eq!(scope, PlanScope::Trimester(Trimester::Second));
    }

    #[test]
    fn unknown_trimester_label_is_rejected_listing_valid_values() {
        let err = request(Some("Cuarto Trimestre"), None).validate().unwrap_err();
        assert_eq!(err, PlanRequestError::InvalidTrimester("Cuarto Trimestre".to_string()));
        let message = err.to_string();
        for label in Trimester::LABELS {
            assert!(message.contains(label), "message should list '{label}'");
        }
    }

    #[test]
    fn blank_identity_field_is_rejected() {
        let mut req = request(Some("Primer Trimestre"), None);
        req.materia = "   ".to_string();
        assert_eq!(
            req.validate().unwrap_err(),
            PlanRequestError::MissingField("materia")
        );
    }

    #[test]
    fn topic_mode_defaults_class_duration() {
        let scope = request(None, Some("Fracciones equivalentes")).validate().unwrap();
        assert_eq!(
            scope,
            PlanScope::Topic {
                tema: "Fracciones equivalentes".to_string(),
                duracion_clase: DEFAULT_CLASS_DURATION.to_string(),
            }
        );
    }

    #[test]
    fn missing_scope_is_rejected() {
        assert_eq!(request(None, None).validate().unwrap_err(), PlanRequestError::MissingScope);
    }

    #[test]
    fn empty_trimester_falls_back_to_topic() {
        let mut req = request(Some(""), Some("El ciclo del agua"));
        req.duracion_clase = Some("60 minutos".to_string());
        let scope = req.validate().unwrap();
        assert_eq!(
            scope,
            PlanScope::Topic {
                tema: "El ciclo del agua".to_string(),
                duracion_clase: "60 minutos".to_string(),
            }
        );
    }
}
