//! Defensive normalization of completion-API output.
//!
//! The model is asked for a fixed JSON structure, but what comes back has
//! drifted across prompt iterations: sometimes fenced in markdown, sometimes
//! wrapped in a `plan_trimestral` envelope, sometimes with nested sections
//! instead of the flat keys the frontend reads. The normalizer never rejects:
//! every input, including unparseable text, yields a schema-valid document
//! with a non-empty `desarrolloClases` map.

use serde_json::{Map, Value};

use crate::plan::GeneratePlanRequest;

/// Wrapper keys the model has used around the actual plan object.
const WRAPPER_KEYS: [&str; 3] = ["plan_trimestral", "plan_clase", "plan"];

/// Extracts the JSON payload from a possibly fenced completion.
///
/// A ```` ```json ```` fence wins over a bare ```` ``` ```` fence; an
/// unterminated fence takes everything after the opening delimiter.
pub fn extract_json_block(raw: &str) -> &str {
    for delimiter in ["```json", "```"] {
        if let Some(start) = raw.find(delimiter) {
            let rest = &raw[start + delimiter.len()..];
            return match rest.find("```") {
                Some(end) => rest[..end].trim(),
                None => rest.trim(),
            };
        }
    }
    raw.trim()
}

/// Normalizes raw completion text into the flat plan document the frontend
/// expects. Parse failures and non-object payloads fall back to a fully
/// populated deterministic document built from the request.
pub fn normalize_plan(raw: &str, request: &GeneratePlanRequest) -> Map<String, Value> {
    let block = extract_json_block(raw);
    let parsed = serde_json::from_str::<Value>(block).ok();

    let object = match parsed {
        Some(Value::Object(map)) => map,
        _ => return defaults::fallback_plan(request),
    };

    let mut plan = unwrap_plan_wrapper(object);
    lift_general_info(&mut plan);
    lift_pedagogical_structure(&mut plan);
    normalize_class_development(&mut plan);
    plan
}

/// Unwraps a top-level envelope key if the model emitted one.
fn unwrap_plan_wrapper(map: Map<String, Value>) -> Map<String, Value> {
    for key in WRAPPER_KEYS {
        if let Some(Value::Object(inner)) = map.get(key) {
            return inner.clone();
        }
    }
    map
}

/// Copies `informacion_general` sub-fields up to the top level.
fn lift_general_info(plan: &mut Map<String, Value>) {
    let Some(info) = plan.get("informacion_general").and_then(Value::as_object).cloned() else {
        return;
    };
    let Some(contents) = info.get("contenidos_conceptuales") else {
        return;
    };
    plan.insert("contenidos".to_string(), contents.clone());
    if let Some(competencias) = info.get("competencias") {
        plan.insert("competencias".to_string(), competencias.clone());
    }
    if let Some(indicadores) = info.get("indicadores_de_logro") {
        plan.insert("indicadoresLogro".to_string(), indicadores.clone());
    }
}

/// Copies `estructura_pedagogica` sub-fields up to the top level,
/// joining the strategy list into a single methodology string.
fn lift_pedagogical_structure(plan: &mut Map<String, Value>) {
    let Some(section) = plan.get("estructura_pedagogica").and_then(Value::as_object).cloned()
    else {
        return;
    };

    let metodologia = section
        .get("estrategias_metodologicas")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .filter(|joined| !joined.is_empty())
        .unwrap_or_else(|| "Estrategias metodológicas variadas".to_string());
    plan.insert("metodologia".to_string(), Value::String(metodologia));

    if let Some(recursos) = section.get("recursos_materiales") {
        plan.insert("recursos".to_string(), recursos.clone());
    }
    if let Some(adaptaciones) = section.get("adaptaciones_curriculares") {
        plan.insert("adaptaciones".to_string(), adaptaciones.clone());
    }

    let evaluacion = section
        .get("instrumentos_evaluacion")
        .and_then(|instruments| instruments.get("formativa"))
        .cloned()
        .unwrap_or_else(defaults::formative_evaluation);
    plan.insert("evaluacion".to_string(), evaluacion);
}

/// Produces the `desarrolloClases` map. First applicable branch wins:
///
/// 1. already normalized and non-empty — left untouched, which keeps the
///    whole normalization idempotent;
/// 2. detailed `desarrollo_clases` from the model — renamed and
///    default-filled, entry order preserved;
/// 3. a flat `contenidos` list — one synthesized entry per content item;
/// 4. nothing usable — a single generic entry.
fn normalize_class_development(plan: &mut Map<String, Value>) {
    if plan
        .get("desarrolloClases")
        .and_then(Value::as_object)
        .is_some_and(|existing| !existing.is_empty())
    {
        return;
    }

    if let Some(detailed) = plan.get("desarrollo_clases").and_then(Value::as_object).cloned() {
        if !detailed.is_empty() {
            let mut normalized = Map::new();
            for (title, unit) in &detailed {
                normalized.insert(title.clone(), normalize_unit(unit));
            }
            plan.insert("desarrolloClases".to_string(), Value::Object(normalized));
            return;
        }
    }

    if let Some(contents) = plan.get("contenidos").and_then(Value::as_array).cloned() {
        if !contents.is_empty() {
            let mut synthesized = Map::new();
            for item in &contents {
                let text = match item.as_str() {
                    Some(s) => s.to_string(),
                    None => item.to_string(),
                };
                synthesized.insert(defaults::content_title(&text), defaults::synthesized_unit(&text));
            }
            plan.insert("desarrolloClases".to_string(), Value::Object(synthesized));
            return;
        }
    }

    plan.insert(
        "desarrolloClases".to_string(),
        defaults::generic_class_development(),
    );
}

/// Normalizes one class-development unit: fills missing duration, objectives
/// and materials, and renames `sesiones_detalladas` to `fases` with
/// per-session defaults.
fn normalize_unit(unit: &Value) -> Value {
    let empty = Map::new();
    let unit = unit.as_object().unwrap_or(&empty);

    let duracion = unit
        .get("duracion")
        .and_then(Value::as_str)
        .unwrap_or("3 sesiones de 45 minutos");

    let objetivos = unit
        .get("objetivos_aprendizaje")
        .or_else(|| unit.get("objetivos"))
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(defaults::objectives);

    let materiales = unit
        .get("materiales_recursos")
        .or_else(|| unit.get("materiales"))
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(defaults::materials);

    let fases: Vec<Value> = unit
        .get("sesiones_detalladas")
        .and_then(Value::as_array)
        .map(|sessions| {
            sessions
                .iter()
                .enumerate()
                .map(|(index, session)| normalize_session(session, index))
                .collect()
        })
        .unwrap_or_default();

    serde_json::json!({
        "duracion": duracion,
        "objetivos": objetivos,
        "materiales": materiales,
        "fases": fases,
    })
}

fn normalize_session(session: &Value, index: usize) -> Value {
    let empty = Map::new();
    let session = session.as_object().unwrap_or(&empty);

    let titulo = session
        .get("titulo")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Sesión {}", index + 1));

    let actividades = session
        .get("actividades")
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(|| Value::Array(vec![defaults::placeholder_activity()]));

    serde_json::json!({
        "titulo": titulo,
        "actividades": actividades,
    })
}

/// Builders for the canonical default structures. Every fallback object in
/// the normalizer comes from here so the defaults stay in one place.
pub mod defaults {
    use chrono::{Datelike, Utc};
    use serde_json::{Map, Value, json};

    use crate::plan::GeneratePlanRequest;

    pub fn objectives() -> Value {
        json!([
            "Comprender conceptos fundamentales",
            "Aplicar conocimientos en situaciones prácticas"
        ])
    }

    pub fn materials() -> Value {
        json!(["Material didáctico impreso", "Recursos multimedia"])
    }

    pub fn placeholder_activity() -> Value {
        json!({"tiempo": "45 min", "descripcion": "Desarrollo de la sesión"})
    }

    pub fn formative_evaluation() -> Value {
        json!(["Evaluación formativa continua"])
    }

    /// Map key for a synthesized class-development entry: the content text,
    /// truncated when it would overflow the frontend's card title.
    pub fn content_title(content: &str) -> String {
        if content.chars().count() > 50 {
            let truncated: String = content.chars().take(47).collect();
            format!("{truncated}...")
        } else {
            content.to_string()
        }
    }

    /// A synthesized class-development entry for one content item: fixed
    /// three-session structure, first objective derived from the content.
    pub fn synthesized_unit(content: &str) -> Value {
        let preview: String = content.chars().take(30).collect();
        json!({
            "duracion": "3 sesiones de 45 minutos",
            "objetivos": [
                format!("Comprender los conceptos de: {preview}"),
                "Aplicar conocimientos en situaciones prácticas",
                "Desarrollar habilidades de análisis y creatividad"
            ],
            "materiales": [
                "Material didáctico impreso",
                "Recursos multimedia",
                "Instrumentos de evaluación formativa"
            ],
            "fases": [
                {
                    "titulo": "SESIÓN 1 - Introducción y exploración",
                    "actividades": [
                        {"tiempo": "10 min", "descripcion": "Presentación del tema y activación de conocimientos previos"},
                        {"tiempo": "20 min", "descripcion": "Explicación teórica con ejemplos prácticos"},
                        {"tiempo": "15 min", "descripcion": "Ejercicio guiado de aplicación inicial"}
                    ]
                },
                {
                    "titulo": "SESIÓN 2 - Desarrollo y práctica",
                    "actividades": [
                        {"tiempo": "15 min", "descripcion": "Repaso de conceptos clave"},
                        {"tiempo": "25 min", "descripcion": "Actividad práctica en equipos colaborativos"},
                        {"tiempo": "5 min", "descripcion": "Socialización de resultados"}
                    ]
                },
                {
                    "titulo": "SESIÓN 3 - Profundización y evaluación",
                    "actividades": [
                        {"tiempo": "20 min", "descripcion": "Ejercicios de mayor complejidad"},
                        {"tiempo": "15 min", "descripcion": "Aplicación de instrumento de evaluación"},
                        {"tiempo": "10 min", "descripcion": "Retroalimentación y conclusiones"}
                    ]
                }
            ]
        })
    }

    /// The last-resort class development when neither detailed sessions nor
    /// a content list came back.
    pub fn generic_class_development() -> Value {
        json!({
            "Contenido general": {
                "duracion": "3 sesiones de 45 minutos",
                "objetivos": ["Desarrollar competencias específicas", "Aplicar conocimientos prácticos"],
                "materiales": ["Material básico del aula"],
                "fases": [
                    {
                        "titulo": "Sesión introductoria",
                        "actividades": [
                            {"tiempo": "45 min", "descripcion": "Desarrollo completo de la sesión"}
                        ]
                    }
                ]
            }
        })
    }

    /// The document returned when the completion cannot be parsed at all:
    /// fully populated from the request so the frontend renders something
    /// coherent instead of an error.
    pub fn fallback_plan(request: &GeneratePlanRequest) -> Map<String, Value> {
        let mut plan = Map::new();
        plan.insert("grado".to_string(), json!(request.grado_plan));
        plan.insert("asignatura".to_string(), json!(request.materia));
        if let Some(trimestre) = &request.trimestre {
            plan.insert("trimestre".to_string(), json!(trimestre));
        }
        if let Some(tema) = &request.tema {
            plan.insert("tema".to_string(), json!(tema));
            if let Some(duracion) = &request.duracion_clase {
                plan.insert("duracionClase".to_string(), json!(duracion));
            }
        }
        plan.insert("docente".to_string(), json!(request.nombre_profesor));
        plan.insert("institucion".to_string(), json!(request.institucion));
        plan.insert("anioEscolar".to_string(), json!(Utc::now().year().to_string()));
        plan.insert("duracionSemanas".to_string(), json!(11));
        plan.insert(
            "contenidos".to_string(),
            json!([
                "Contenido 1 según MEDUCA",
                "Contenido 2 según MEDUCA",
                "Contenido 3 según MEDUCA"
            ]),
        );
        plan.insert(
            "competencias".to_string(),
            json!(["Competencia 1 MEDUCA", "Competencia 2 MEDUCA"]),
        );
        plan.insert(
            "indicadoresLogro".to_string(),
            json!(["Indicador 1 observable", "Indicador 2 medible"]),
        );
        plan.insert(
            "metodologia".to_string(),
            json!("Estrategias metodológicas alineadas con MEDUCA"),
        );
        plan.insert("recursos".to_string(), json!(["Recursos educativos estándar"]));
        plan.insert(
            "evaluacion".to_string(),
            json!(["Instrumentos de evaluación formativa y sumativa"]),
        );
        plan.insert(
            "adaptaciones".to_string(),
            json!(["Adaptaciones para atención a la diversidad"]),
        );
        plan.insert(
            "observaciones".to_string(),
            json!("Plan generado automáticamente basado en currículo MEDUCA"),
        );
        plan.insert(
            "desarrolloClases".to_string(),
            json!({
                "Contenido 1: Contenido 1 según MEDUCA...": {
                    "duracion": "3 sesiones de 45 minutos",
                    "objetivos": [
                        "Comprender los conceptos fundamentales",
                        "Aplicar los conocimientos en situaciones prácticas",
                        "Desarrollar habilidades de análisis"
                    ],
                    "materiales": [
                        "Material didáctico impreso",
                        "Recursos multimedia",
                        "Instrumentos de evaluación"
                    ],
                    "fases": [
                        {
                            "titulo": "SESIÓN 1 - Introducción y contextualización",
                            "actividades": [
                                {"tiempo": "10 min", "descripcion": "Presentación del tema y objetivos"},
                                {"tiempo": "15 min", "descripcion": "Activación de conocimientos previos"},
                                {"tiempo": "20 min", "descripcion": "Exposición teórica interactiva"}
                            ]
                        },
                        {
                            "titulo": "SESIÓN 2 - Desarrollo y práctica",
                            "actividades": [
                                {"tiempo": "25 min", "descripcion": "Ejercicios prácticos guiados"},
                                {"tiempo": "15 min", "descripcion": "Trabajo en equipos colaborativos"},
                                {"tiempo": "5 min", "descripcion": "Puesta en común de resultados"}
                            ]
                        },
                        {
                            "titulo": "SESIÓN 3 - Evaluación y cierre",
                            "actividades": [
                                {"tiempo": "10 min", "descripcion": "Aplicación de instrumento de evaluación"},
                                {"tiempo": "5 min", "descripcion": "Retroalimentación y conclusiones"}
                            ]
                        }
                    ]
                },
                "Contenido 2: Contenido 2 según MEDUCA...": {
                    "duracion": "2 sesiones de 45 minutos",
                    "objetivos": [
                        "Analizar conceptos intermedios",
                        "Resolver problemas prácticos",
                        "Desarrollar pensamiento crítico"
                    ],
                    "materiales": ["Material de apoyo", "Recursos visuales", "Guías de trabajo"],
                    "fases": [
                        {
                            "titulo": "SESIÓN 1 - Fundamentos y aplicación",
                            "actividades": [
                                {"tiempo": "15 min", "descripcion": "Introducción teórica"},
                                {"tiempo": "25 min", "descripcion": "Ejercicios prácticos"},
                                {"tiempo": "5 min", "descripcion": "Cierre y preparación"}
                            ]
                        },
                        {
                            "titulo": "SESIÓN 2 - Profundización práctica",
                            "actividades": [
                                {"tiempo": "30 min", "descripcion": "Actividad integradora"},
                                {"tiempo": "10 min", "descripcion": "Evaluación formativa"},
                                {"tiempo": "5 min", "descripcion": "Reflexión final"}
                            ]
                        }
                    ]
                }
            }),
        );
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> GeneratePlanRequest {
        GeneratePlanRequest {
            nombre_profesor: "Carlos Gómez".to_string(),
            institucion: "Escuela República de Chile".to_string(),
            grado_plan: "4° grado".to_string(),
            materia: "Ciencias Naturales".to_string(),
            trimestre: Some("Primer Trimestre".to_string()),
            tema: None,
            duracion_clase: None,
        }
    }

    #[test]
    fn extract_json_block_prefers_json_fence() {
        let raw = "Aquí está el plan:\n```json\n{\"a\": 1}\n```\nSaludos";
        assert_eq!(extract_json_block(raw), "{\"a\": 1}");
    }

    #[test]
    fn extract_json_block_handles_bare_fence() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_block(raw), "{\"a\": 1}");
    }

    #[test]
    fn extract_json_block_handles_unterminated_fence() {
        let raw = "```json\n{\"a\": 1}";
        assert_eq!(extract_json_block(raw), "{\"a\": 1}");
    }

    #[test]
    fn extract_json_block_passes_plain_text_through() {
        assert_eq!(extract_json_block("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn unparseable_text_yields_populated_fallback() {
        let plan = normalize_plan("Lo siento, no puedo generar el plan.", &request());

        assert_eq!(plan["grado"], json!("4° grado"));
        assert_eq!(plan["docente"], json!("Carlos Gómez"));
        assert_eq!(plan["trimestre"], json!("Primer Trimestre"));
        let desarrollo = plan["desarrolloClases"].as_object().unwrap();
        assert!(!desarrollo.is_empty());
    }

    #[test]
    fn non_object_json_yields_fallback() {
        let plan = normalize_plan("[1, 2, 3]", &request());
        assert!(plan.contains_key("desarrolloClases"));
        assert_eq!(plan["asignatura"], json!("Ciencias Naturales"));
    }

    #[test]
    fn trimester_wrapper_is_unwrapped() {
        let raw = json!({
            "plan_trimestral": {
                "grado": "4° grado",
                "contenidos": ["Los ecosistemas"]
            }
        })
        .to_string();

        let plan = normalize_plan(&raw, &request());
        assert_eq!(plan["grado"], json!("4° grado"));
        assert!(!plan.contains_key("plan_trimestral"));
    }

    #[test]
    fn general_info_is_lifted_to_top_level() {
        let raw = json!({
            "informacion_general": {
                "contenidos_conceptuales": ["El sistema solar", "Las estaciones"],
                "competencias": ["Observa fenómenos naturales"],
                "indicadores_de_logro": ["Describe los planetas"]
            }
        })
        .to_string();

        let plan = normalize_plan(&raw, &request());
        assert_eq!(plan["contenidos"], json!(["El sistema solar", "Las estaciones"]));
        assert_eq!(plan["competencias"], json!(["Observa fenómenos naturales"]));
        assert_eq!(plan["indicadoresLogro"], json!(["Describe los planetas"]));
    }

    #[test]
    fn pedagogical_structure_is_lifted_with_joined_methodology() {
        let raw = json!({
            "estructura_pedagogica": {
                "estrategias_metodologicas": ["Aprendizaje basado en proyectos", "Trabajo cooperativo"],
                "recursos_materiales": ["Láminas", "Maquetas"],
                "adaptaciones_curriculares": ["Tiempo extendido"],
                "instrumentos_evaluacion": {
                    "formativa": ["Rúbrica de observación"],
                    "sumativa": ["Prueba escrita"]
                }
            }
        })
        .to_string();

        let plan = normalize_plan(&raw, &request());
        assert_eq!(
            plan["metodologia"],
            json!("Aprendizaje basado en proyectos, Trabajo cooperativo")
        );
        assert_eq!(plan["recursos"], json!(["Láminas", "Maquetas"]));
        assert_eq!(plan["adaptaciones"], json!(["Tiempo extendido"]));
        assert_eq!(plan["evaluacion"], json!(["Rúbrica de observación"]));
    }

    #[test]
    fn pedagogical_structure_defaults_apply_when_subfields_missing() {
        let raw = json!({"estructura_pedagogica": {}}).to_string();

        let plan = normalize_plan(&raw, &request());
        assert_eq!(plan["metodologia"], json!("Estrategias metodológicas variadas"));
        assert_eq!(plan["evaluacion"], json!(["Evaluación formativa continua"]));
        assert!(!plan.contains_key("recursos"));
    }

    #[test]
    fn detailed_class_development_is_renamed_and_default_filled() {
        let raw = json!({
            "desarrollo_clases": {
                "La célula": {
                    "duracion": "4 sesiones de 45 minutos",
                    "objetivos_aprendizaje": ["Identificar organelos"],
                    "materiales_recursos": ["Microscopio"],
                    "sesiones_detalladas": [
                        {
                            "titulo": "SESIÓN 1 - Observación",
                            "actividades": [
                                {"tiempo": "0-10 min", "descripcion": "Introducción"}
                            ]
                        },
                        {}
                    ]
                },
                "Los tejidos": {}
            }
        })
        .to_string();

        let plan = normalize_plan(&raw, &request());
        let desarrollo = plan["desarrolloClases"].as_object().unwrap();

        let celula = &desarrollo["La célula"];
        assert_eq!(celula["duracion"], json!("4 sesiones de 45 minutos"));
        assert_eq!(celula["objetivos"], json!(["Identificar organelos"]));
        assert_eq!(celula["materiales"], json!(["Microscopio"]));

        let fases = celula["fases"].as_array().unwrap();
        assert_eq!(fases.len(), 2);
        assert_eq!(fases[0]["titulo"], json!("SESIÓN 1 - Observación"));
        assert_eq!(fases[1]["titulo"], json!("Sesión 2"));
        assert_eq!(
            fases[1]["actividades"],
            json!([{"tiempo": "45 min", "descripcion": "Desarrollo de la sesión"}])
        );

        let tejidos = &desarrollo["Los tejidos"];
        assert_eq!(tejidos["duracion"], json!("3 sesiones de 45 minutos"));
        assert_eq!(
            tejidos["objetivos"],
            json!([
                "Comprender conceptos fundamentales",
                "Aplicar conocimientos en situaciones prácticas"
            ])
        );
        assert_eq!(tejidos["fases"], json!([]));
    }

    #[test]
    fn detailed_class_development_preserves_entry_order() {
        let raw = json!({
            "desarrollo_clases": {
                "Zoología": {},
                "Anatomía": {},
                "Botánica": {}
            }
        })
        .to_string();

        let plan = normalize_plan(&raw, &request());
        let keys: Vec<&String> = plan["desarrolloClases"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["Zoología", "Anatomía", "Botánica"]);
    }

    #[test]
    fn legacy_objetivos_key_is_accepted() {
        let raw = json!({
            "desarrollo_clases": {
                "Unidad": {
                    "objetivos": ["Objetivo heredado"],
                    "materiales": ["Material heredado"]
                }
            }
        })
        .to_string();

        let plan = normalize_plan(&raw, &request());
        let unidad = &plan["desarrolloClases"]["Unidad"];
        assert_eq!(unidad["objetivos"], json!(["Objetivo heredado"]));
        assert_eq!(unidad["materiales"], json!(["Material heredado"]));
    }

    #[test]
    fn content_list_synthesizes_one_entry_per_content() {
        let raw = json!({
            "contenidos": [
                "Los números enteros",
                "Un contenido extremadamente largo que describe en detalle todos los temas del trimestre completo"
            ]
        })
        .to_string();

        let plan = normalize_plan(&raw, &request());
        let desarrollo = plan["desarrolloClases"].as_object().unwrap();
        assert_eq!(desarrollo.len(), 2);

        let entry = &desarrollo["Los números enteros"];
        assert_eq!(entry["duracion"], json!("3 sesiones de 45 minutos"));
        assert_eq!(entry["fases"].as_array().unwrap().len(), 3);
        assert_eq!(
            entry["objetivos"][0],
            json!("Comprender los conceptos de: Los números enteros")
        );

        let long_key = desarrollo
            .keys()
            .find(|k| k.ends_with("..."))
            .expect("long content should be truncated");
        assert_eq!(long_key.chars().count(), 50);
    }

    #[test]
    fn empty_detailed_map_falls_through_to_content_synthesis() {
        let raw = json!({
            "desarrollo_clases": {},
            "contenidos": ["La fotosíntesis"]
        })
        .to_string();

        let plan = normalize_plan(&raw, &request());
        let desarrollo = plan["desarrolloClases"].as_object().unwrap();
        assert!(desarrollo.contains_key("La fotosíntesis"));
    }

    #[test]
    fn no_usable_data_yields_single_generic_entry() {
        let plan = normalize_plan("{\"observaciones\": \"sin estructura\"}", &request());
        let desarrollo = plan["desarrolloClases"].as_object().unwrap();
        assert_eq!(desarrollo.len(), 1);
        assert!(desarrollo.contains_key("Contenido general"));
        assert_eq!(desarrollo["Contenido general"]["fases"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = json!({
            "plan_trimestral": {
                "informacion_general": {
                    "contenidos_conceptuales": ["El relieve panameño"],
                    "competencias": ["Interpreta mapas"],
                    "indicadores_de_logro": ["Ubica regiones"]
                },
                "estructura_pedagogica": {
                    "estrategias_metodologicas": ["Salidas de campo"]
                },
                "desarrollo_clases": {
                    "El relieve panameño": {
                        "duracion": "2 sesiones de 45 minutos",
                        "sesiones_detalladas": [{"titulo": "SESIÓN 1 - Mapas"}]
                    }
                }
            }
        })
        .to_string();

        let req = request();
        let first = normalize_plan(&raw, &req);
        let second = normalize_plan(&Value::Object(first.clone()).to_string(), &req);
        assert_eq!(first, second);
    }

    #[test]
    fn fallback_document_is_idempotent_under_normalization() {
        let req = request();
        let first = defaults::fallback_plan(&req);
        let second = normalize_plan(&Value::Object(first.clone()).to_string(), &req);
        assert_eq!(first, second);
    }
}
