//! Prompt templates for plan generation. The user prompt spells out the
//! exact JSON structure the model must return; the normalizer in
//! `eduplan-core` copes with whatever actually comes back.

use eduplan_core::plan::{GeneratePlanRequest, PlanScope};

/// Fixed system instruction for every plan request.
pub const SYSTEM_PROMPT: &str = "Eres un experto pedagogo especializado en el currículo del MEDUCA de Panamá. \
     Generas planes de estudio detallados, profesionales y alineados con el marco \
     curricular panameño. Responde SOLO con JSON válido, sin texto adicional.";

/// Builds the user prompt for the validated scope.
pub fn build_user_prompt(request: &GeneratePlanRequest, scope: &PlanScope) -> String {
    match scope {
        PlanScope::Trimester(trimester) => trimester_prompt(request, trimester.as_str()),
        PlanScope::Topic {
            tema,
            duracion_clase,
        } => topic_prompt(request, tema, duracion_clase),
    }
}

fn trimester_prompt(request: &GeneratePlanRequest, trimestre: &str) -> String {
    format!(
        r#"Eres un especialista en el Currículo Nacional de Panamá (MEDUCA). Genera un plan de estudios COMPLETO y DETALLADO para el TRIMESTRE específico:

**CONTEXTO:**
- GRADO: {grado}
- ASIGNATURA: {materia}
- TRIMESTRE: {trimestre}
- DOCENTE: {docente}
- CENTRO EDUCATIVO: {institucion}

**INSTRUCCIONES CRÍTICAS - GENERA SOLO JSON VÁLIDO:**

**1. ESTRUCTURA OBLIGATORIA - DEBE INCLUIR desarrollo_clases para CADA contenido:**

{{
  "plan_trimestral": {{
    "informacion_general": {{
      "grado": "{grado}",
      "asignatura": "{materia}",
      "trimestre": "{trimestre}",
      "docente": "{docente}",
      "institucion": "{institucion}",
      "duracionSemanas": "10-12",
      "contenidos_conceptuales": ["array de 3-5 contenidos REALES del currículo MEDUCA"],
      "competencias": ["array de 3-5 competencias específicas MEDUCA"],
      "indicadores_de_logro": ["array de 4-6 indicadores observables y medibles"]
    }},
    "estructura_pedagogica": {{
      "estrategias_metodologicas": ["array de 3-4 estrategias aplicables"],
      "recursos_materiales": ["array de recursos CONCRETOS y disponibles"],
      "instrumentos_evaluacion": {{
        "formativa": ["array de 3-4 instrumentos formativos"],
        "sumativa": ["array de 2-3 instrumentos sumativos"]
      }},
      "adaptaciones_curriculares": ["array de 2-3 adaptaciones para diversidad"]
    }},
    "desarrollo_clases": {{
      "TITULO_REAL_DE_CADA_CONTENIDO": {{
        "duracion": "2-4 sesiones de 45 minutos",
        "objetivos_aprendizaje": ["3-4 objetivos medibles y específicos"],
        "materiales_recursos": ["materiales CONCRETOS para este contenido"],
        "sesiones_detalladas": [
          {{
            "titulo": "SESIÓN 1 - Introducción y exploración inicial",
            "actividades": [
              {{"tiempo": "0-10 min", "descripcion": "ACTIVIDAD CONCRETA aplicable en aula panameña"}},
              {{"tiempo": "10-25 min", "descripcion": "ACTIVIDAD CONCRETA con participación activa"}},
              {{"tiempo": "25-45 min", "descripcion": "ACTIVIDAD CONCRETA con material disponible"}}
            ]
          }}
        ]
      }}
    }},
    "observaciones": "Texto con recomendaciones prácticas para implementación en el aula panameña"
  }}
}}

**2. REQUISITOS ESPECÍFICOS:**

- Los CONTENIDOS deben ser REALES del currículo MEDUCA para {grado} {materia}
- Cada contenido en "desarrollo_clases" debe tener entre 2-4 sesiones REALISTAS
- Las ACTIVIDADES deben ser CONCRETAS, PRÁCTICAS y APLICABLES en aula panameña
- Los MATERIALES deben ser ESPECÍFICOS y disponibles en escuelas panameñas
- Las DURACIONES deben ser REALISTAS (45 minutos por sesión)
- Los OBJETIVOS deben ser MEDIBLES y ESPECÍFICOS
- DEBEN generarse DESARROLLOS DE CLASES para TODOS los contenidos listados

**IMPORTANTE: Responde ÚNICAMENTE con el JSON válido, sin texto adicional, sin comentarios, sin markdown.**"#,
        grado = request.grado_plan,
        materia = request.materia,
        trimestre = trimestre,
        docente = request.nombre_profesor,
        institucion = request.institucion,
    )
}

fn topic_prompt(request: &GeneratePlanRequest, tema: &str, duracion: &str) -> String {
    format!(
        r#"Eres un especialista en el Currículo Nacional de Panamá (MEDUCA). Genera un plan de clase COMPLETO y DETALLADO para un TEMA específico:

**CONTEXTO:**
- GRADO: {grado}
- ASIGNATURA: {materia}
- TEMA: {tema}
- DURACIÓN DE LA CLASE: {duracion}
- DOCENTE: {docente}
- CENTRO EDUCATIVO: {institucion}

**INSTRUCCIONES CRÍTICAS - GENERA SOLO JSON VÁLIDO:**

{{
  "plan_clase": {{
    "informacion_general": {{
      "grado": "{grado}",
      "asignatura": "{materia}",
      "tema": "{tema}",
      "docente": "{docente}",
      "institucion": "{institucion}",
      "contenidos_conceptuales": ["array de 2-3 contenidos asociados al tema"],
      "competencias": ["array de 2-3 competencias específicas MEDUCA"],
      "indicadores_de_logro": ["array de 3-4 indicadores observables y medibles"]
    }},
    "estructura_pedagogica": {{
      "estrategias_metodologicas": ["array de 2-3 estrategias aplicables"],
      "recursos_materiales": ["array de recursos CONCRETOS y disponibles"],
      "instrumentos_evaluacion": {{
        "formativa": ["array de 2-3 instrumentos formativos"],
        "sumativa": ["array de 1-2 instrumentos sumativos"]
      }},
      "adaptaciones_curriculares": ["array de 2-3 adaptaciones para diversidad"]
    }},
    "desarrollo_clases": {{
      "{tema}": {{
        "duracion": "1 sesión de {duracion}",
        "objetivos_aprendizaje": ["3-4 objetivos medibles y específicos"],
        "materiales_recursos": ["materiales CONCRETOS para este tema"],
        "sesiones_detalladas": [
          {{
            "titulo": "Desarrollo de la clase",
            "actividades": [
              {{"tiempo": "inicio", "descripcion": "ACTIVIDAD CONCRETA de apertura y exploración"}},
              {{"tiempo": "desarrollo", "descripcion": "ACTIVIDAD CONCRETA de construcción del aprendizaje"}},
              {{"tiempo": "cierre", "descripcion": "ACTIVIDAD CONCRETA de síntesis y evaluación"}}
            ]
          }}
        ]
      }}
    }},
    "observaciones": "Recomendaciones prácticas para implementar la clase"
  }}
}}

- Las ACTIVIDADES deben cubrir exactamente {duracion} en total
- Los MATERIALES deben estar disponibles en escuelas panameñas
- Los OBJETIVOS deben ser MEDIBLES y alcanzables en una sesión

**IMPORTANTE: Responde ÚNICAMENTE con el JSON válido, sin texto adicional, sin comentarios, sin markdown.**"#,
        grado = request.grado_plan,
        materia = request.materia,
        tema = tema,
        duracion = duracion,
        docente = request.nombre_profesor,
        institucion = request.institucion,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduplan_core::plan::Trimester;

    fn request() -> GeneratePlanRequest {
        GeneratePlanRequest {
            nombre_profesor: "Marta Ríos".to_string(),
            institucion: "Colegio José Dolores Moscote".to_string(),
            grado_plan: "7° grado".to_string(),
            materia: "Español".to_string(),
            trimestre: Some("Tercer Trimestre".to_string()),
            tema: None,
            duracion_clase: None,
        }
    }

    #[test]
    fn trimester_prompt_interpolates_request_fields() {
        let req = request();
        let prompt = build_user_prompt(&req, &PlanScope::Trimester(Trimester::Third));
        assert!(prompt.contains("7° grado"));
        assert!(prompt.contains("Español"));
        assert!(prompt.contains("Tercer Trimestre"));
        assert!(prompt.contains("Marta Ríos"));
        assert!(prompt.contains("plan_trimestral"));
    }

    #[test]
    fn topic_prompt_interpolates_topic_and_duration() {
        let req = request();
        let scope = PlanScope::Topic {
            tema: "El párrafo argumentativo".to_string(),
            duracion_clase: "80 minutos".to_string(),
        };
        let prompt = build_user_prompt(&req, &scope);
        assert!(prompt.contains("El párrafo argumentativo"));
        assert!(prompt.contains("80 minutos"));
        assert!(prompt.contains("plan_clase"));
    }
}
