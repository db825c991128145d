use ts_rs::TS;

pub fn generate_typescript_definitions(
    type_names: &[&str],
) -> Result<String, Box<dyn std::error::Error>> {
    if type_names.is_empty() {
        return Err("No type names provided".into());
    }

    let mut definitions = Vec::new();

    for name in type_names {
        let cleaned = clean_type(export_type(name)?);

        if !cleaned.trim().is_empty() {
            definitions.push(cleaned);
        }
    }

    Ok(definitions.join("\n\n"))
}

fn export_type(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    use crate::*;

    let result = match name {
        "ChatRequest" => ChatRequest::export_to_string()?,
        "NewThreadResponse" => NewThreadResponse::export_to_string()?,
        "ChatReplyResponse" => ChatReplyResponse::export_to_string()?,
        "ChatErrorResponse" => ChatErrorResponse::export_to_string()?,
        "HealthResponse" => HealthResponse::export_to_string()?,
        _ => {
            return Err(format!(
                "Unknown type: '{}'. Available types can be found in shared-types/src/",
                name
            )
            .into());
        }
    };

    Ok(result)
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
