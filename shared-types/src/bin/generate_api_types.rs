use shared_types::generate_typescript_definitions;
use std::fs;
use std::path::Path;

const API_TYPES: &[&str] = &[
    "ChatRequest",
    "NewThreadResponse",
    "ChatReplyResponse",
    "ChatErrorResponse",
    "HealthResponse",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = Path::new("web/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = generate_typescript_definitions(API_TYPES)?;

    fs::write(&output_path, format!("{}\n", output))?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}
