use shared_types::generate_typescript_definitions;
use shared_types::typescript_gen::API_TYPE_NAMES;
use std::fs;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Output directory can be overridden by the first argument
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("web/api-types"));
    fs::create_dir_all(&output_dir)?;

    let mut output = generate_typescript_definitions(API_TYPE_NAMES)?;
    output.push('\n');

    let output_path = output_dir.join("types.ts");
    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}
