use crate::output::print_json;
use memsweep_core::paths::validate_memory_path;

pub fn run(path: &str, json: bool) -> anyhow::Result<()> {
    let result = validate_memory_path(path);

    if json {
        match &result {
            Ok(p) => print_json(&serde_json::json!({ "valid": true, "path": p }))?,
            Err(e) => print_json(&serde_json::json!({ "valid": false, "reason": e.to_string() }))?,
        }
    } else if let Ok(p) = &result {
        println!("ok: {}", p.display());
    }

    result?;
    Ok(())
}
