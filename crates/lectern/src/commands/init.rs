use anyhow::Result;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# Lectern Configuration

[server]
host = "127.0.0.1"
port = 3000
index_page = "./web/index.html"

[documents]
root = "./doc_sets"

[engine]
binary = "./search_engine"

[generative]
model = "gemini-2.0-flash"
max_retries = 3
backoff_base_secs = 1
summarize_timeout_secs = 30
answer_timeout_secs = 90
"#;

/// Initialize a new config file
pub fn run_init(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Config already exists at {:?}", path);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG)?;
    println!("Created config at {:?}", path);
    Ok(())
}
