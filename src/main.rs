use std::path::Path;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use magistral_lib::config::EngineConfig;
use magistral_lib::intelligence::{FormulaEngine, ReferenceData};
use magistral_lib::pipeline::bulk_import::BulkImporter;
use magistral_lib::pipeline::llm::OllamaClient;

const USAGE: &str = "usage: magistral <analyze|import> <file>";

fn main() -> ExitCode {
    magistral_lib::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, path) = match args.as_slice() {
        [command, path] => (command.as_str(), Path::new(path)),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    let config = EngineConfig::from_env();
    let result = match command {
        "analyze" => analyze(&config, path),
        "import" => import(&config, path),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn read_input(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}

fn analyze(config: &EngineConfig, path: &Path) -> Result<String, String> {
    let text = read_input(path)?;
    let reference = ReferenceData::load_or_builtin(&config.reference_dir).map_err(|e| e.to_string())?;
    let engine = FormulaEngine::new(Arc::new(reference)).with_cache_capacity(config.cache_capacity);

    let analysis = engine.analyze(&text);
    serde_json::to_string_pretty(&analysis).map_err(|e| e.to_string())
}

fn import(config: &EngineConfig, path: &Path) -> Result<String, String> {
    let text = read_input(path)?;
    let client =
        OllamaClient::new(&config.ollama_url, config.llm_timeout_secs).map_err(|e| e.to_string())?;
    let importer =
        BulkImporter::new(&client, config.import_config()).map_err(|e| e.to_string())?;

    let report = importer
        .run(&text, &AtomicBool::new(false))
        .map_err(|e| e.to_string())?;
    serde_json::to_string_pretty(&report).map_err(|e| e.to_string())
}
