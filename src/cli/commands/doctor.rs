//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::{Settings, VectorIndexProvider};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Svar Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    // Check API keys
    println!("{}", style("API Configuration").bold());
    let api_check = check_openai_api_key();
    api_check.print();
    checks.push(api_check);

    let pinecone_check = check_pinecone_api_key(settings);
    pinecone_check.print();
    checks.push(pinecone_check);

    println!();

    // Check vector backend selection
    println!("{}", style("Vector Index").bold());
    let backend_checks = check_vector_backend(settings);
    for check in &backend_checks {
        check.print();
    }
    checks.extend(backend_checks);

    println!();

    // Check configuration
    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Svar.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!(
            "All checks passed with {} warning(s).",
            warnings
        ));
    } else {
        Output::success("All checks passed! Svar is ready to use.");
    }

    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_openai_api_key() -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.starts_with("sk-") && key.len() > 20 => {
            let masked = format!("{}...{}", &key[..7], &key[key.len() - 4..]);
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", masked))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Ok(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

/// Check the Pinecone key when that backend is selected.
fn check_pinecone_api_key(settings: &Settings) -> CheckResult {
    let key_env = &settings.vector_index.api_key_env;
    match settings.vector_index.provider {
        VectorIndexProvider::Memory => {
            CheckResult::ok(key_env, "not required (memory backend)")
        }
        VectorIndexProvider::Pinecone => match std::env::var(key_env) {
            Ok(key) if !key.is_empty() => {
                let masked = if key.len() > 8 {
                    format!("{}...{}", &key[..4], &key[key.len() - 4..])
                } else {
                    "set".to_string()
                };
                CheckResult::ok(key_env, &format!("configured ({})", masked))
            }
            Ok(_) => CheckResult::error(
                key_env,
                "empty",
                &format!("Set with: export {}='...'", key_env),
            ),
            Err(_) => CheckResult::error(
                key_env,
                "not set",
                &format!("Set with: export {}='...'", key_env),
            ),
        },
    }
}

/// Check vector backend configuration.
fn check_vector_backend(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    match settings.vector_index.provider {
        VectorIndexProvider::Memory => {
            results.push(CheckResult::warning(
                "Backend",
                "memory (vectors are lost on restart)",
                "Set vector_index.provider = \"pinecone\" for persistence",
            ));
        }
        VectorIndexProvider::Pinecone => {
            results.push(CheckResult::ok(
                "Backend",
                &format!("pinecone ({})", settings.vector_index.index_name),
            ));
            if settings.vector_index.host.is_empty() {
                results.push(CheckResult::error(
                    "Index host",
                    "not configured",
                    "Set vector_index.host to your index's data-plane URL",
                ));
            } else {
                results.push(CheckResult::ok("Index host", &settings.vector_index.host));
            }
        }
    }

    results.push(CheckResult::ok(
        "Embedding",
        &format!(
            "{} ({} dimensions)",
            settings.embedding.model, settings.embedding.dimensions
        ),
    ));

    results
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: svar config edit",
        )
    }
}
