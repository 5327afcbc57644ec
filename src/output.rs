//! Writes the artifacts of one processed workbook below the output directory.
use crate::config::Config;
use crate::error::ExtractionError;
use crate::error::ResultMessage;
use crate::extract::extract;
use crate::record::ClientRecord;
use chrono::Local;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tracing::info;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const PROMPTS_DIR: &str = "prompts";

/// Files written for one workbook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifacts {
    /// Directory name derived from the client name
    pub client: String,
    pub record: PathBuf,
    pub prompt: Option<PathBuf>,
}

/// Extracts a workbook and writes `<client>/<client>.json`, plus a
/// timestamped prompt file when the config carries a template.
pub fn process_workbook<P: AsRef<Path>>(path: P, config: &Config) -> Result<Artifacts, ExtractionError> {
    let path = path.as_ref();
    let record = extract(path)?;
    let fallback = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    let client = sanitize(record.client_name().unwrap_or(&fallback));
    write_artifacts(&record, &client, config)
}

/// Writes the artifacts of an already extracted record.
pub fn write_artifacts(record: &ClientRecord, client: &str, config: &Config) -> Result<Artifacts, ExtractionError> {
    let client_dir = config.output_dir.join(client);
    fs::create_dir_all(&client_dir)?;
    let record_path = client_dir.join(format!("{client}.json"));
    record.write_json(&record_path)
        .with_prefix(&format!("Failed to write '{}'", record_path.display()))?;
    info!(client = %client, path = %record_path.display(), "wrote client record");

    let prompt = match &config.prompt_template {
        Some(template) => {
            let prompts_dir = client_dir.join(PROMPTS_DIR);
            fs::create_dir_all(&prompts_dir)?;
            let timestamp = Local::now().format(TIMESTAMP_FORMAT);
            let prompt_path = prompts_dir.join(format!("{timestamp}_{client}_prompt.txt"));
            fs::write(&prompt_path, template.render(record)?)?;
            info!(client = %client, path = %prompt_path.display(), "wrote prompt");
            Some(prompt_path)
        }
        None => None,
    };

    Ok(Artifacts {
        client: client.to_owned(),
        record: record_path,
        prompt,
    })
}

/// Makes a client name safe to use as a single path component.
pub fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|character| match character {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            character if character.is_control() => '_',
            character => character,
        })
        .collect();
    let cleaned = cleaned.trim_matches(|character: char| character == '.' || character.is_whitespace());
    if cleaned.is_empty() {
        "client".to_owned()
    } else {
        cleaned.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptTemplate;
    use crate::record::{assemble, Section, Value};

    #[test]
    fn sanitized_names() {
        assert_eq!(sanitize("Mlekara Šabac d.o.o."), "Mlekara Šabac d.o.o");
        assert_eq!(sanitize("A/B: \"C\""), "A_B_ _C_");
        assert_eq!(sanitize(" .. "), "client");
    }

    #[test]
    fn writes_record_and_prompt() -> Result<(), ExtractionError> {
        let dir = tempfile::tempdir()?;
        let record = assemble(vec![(Section::Proposal, Ok(vec![Value::Map(vec![
            ("Atribut".to_owned(), Value::from("Iznos")),
            ("Vrednost RSD".to_owned(), Value::Int(5_000_000)),
        ])]))]);
        let config = Config::default()
            .with_output_dir(dir.path())
            .with_prompt_template(PromptTemplate::new("Analiza"));

        let artifacts = write_artifacts(&record, "Firma", &config)?;
        assert_eq!(artifacts.record, dir.path().join("Firma").join("Firma.json"));
        assert_eq!(ClientRecord::read_json(&artifacts.record)?, record);

        let prompt = artifacts.prompt.unwrap();
        assert_eq!(prompt.parent(), Some(dir.path().join("Firma").join("prompts").as_path()));
        assert!(prompt.to_string_lossy().ends_with("_Firma_prompt.txt"));
        assert!(fs::read_to_string(prompt)?.starts_with("Analiza\n\n--- START OF CLIENT JSON DATA ---"));
        Ok(())
    }

    #[test]
    fn prompt_is_optional() -> Result<(), ExtractionError> {
        let dir = tempfile::tempdir()?;
        let config = Config::default().with_output_dir(dir.path());
        let artifacts = write_artifacts(&assemble(Vec::new()), "Firma", &config)?;
        assert_eq!(artifacts.prompt, None);
        assert!(!dir.path().join("Firma").join("prompts").exists());
        Ok(())
    }
}
