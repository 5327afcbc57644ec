mod common;

use common::{template, Cell};
use credit_sheet::{process_workbook, ClientRecord, Config, PromptTemplate, Section};

#[test]
fn writes_record_under_client_directory() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let path = template().write(&input.path().join("zahtev-17.xlsm"));
    let config = Config::default()
        .with_output_dir(output.path())
        .with_prompt_template(PromptTemplate::new("Napiši kreditni komentar."));

    let artifacts = process_workbook(&path, &config).unwrap();

    assert_eq!(artifacts.client, "Mlekara Šabac d.o.o");
    let client_dir = output.path().join("Mlekara Šabac d.o.o");
    assert_eq!(artifacts.record, client_dir.join("Mlekara Šabac d.o.o.json"));
    let record = ClientRecord::read_json(&artifacts.record).unwrap();
    assert_eq!(record.section(Section::Turnover).len(), 2);

    let prompt = std::fs::read_to_string(artifacts.prompt.unwrap()).unwrap();
    assert!(prompt.starts_with("Napiši kreditni komentar.\n\n--- START OF CLIENT JSON DATA ---\n"));
    assert!(prompt.contains("\"Mlekara Šabac d.o.o.\""));
    assert!(prompt.trim_end().ends_with("--- END OF CLIENT JSON DATA ---"));
}

#[test]
fn file_stem_names_clients_without_a_name() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let path = template()
        .edit("Kupac", &[("F6", Some(Cell::Text("  ")))])
        .write(&input.path().join("zahtev-17.xlsm"));

    let artifacts = process_workbook(&path, &Config::default().with_output_dir(output.path())).unwrap();

    assert_eq!(artifacts.client, "zahtev-17");
    assert!(output.path().join("zahtev-17").join("zahtev-17.json").is_file());
    assert_eq!(artifacts.prompt, None);
}

#[test]
fn hard_failures_write_nothing() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let path = input.path().join("stari.xls");
    std::fs::write(&path, [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0, 0]).unwrap();

    assert!(process_workbook(&path, &Config::default().with_output_dir(output.path())).is_err());
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}
