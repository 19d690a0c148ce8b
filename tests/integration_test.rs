use regex::Regex;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wafgen::cli::CliApp;
use wafgen::{ApiParser, Config, WafGen};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/petstore.yaml")
}

fn config_for(output: &Path) -> Config {
    let mut config = Config::for_input(fixture());
    config.output.base_path = output.to_path_buf();
    config
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_full_generation_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("generated");

    let app = WafGen::new(config_for(&output)).unwrap();
    let (api, result) = app.generate_from_input().unwrap();

    assert!(result.is_success(), "errors: {:?}", result.errors);
    assert_eq!(result.models_processed, 4);
    assert!(result.models_skipped.is_empty());
    assert_eq!(result.groups_processed, 2);
    assert_eq!(result.operations_indexed, 4);
    assert_eq!(result.parameters_indexed, 6);
    assert_eq!(result.files_written.len(), 2);
    assert_eq!(result.warnings.len(), 1);

    // 20 slots per operation plus one token per group
    assert_eq!(result.counters.operation, 4_200_001 + 20 * 4 + 2);
    assert_eq!(result.counters.parameter, 4_210_001 + 20 * 6);

    let pet = &api.operation_groups[0];
    assert_eq!(pet.vendor_extensions["x-codegen-globalIndex"], json!(4_200_061u64));
    let store = &api.operation_groups[1];
    assert_eq!(store.vendor_extensions["x-codegen-globalIndex"], json!(4_200_082u64));

    let get_pet = &pet.operations[0];
    assert_eq!(get_pet.vendor_extensions["x-codegen-pathRegex"], json!("/pet/[^/]+"));
    assert_eq!(get_pet.vendor_extensions["x-codegen-authParam"], json!("api_key"));
    assert_eq!(get_pet.vendor_extensions["validateBodySchema"], json!(true));
    assert_eq!(get_pet.params[0].constraints.pattern.as_deref(), Some("^[0-9]{1,19}$"));

    let add_pet = &pet.operations[1];
    assert_eq!(add_pet.vendor_extensions["x-codegen-isJson"], json!(true));
    assert_eq!(add_pet.vendor_extensions["x-codegen-isXml"], json!(true));
    assert_eq!(add_pet.vendor_extensions["x-codegen-globalIndex_1"], json!(4_200_021u64));
    let leaves: Vec<&str> = add_pet.params[0].vendor_extensions["x-codegen-modelProperties"]
        .as_array()
        .unwrap()
        .iter()
        .map(|leaf| leaf["name"].as_str().unwrap())
        .collect();
    assert_eq!(leaves, vec!["body.name", "body.category.name", "body.photoUrls"]);

    let find = &pet.operations[2];
    let status = &find.params[0];
    assert_eq!(status.constraints.min_items, Some(1));
    assert_eq!(status.vendor_extensions["x-codegen-hasArrayMin"], json!(true));
    assert_eq!(status.vendor_extensions["x-codegen-hasArrayMax"], json!(false));
    assert_eq!(
        status.constraints.pattern.as_deref(),
        Some("^(available|pending|sold)$")
    );
    assert_eq!(find.params[1].constraints.pattern.as_deref(), Some("^.*$"));

    let since = &store.operations[0].params[1];
    let since_pattern = Regex::new(since.constraints.pattern.as_deref().unwrap()).unwrap();
    assert!(since_pattern.is_match("2024-02-29"));
    assert!(since_pattern.is_match(""));
    assert!(!since_pattern.is_match("2024-02-30"));
}

#[test]
fn test_schema_document_contents() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("generated");

    let app = WafGen::new(config_for(&output)).unwrap();
    app.generate_from_input().unwrap();

    let schema = read_json(&output.join("schema.json"));
    assert_eq!(schema["$schema"], json!("http://json-schema.org/draft-07/schema#"));
    assert_eq!(schema["title"], json!("OpenAPI Schema Definitions"));

    let names: Vec<&String> = schema["definitions"].as_object().unwrap().keys().collect();
    assert_eq!(names, vec!["Category", "Tag", "Pet", "Order"]);

    let pet = &schema["definitions"]["Pet"];
    assert_eq!(pet["description"], json!("A pet for sale in the pet store"));
    assert_eq!(pet["required"], json!(["name", "photoUrls"]));
    assert_eq!(pet["properties"]["category"], json!({"$ref": "#/definitions/Category"}));
    assert_eq!(
        pet["properties"]["tags"],
        json!({"type": "array", "items": {"$ref": "#/definitions/Tag"}})
    );
    assert_eq!(
        pet["properties"]["photoUrls"],
        json!({"type": "array", "items": {"type": "string"}})
    );
    assert_eq!(
        pet["properties"]["status"]["enum"],
        json!(["available", "pending", "sold"])
    );

    let quantity = &schema["definitions"]["Order"]["properties"]["quantity"];
    assert_eq!(quantity["type"], json!("integer"));
    assert_eq!(quantity["minimum"].as_f64(), Some(1.0));
    assert!(quantity.get("maximum").is_none());
    assert_eq!(
        schema["definitions"]["Order"]["properties"]["shipDate"],
        json!({"type": "string", "format": "date-time"})
    );

    let annotations = read_json(&output.join("operations.json"));
    assert_eq!(annotations["apiVersion"], json!("0.0.2"));
    assert_eq!(annotations["operationGroups"].as_array().unwrap().len(), 2);
}

#[test]
fn test_generation_is_deterministic() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first");
    let second = temp_dir.path().join("second");

    WafGen::new(config_for(&first))
        .unwrap()
        .generate_from_input()
        .unwrap();
    WafGen::new(config_for(&second))
        .unwrap()
        .generate_from_input()
        .unwrap();

    for file in ["schema.json", "operations.json"] {
        assert_eq!(
            std::fs::read_to_string(first.join(file)).unwrap(),
            std::fs::read_to_string(second.join(file)).unwrap(),
            "{file} differs between runs"
        );
    }
}

#[test]
fn test_schema_path_escape_does_not_abort_run() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("generated");

    let mut config = config_for(&output);
    config.generation.json_schema_output_file = "../escape.json".to_string();

    let app = WafGen::new(config).unwrap();
    let (_, result) = app.generate_from_input().unwrap();

    assert!(!result.is_success());
    assert_eq!(result.errors.len(), 1);
    assert!(!temp_dir.path().join("escape.json").exists());
    assert!(output.join("operations.json").exists());
    assert_eq!(result.operations_indexed, 4);
}

#[test]
fn test_dry_run_and_disabled_outputs() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("generated");

    let app = WafGen::new(config_for(&output)).unwrap().with_dry_run(true);
    let (_, result) = app.generate_from_input().unwrap();
    assert!(result.files_written.is_empty());
    assert_eq!(result.models_processed, 4);
    assert!(!output.join("schema.json").exists());

    let mut config = config_for(&output);
    config.generation.generate_json_schema = false;
    config.generation.write_annotations = false;
    let (_, result) = WafGen::new(config)
        .unwrap()
        .generate_from_input()
        .unwrap();
    assert!(result.files_written.is_empty());
    assert_eq!(result.models_processed, 0);
    assert_eq!(result.operations_indexed, 4);
}

#[test]
fn test_custom_seeds_and_body_schema_flag() {
    let temp_dir = TempDir::new().unwrap();

    let mut config = config_for(temp_dir.path());
    config.indexing.operation_seed = 1;
    config.indexing.parameter_seed = 1000;
    config.generation.validate_body_schema = false;

    let app = WafGen::new(config).unwrap().with_dry_run(true);
    let (api, result) = app.generate_from_input().unwrap();

    let get_pet = &api.operation_groups[0].operations[0];
    assert_eq!(get_pet.vendor_extensions["x-codegen-globalIndex_1"], json!(1));
    assert_eq!(get_pet.vendor_extensions["validateBodySchema"], json!(false));
    assert_eq!(get_pet.params[0].vendor_extensions["x-codegen-globalIndex_1"], json!(1000));
    assert_eq!(result.counters.operation, 1 + 20 * 4 + 2);
    assert_eq!(result.counters.parameter, 1000 + 20 * 6);
}

#[test]
fn test_single_model_schema_errors_propagate() {
    let api = ApiParser::new().parse_file(&fixture()).unwrap();
    let app = WafGen::new(Config::for_input(fixture())).unwrap();

    let pet = app.build_model_schema(&api, "Pet").unwrap();
    assert_eq!(pet["title"], json!("Pet"));

    let err = app.build_model_schema(&api, "Unknown").unwrap_err();
    assert!(err.to_string().contains("Unknown"));
}

#[tokio::test]
async fn test_generate_command() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("cli-out");

    let matches = CliApp::app()
        .try_get_matches_from([
            "wafgen",
            "generate",
            "-i",
            fixture().to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--no-schema",
        ])
        .unwrap();
    CliApp::run(&matches).await.unwrap();

    assert!(output.join("operations.json").exists());
    assert!(!output.join("schema.json").exists());
}

#[tokio::test]
async fn test_validate_command_with_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("wafgen.yaml");
    config_for(&temp_dir.path().join("out"))
        .save_to_file(&config_path)
        .unwrap();

    let matches = CliApp::app()
        .try_get_matches_from(["wafgen", "validate", "-c", config_path.to_str().unwrap()])
        .unwrap();
    CliApp::run(&matches).await.unwrap();

    let broken = temp_dir.path().join("broken.yaml");
    std::fs::write(&broken, "version: \"9.9\"\ninput: ./api\noutput:\n  base_path: ./out\n").unwrap();
    let matches = CliApp::app()
        .try_get_matches_from(["wafgen", "validate", "-c", broken.to_str().unwrap()])
        .unwrap();
    assert!(CliApp::run(&matches).await.is_err());
}

#[test]
fn test_load_input_files_lists_what_was_parsed() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("api");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::copy(fixture(), input.join("petstore.yaml")).unwrap();
    std::fs::write(input.join("notes.md"), "ignored").unwrap();

    let app = WafGen::new(Config::for_input(&input)).unwrap();
    let (files, api) = app.load_input_files().unwrap();
    assert_eq!(files, vec![input.join("petstore.yaml")]);
    assert_eq!(api.operation_count(), 4);
}
