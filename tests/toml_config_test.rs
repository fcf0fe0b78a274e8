use anyhow::Result;
use blend_client::core::ConfigProvider;
use blend_client::utils::validation::Validate;
use blend_client::{BlendEngine, BlendJob, HttpBlendApi, LocalStorage, OutputMode, TomlConfig};
use httpmock::prelude::*;
use tempfile::TempDir;

#[tokio::test]
async fn test_toml_config_drives_a_full_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path().to_str().unwrap().replace('\\', "/");
    tokio::fs::write(temp_dir.path().join("output_a.xml"), "<robot a/>").await?;
    tokio::fs::write(temp_dir.path().join("output_b.xml"), "<robot b/>").await?;

    let server = MockServer::start();
    std::env::set_var("BLEND_TOML_TEST_API_KEY", "rocks");

    let config_content = format!(
        r#"
[server]
scheme = "http"
host = "{host}"
port = {port}
resource = "blend"
api_key = "${{BLEND_TOML_TEST_API_KEY}}"
timeout_seconds = 5

[upload]
files = ["{dir}/output_a.xml", "{dir}/output_b.xml"]

[output]
path = "{dir}/results/out.ods"
mode = "binary"
"#,
        host = server.host(),
        port = server.port(),
        dir = temp_path,
    );
    let config_path = temp_dir.path().join("blend.toml");
    tokio::fs::write(&config_path, config_content).await?;

    let config = TomlConfig::from_file(&config_path)?;
    config.validate()?;
    assert_eq!(config.api_key(), Some("rocks"));
    assert_eq!(config.output_mode(), OutputMode::Binary);

    let uploads = server.mock(|when, then| {
        when.method(POST)
            .path_contains("/api/v1/blend/upload/output_")
            .header("theapikey", "rocks");
        then.status(200);
    });
    let list = server.mock(|when, then| {
        when.method(GET).path("/api/v1/blend/list");
        then.status(200).body("[\"output_a.xml\", \"output_b.xml\"]");
    });
    let blend = server.mock(|when, then| {
        when.method(GET).path("/api/v1/blend/blend");
        then.status(200).body("not a spreadsheet");
    });

    let api = HttpBlendApi::new(&config)?;
    let engine = BlendEngine::new(api, LocalStorage::default(), BlendJob::from_config(&config));
    let report = engine.run().await?;

    uploads.assert_hits(2);
    list.assert_hits(1);
    blend.assert_hits(1);
    assert_eq!(report.uploaded.len(), 2);
    assert_eq!(
        tokio::fs::read(temp_dir.path().join("results/out.ods")).await?,
        b"not a spreadsheet"
    );

    std::env::remove_var("BLEND_TOML_TEST_API_KEY");
    Ok(())
}
