use crmcore::prelude::*;
use eyre::Result;
use std::fs;

/// Kept in its own test binary so that the environment variable cannot leak into other tests
#[test]
fn test_environment_overrides_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("settings.toml");
    fs::write(&path, "[integration]\nlimit = 20\n")?;

    std::env::set_var("CRM_INTEGRATION_LIMIT", "300");
    let settings = Settings::read(path.to_str().unwrap());
    std::env::remove_var("CRM_INTEGRATION_LIMIT");

    assert_eq!(settings?.integration.limit, 300);
    Ok(())
}
