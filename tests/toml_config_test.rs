use storm_etl::core::ConfigProvider;
use storm_etl::domain::model::BadRowPolicy;
use storm_etl::utils::validation::Validate;
use storm_etl::TomlConfig;

#[test]
fn test_demo_config_parses_and_validates() {
    let config = TomlConfig::from_file("demos/storm-report.toml").unwrap();

    assert_eq!(config.report.name, "storm-damage");
    assert_eq!(config.top_n(), 10);
    assert_eq!(config.bad_row_policy(), BadRowPolicy::Abort);
    assert_eq!(config.columns().crop_damage_unit, "CROPDMGEXP");
    assert_eq!(config.archive_name().as_deref(), Some("storm_report.zip"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_config_file_is_io_error() {
    let result = TomlConfig::from_file("demos/does-not-exist.toml");
    assert!(matches!(result, Err(storm_etl::EtlError::IoError(_))));
}
