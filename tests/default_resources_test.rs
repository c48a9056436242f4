//! Default resources and settings wiring.
//!
//! Installing default resources mutates process-wide state, so everything
//! touching the global list lives in a single test.

mod common;

use confcarrier::infrastructure::config::{BUILTIN_SOURCE, SETTINGS_PATH};
use confcarrier::{
    Configuration, ConfigurationCarrier, ConfigurationError, DefaultResources, SettingsLoader,
};

#[test]
fn test_settings_drive_default_resources() {
    common::setup_test_logging();
    let dir = common::temp_dir();
    let site = common::write_yaml(
        dir.path(),
        "site.yaml",
        "fs.defaultFS: hdfs://namenode:8020\nmapreduce:\n  job:\n    reduces: 4\n",
    );
    let settings_path = common::write_yaml(
        dir.path(),
        "settings.yaml",
        &format!(
            "default_resources:\n  - {}\nbuiltin_defaults: true\n",
            site.display()
        ),
    );

    let settings = SettingsLoader::load_from_file(&settings_path).unwrap();
    DefaultResources::install(DefaultResources::from_settings(&settings));

    let conf = Configuration::new();
    assert_eq!(conf.get("fs.defaultFS").as_deref(), Some("hdfs://namenode:8020"));
    assert_eq!(conf.get_i64("mapreduce.job.reduces", 1).unwrap(), 4);
    assert_eq!(conf.get("io.file.buffer.size").as_deref(), Some("4096"));
    assert_eq!(
        conf.property_sources("fs.defaultFS").unwrap(),
        &[BUILTIN_SOURCE.to_string(), site.display().to_string()]
    );

    // Jobs built from a carrier never pick up the installed defaults.
    let mut carrier = ConfigurationCarrier::new(
        [("only", "this")].into_iter().collect::<Configuration>(),
    );
    let job = ConfigurationCarrier::build_job(Some(&mut carrier)).unwrap();
    assert_eq!(job.configuration().len(), 1);
    assert!(!job.configuration().contains("fs.defaultFS"));

    // A broken resource is skipped by Configuration::new but fails try_new and
    // default job construction.
    let broken = common::write_yaml(dir.path(), "broken.yaml", "- not\n- a mapping\n");
    DefaultResources::add_global_resource(&broken);

    let lenient = Configuration::new();
    assert_eq!(lenient.get("fs.defaultFS").as_deref(), Some("hdfs://namenode:8020"));
    assert!(matches!(
        Configuration::try_new(),
        Err(ConfigurationError::ResourceShape { .. })
    ));
    assert!(ConfigurationCarrier::build_job(None).is_err());

    DefaultResources::install(DefaultResources::default());
}

#[test]
fn test_settings_path_is_project_local() {
    assert!(SETTINGS_PATH.starts_with(".confcarrier/"));
}
