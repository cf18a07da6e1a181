use figment::Jail;
use mart_config::MartConfig;

#[test]
fn load_reads_project_config_and_env() {
    Jail::expect_with(|jail| {
        std::fs::create_dir(".mart").map_err(|e| e.to_string())?;
        jail.create_file(
            ".mart/config.toml",
            r#"
[database]
path = "project.db"
"#,
        )?;

        let config = MartConfig::load().expect("config loads");
        assert_eq!(config.database.path, "project.db");

        jail.set_env("MART_DATABASE__PATH", ":memory:");
        let config = MartConfig::load().expect("config loads");
        assert!(config.database.is_in_memory());
        Ok(())
    });
}
