use super::types::ServerConfig;
use std::fs;
use std::path::{Path, PathBuf};
use stratadb_commons::engines;

const VALID_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const VALID_FORMATS: [&str; 2] = ["compact", "json"];

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        let mut config: ServerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        config.finalize()?;

        Ok(config)
    }

    /// Make the logs directory absolute (relative to the working directory).
    fn normalize_paths(&mut self) {
        let path = PathBuf::from(&self.logging.logs_path);
        if path.is_relative() {
            if let Ok(cwd) = std::env::current_dir() {
                self.logging.logs_path = cwd.join(path).to_string_lossy().into_owned();
            }
        }
    }

    /// Normalize paths and validate configuration.
    pub fn finalize(&mut self) -> anyhow::Result<()> {
        self.normalize_paths();
        self.validate()?;
        Ok(())
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LEVELS.join(", ")
            ));
        }

        if !VALID_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                VALID_FORMATS.join(", ")
            ));
        }

        for (target, level) in &self.logging.targets {
            if !VALID_LEVELS.contains(&level.as_str()) {
                return Err(anyhow::anyhow!(
                    "Invalid log level '{}' for target '{}'. Must be one of: {}",
                    level,
                    target,
                    VALID_LEVELS.join(", ")
                ));
            }
        }

        if self.datafusion.batch_size == 0 {
            return Err(anyhow::anyhow!("datafusion.batch_size cannot be 0"));
        }

        if self.datafusion.target_partitions == 0 {
            return Err(anyhow::anyhow!("datafusion.target_partitions cannot be 0"));
        }

        if self.system_tables.schema_name.trim().is_empty() {
            return Err(anyhow::anyhow!("system_tables.schema_name cannot be empty"));
        }

        if self.catalog.old_parts_lifetime_secs < 0 {
            return Err(anyhow::anyhow!("catalog.old_parts_lifetime_secs cannot be negative"));
        }

        for table in &self.catalog.tables {
            if !self.catalog.databases.contains(&table.database) {
                return Err(anyhow::anyhow!(
                    "Table '{}.{}' refers to undeclared database '{}'",
                    table.database,
                    table.name,
                    table.database
                ));
            }

            if !engines::ALL.contains(&table.engine.as_str()) {
                return Err(anyhow::anyhow!(
                    "Invalid engine '{}' for table '{}.{}'. Must be one of: {}",
                    table.engine,
                    table.database,
                    table.name,
                    engines::ALL.join(", ")
                ));
            }

            if table.engine == engines::MEMORY && !table.parts.is_empty() {
                return Err(anyhow::anyhow!(
                    "Table '{}.{}' uses the Memory engine and cannot have parts",
                    table.database,
                    table.name
                ));
            }
        }

        Ok(())
    }
}
