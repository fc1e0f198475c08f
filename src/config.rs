use crate::annotation::Markers;
use crate::naming::{NamingStrategy, DEFAULT_SUFFIX};
use crate::processor::Processor;
use crate::synth::{CodeSynthesizer, SynthesizerOptions, FILE_EXTENSION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImplgenConfig {
    pub naming: NamingStrategy,
    pub suffix: String,
    pub extension: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub allow_non_numeric: bool,
    pub warn_on_non_interface: bool,
    // Tables last so the TOML form stays valid
    pub markers: Markers,
}

impl Default for ImplgenConfig {
    fn default() -> Self {
        Self {
            naming: NamingStrategy::default(),
            suffix: DEFAULT_SUFFIX.to_string(),
            extension: FILE_EXTENSION.to_string(),
            output: None,
            allow_non_numeric: false,
            warn_on_non_interface: false,
            markers: Markers::default(),
        }
    }
}

impl ImplgenConfig {
    /// Build a processor wired with this configuration
    pub fn processor(&self) -> Processor {
        let synthesizer = CodeSynthesizer::new(self.markers.clone(), self.naming.policy(&self.suffix))
            .with_options(SynthesizerOptions {
                allow_non_numeric: self.allow_non_numeric,
                warn_on_non_interface: self.warn_on_non_interface,
            });
        Processor::new(synthesizer).with_extension(self.extension.clone())
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("implgen.toml")
}

pub fn default_output_dir() -> PathBuf {
    PathBuf::from("build").join("generated").join("implgen")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<ImplgenConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: ImplgenConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &ImplgenConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_output_dir(dir: &Path) -> anyhow::Result<()> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
