//! Artifact Writer - emits generated source plus dependency metadata
//!
//! `CodeGenerator` is the file-creation side channel the host provides.
//! `ArtifactWriter` renders a synthesized class through it and reports
//! whether the artifact was created, changed, or rewritten byte-identically.

use crate::{Error, Result};
use crate::synth::{render_class, SynthesizedClass, FILE_EXTENSION};
use crate::uri::DeclarationId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the dependency manifest written next to generated sources
pub const MANIFEST_FILE: &str = "implgen-deps.json";

/// Links a generated artifact to the sources that invalidate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDescriptor {
    /// Aggregating artifacts depend on every input, not just `sources`
    pub aggregating: bool,
    /// Originating source files
    pub sources: Vec<String>,
}

impl DependencyDescriptor {
    /// Non-aggregating dependency on the file that declares `declaration`
    pub fn isolating(declaration: &DeclarationId) -> Self {
        Self {
            aggregating: false,
            sources: vec![declaration.file.clone()],
        }
    }
}

/// Relative artifact path: `<package as dirs>/<name>.<ext>`
pub fn artifact_path(package: &str, file_name: &str, extension: &str) -> String {
    if package.is_empty() {
        format!("{}.{}", file_name, extension)
    } else {
        format!("{}/{}.{}", package.replace('.', "/"), file_name, extension)
    }
}

/// File-creation side channel provided by the host.
pub trait CodeGenerator {
    /// Create or truncate an artifact and return a sink for its text
    fn create_new_file(
        &mut self,
        package: &str,
        file_name: &str,
        extension: &str,
        dependencies: &DependencyDescriptor,
    ) -> Result<Box<dyn Write + '_>>;

    /// Current content of an artifact, if one exists
    fn existing_content(&self, _package: &str, _file_name: &str, _extension: &str) -> Option<Vec<u8>> {
        None
    }
}

/// Writes artifacts below a root directory and tracks their dependencies.
#[derive(Debug)]
pub struct FsCodeGenerator {
    root: PathBuf,
    manifest: BTreeMap<String, DependencyDescriptor>,
}

impl FsCodeGenerator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            manifest: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Dependencies recorded so far, keyed by artifact path
    pub fn dependencies(&self) -> &BTreeMap<String, DependencyDescriptor> {
        &self.manifest
    }

    /// Write the dependency manifest and return its path
    pub fn write_manifest(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.root.join(MANIFEST_FILE);
        let mut contents = serde_json::to_string_pretty(&self.manifest)?;
        contents.push('\n');
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

impl CodeGenerator for FsCodeGenerator {
    fn create_new_file(
        &mut self,
        package: &str,
        file_name: &str,
        extension: &str,
        dependencies: &DependencyDescriptor,
    ) -> Result<Box<dyn Write + '_>> {
        let relative = artifact_path(package, file_name, extension);
        if relative.split('/').any(|segment| matches!(segment, "" | "." | "..")) {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("artifact path {} leaves the output root", relative),
            )));
        }
        let path = self.root.join(&relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&path)?;
        self.manifest.insert(relative, dependencies.clone());
        Ok(Box::new(BufWriter::new(file)))
    }

    fn existing_content(&self, package: &str, file_name: &str, extension: &str) -> Option<Vec<u8>> {
        std::fs::read(self.root.join(artifact_path(package, file_name, extension))).ok()
    }
}

/// Keeps artifacts in memory (for tests and dry runs).
#[derive(Debug, Default)]
pub struct MemoryCodeGenerator {
    pub files: BTreeMap<String, Vec<u8>>,
    pub dependencies: BTreeMap<String, DependencyDescriptor>,
}

impl MemoryCodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifact content as text
    pub fn text(&self, path: &str) -> Option<&str> {
        self.files.get(path).and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}

impl CodeGenerator for MemoryCodeGenerator {
    fn create_new_file(
        &mut self,
        package: &str,
        file_name: &str,
        extension: &str,
        dependencies: &DependencyDescriptor,
    ) -> Result<Box<dyn Write + '_>> {
        let relative = artifact_path(package, file_name, extension);
        self.dependencies.insert(relative.clone(), dependencies.clone());
        let buffer = self.files.entry(relative).or_default();
        buffer.clear();
        Ok(Box::new(buffer))
    }

    fn existing_content(&self, package: &str, file_name: &str, extension: &str) -> Option<Vec<u8>> {
        self.files.get(&artifact_path(package, file_name, extension)).cloned()
    }
}

/// Outcome of writing one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStatus {
    Created,
    Updated,
    /// Rewritten with byte-identical content
    Unchanged,
}

impl WriteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteStatus::Created => "created",
            WriteStatus::Updated => "updated",
            WriteStatus::Unchanged => "unchanged",
        }
    }
}

impl std::fmt::Display for WriteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of writing a synthesized class
#[derive(Debug, Clone, Serialize)]
pub struct WriteResult {
    pub source: DeclarationId,
    /// Qualified name of the generated class
    pub class: String,
    /// Artifact path relative to the generator root
    pub path: String,
    /// blake3 hash of the artifact content
    pub hash: String,
    pub status: WriteStatus,
    pub bytes: usize,
}

/// Renders synthesized classes into a `CodeGenerator`.
pub struct ArtifactWriter<'a> {
    codegen: &'a mut dyn CodeGenerator,
    extension: String,
}

impl<'a> ArtifactWriter<'a> {
    pub fn new(codegen: &'a mut dyn CodeGenerator) -> Self {
        Self {
            codegen,
            extension: FILE_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Create or overwrite the artifact for `class`.
    pub fn write(&mut self, class: &SynthesizedClass, dependencies: &DependencyDescriptor) -> Result<WriteResult> {
        let content = render_class(class);
        let hash = blake3::hash(content.as_bytes()).to_string();

        let status = match self.codegen.existing_content(&class.package, &class.name, &self.extension) {
            None => WriteStatus::Created,
            Some(previous) if blake3::hash(&previous).to_string() == hash => WriteStatus::Unchanged,
            Some(_) => WriteStatus::Updated,
        };

        {
            let mut sink = self.codegen.create_new_file(&class.package, &class.name, &self.extension, dependencies)?;
            sink.write_all(content.as_bytes())?;
            sink.flush()?;
        }

        let path = artifact_path(&class.package, &class.name, &self.extension);
        tracing::debug!("Wrote {} ({}, {} bytes)", path, status, content.len());

        Ok(WriteResult {
            source: class.source.clone(),
            class: class.qualified_name(),
            path,
            hash,
            status,
            bytes: content.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{AnnotationInstance, ClassDeclaration, FunctionDeclaration, TypeRef};
    use crate::synth::CodeSynthesizer;

    fn calculator_class() -> SynthesizedClass {
        let decl = ClassDeclaration::interface("com.example", "Calculator.kt", "Calculator")
            .with_annotation(AnnotationInstance::message("AutoGeneratedCalculator", "Generated"))
            .with_function(
                FunctionDeclaration::new("sum")
                    .with_parameter("x", TypeRef::new("Int"))
                    .with_parameter("y", TypeRef::new("Int"))
                    .returning(TypeRef::new("Int"))
                    .with_annotation(AnnotationInstance::message("SUM", "Adding")),
            );
        CodeSynthesizer::default().synthesize(&decl).unwrap().unwrap()
    }

    #[test]
    fn test_artifact_path() {
        assert_eq!(artifact_path("com.example", "CalculatorImpl", "kt"), "com/example/CalculatorImpl.kt");
        assert_eq!(artifact_path("", "CalculatorImpl", "kt"), "CalculatorImpl.kt");
    }

    #[test]
    fn test_write_is_idempotent() {
        let class = calculator_class();
        let deps = DependencyDescriptor::isolating(&class.source);
        let mut codegen = MemoryCodeGenerator::new();

        let first = ArtifactWriter::new(&mut codegen).write(&class, &deps).unwrap();
        let bytes = codegen.files["com/example/CalculatorImpl.kt"].clone();
        let second = ArtifactWriter::new(&mut codegen).write(&class, &deps).unwrap();

        assert_eq!(first.status, WriteStatus::Created);
        assert_eq!(second.status, WriteStatus::Unchanged);
        assert_eq!(first.hash, second.hash);
        assert_eq!(codegen.files["com/example/CalculatorImpl.kt"], bytes);
        assert_eq!(codegen.files.len(), 1);
    }

    #[test]
    fn test_write_reports_update() {
        let mut class = calculator_class();
        let deps = DependencyDescriptor::isolating(&class.source);
        let mut codegen = MemoryCodeGenerator::new();

        ArtifactWriter::new(&mut codegen).write(&class, &deps).unwrap();
        class.methods[0] = crate::synth::GeneratedMethod::report("Regenerated");
        let result = ArtifactWriter::new(&mut codegen).write(&class, &deps).unwrap();

        assert_eq!(result.status, WriteStatus::Updated);
        assert!(codegen.text(&result.path).unwrap().contains("sink(\"Regenerated\")"));
    }

    #[test]
    fn test_fs_generator_writes_files_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let class = calculator_class();
        let deps = DependencyDescriptor::isolating(&class.source);
        let mut codegen = FsCodeGenerator::new(dir.path());

        let result = ArtifactWriter::new(&mut codegen).write(&class, &deps).unwrap();
        let written = std::fs::read_to_string(dir.path().join(&result.path)).unwrap();
        assert!(written.starts_with("// Generated by implgen"));
        assert_eq!(result.bytes, written.len());

        let manifest_path = codegen.write_manifest().unwrap();
        let manifest: BTreeMap<String, DependencyDescriptor> =
            serde_json::from_str(&std::fs::read_to_string(manifest_path).unwrap()).unwrap();
        assert_eq!(manifest["com/example/CalculatorImpl.kt"].sources, vec!["Calculator.kt"]);
        assert!(!manifest["com/example/CalculatorImpl.kt"].aggregating);
    }

    #[test]
    fn test_fs_generator_stays_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut codegen = FsCodeGenerator::new(dir.path().join("out"));
        let deps = DependencyDescriptor::isolating(&DeclarationId::new("p", "A.kt", "A"));

        for package in [".tmp.escape", "a..b", "com...parent"] {
            assert!(codegen.create_new_file(package, "AImpl", "kt", &deps).is_err(), "{}", package);
        }
        assert!(codegen.dependencies().is_empty());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_custom_extension() {
        let class = calculator_class();
        let mut codegen = MemoryCodeGenerator::new();
        let result = ArtifactWriter::new(&mut codegen)
            .with_extension("gen.kt")
            .write(&class, &DependencyDescriptor::isolating(&class.source))
            .unwrap();
        assert_eq!(result.path, "com/example/CalculatorImpl.gen.kt");
    }
}
