use crate::core::compiler::{Compiler, EmitFormat};
use crate::core::Storage;
use crate::utils::error::{PlaybookError, Result};
use crate::utils::validation::{self, Validate};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub emit: EmitFormat,
}

impl ConversionRequest {
    /// Output defaults to the input path with the format's extension.
    pub fn new(input: impl Into<PathBuf>, output: Option<PathBuf>, emit: EmitFormat) -> Self {
        let input = input.into();
        let output = output.unwrap_or_else(|| input.with_extension(emit.extension()));
        Self {
            input,
            output,
            emit,
        }
    }
}

impl Validate for ConversionRequest {
    /// A default output can land on the input itself (`plays/iso.svg` with
    /// `--emit svg`), which would overwrite the source.
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_path("output", &self.output)?;
        if self.output == self.input {
            return Err(PlaybookError::InvalidConfigValueError {
                field: "output".to_string(),
                value: self.output.display().to_string(),
                reason: "Output would overwrite the input file".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub output: PathBuf,
    pub entities: usize,
    pub interactions: usize,
    pub warnings: usize,
}

pub struct ConversionEngine<S: Storage> {
    storage: S,
    compiler: Compiler,
}

impl<S: Storage> ConversionEngine<S> {
    pub fn new(storage: S, compiler: Compiler) -> Self {
        Self { storage, compiler }
    }

    pub async fn run(&self, request: &ConversionRequest) -> Result<ConversionReport> {
        request.validate()?;

        tracing::info!("📖 Reading {}", request.input.display());
        let bytes = self.storage.read_file(&request.input).await?;
        let source = String::from_utf8(bytes).map_err(|e| {
            PlaybookError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        tracing::info!("🛠️ Compiling {} bytes as {:?}", source.len(), request.emit);
        let (output, compilation) = self.compiler.emit(&source, request.emit)?;

        tracing::info!("💾 Writing {}", request.output.display());
        self.storage
            .write_file(&request.output, output.as_bytes())
            .await?;

        Ok(ConversionReport {
            output: request.output.clone(),
            entities: compilation.scene.entities.len(),
            interactions: compilation.scene.interactions.len(),
            warnings: compilation.diagnostics.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put(&self, path: &str, data: &[u8]) {
            self.files.lock().await.insert(PathBuf::from(path), data.to_vec());
        }

        async fn get(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(Path::new(path)).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                PlaybookError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                ))
            })
        }

        async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_path_buf(), data.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_default_output_path_follows_format() {
        let svg = ConversionRequest::new("plays/horns.playbook", None, EmitFormat::Svg);
        assert_eq!(svg.output, PathBuf::from("plays/horns.svg"));

        let scene = ConversionRequest::new("plays/horns.playbook", None, EmitFormat::Scene);
        assert_eq!(scene.output, PathBuf::from("plays/horns.json"));

        let explicit = ConversionRequest::new(
            "horns.playbook",
            Some(PathBuf::from("out/diagram.svg")),
            EmitFormat::Svg,
        );
        assert_eq!(explicit.output, PathBuf::from("out/diagram.svg"));
    }

    #[tokio::test]
    async fn test_run_writes_svg_and_reports_counts() {
        let storage = MockStorage::default();
        storage
            .put(
                "horns.playbook",
                b"players = { p1, p2 } state = { baller = p1, position = { p1 = (0, 0), p2 = (10, 10) } } action = { pass = { p1 -> p2 } }",
            )
            .await;

        let engine = ConversionEngine::new(storage.clone(), Compiler::default());
        let request = ConversionRequest::new("horns.playbook", None, EmitFormat::Svg);
        let report = engine.run(&request).await.unwrap();

        assert_eq!(report.output, PathBuf::from("horns.svg"));
        assert_eq!(report.entities, 2);
        assert_eq!(report.interactions, 1);
        assert_eq!(report.warnings, 0);

        let written = String::from_utf8(storage.get("horns.svg").await.unwrap()).unwrap();
        assert!(written.starts_with("<svg"));
    }

    #[tokio::test]
    async fn test_run_rejects_non_utf8_input() {
        let storage = MockStorage::default();
        storage.put("broken.playbook", &[0xff, 0xfe, 0x00]).await;

        let engine = ConversionEngine::new(storage, Compiler::default());
        let request = ConversionRequest::new("broken.playbook", None, EmitFormat::Svg);
        match engine.run(&request).await {
            Err(PlaybookError::IoError(e)) => assert_eq!(e.kind(), std::io::ErrorKind::InvalidData),
            other => panic!("expected invalid data error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_compile_error_writes_nothing() {
        let storage = MockStorage::default();
        storage.put("bad.playbook", b"players = {").await;

        let engine = ConversionEngine::new(storage.clone(), Compiler::default());
        let request = ConversionRequest::new("bad.playbook", None, EmitFormat::Svg);
        assert!(engine.run(&request).await.is_err());
        assert!(storage.get("bad.svg").await.is_none());
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite_input() {
        let storage = MockStorage::default();
        storage.put("plays/iso.svg", b"players = { p1 }").await;

        let engine = ConversionEngine::new(storage.clone(), Compiler::default());
        let request = ConversionRequest::new("plays/iso.svg", None, EmitFormat::Svg);
        assert_eq!(request.output, request.input);

        match engine.run(&request).await {
            Err(PlaybookError::InvalidConfigValueError { field, .. }) => assert_eq!(field, "output"),
            other => panic!("expected output validation error, got {:?}", other),
        }
        assert_eq!(storage.get("plays/iso.svg").await.unwrap(), b"players = { p1 }");

        let explicit = ConversionRequest::new(
            "plays/iso.json",
            Some(PathBuf::from("plays/iso.json")),
            EmitFormat::Scene,
        );
        assert!(explicit.validate().is_err());
    }
}
