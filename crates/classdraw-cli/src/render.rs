//! PlantUML renderer invocation.
//!
//! Runs `java -jar plantuml.jar -t<format> -charset UTF-8 <file>.puml` in the
//! diagram's directory and expects `<file>.<format>` next to it afterwards.

use crate::error::{Error, Result};
use clap::ValueEnum;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How often a running renderer is polled for exit
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Image format produced by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageFormat {
    /// Portable Network Graphics
    Png,
    /// Scalable Vector Graphics
    Svg,
}

impl ImageFormat {
    /// File extension of the rendered image
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }

    /// PlantUML output type flag
    fn flag(self) -> String {
        format!("-t{}", self.extension())
    }
}

/// How to invoke PlantUML
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Java executable
    pub java: String,
    /// Path to `plantuml.jar`
    pub jar: PathBuf,
    /// Output image format
    pub format: ImageFormat,
    /// Upper bound on one render
    pub timeout: Duration,
}

impl RendererConfig {
    /// Creates a config for the given jar with `java` from `PATH`, PNG
    /// output, and a 60 second timeout
    pub fn new(jar: impl Into<PathBuf>) -> Self {
        Self {
            java: "java".to_string(),
            jar: jar.into(),
            format: ImageFormat::Png,
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the Java executable
    pub fn java(mut self, java: impl Into<String>) -> Self {
        self.java = java.into();
        self
    }

    /// Sets the output image format
    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the render timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Arguments passed to the Java executable
    fn args(&self, jar: &Path, diagram_file: &Path) -> Vec<OsString> {
        vec![
            "-jar".into(),
            jar.as_os_str().to_owned(),
            self.format.flag().into(),
            "-charset".into(),
            "UTF-8".into(),
            diagram_file.as_os_str().to_owned(),
        ]
    }
}

/// Renders `diagram` and returns the path of the produced image
pub fn render(config: &RendererConfig, diagram: &Path) -> Result<PathBuf> {
    // The renderer runs in the diagram's directory, so the jar must not be relative
    let jar = fs::canonicalize(&config.jar).map_err(|source| Error::JarNotFound {
        path: config.jar.clone(),
        source,
    })?;

    let working_dir = diagram
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let diagram_file = diagram.file_name().map(Path::new).unwrap_or(diagram);

    let artifact = diagram.with_extension(config.format.extension());
    remove_stale_artifact(&artifact)?;

    let mut stderr_capture =
        tempfile::tempfile().map_err(|e| Error::renderer_io(&config.java, e))?;
    let stderr_handle = stderr_capture
        .try_clone()
        .map_err(|e| Error::renderer_io(&config.java, e))?;

    let args = config.args(&jar, diagram_file);
    debug!(
        "Running {} {:?} in {}",
        config.java,
        args,
        working_dir.display()
    );

    let mut child = Command::new(&config.java)
        .args(&args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::from(stderr_handle))
        .spawn()
        .map_err(|e| Error::renderer_io(&config.java, e))?;

    let status = match wait_with_deadline(&mut child, config.timeout)
        .map_err(|e| Error::renderer_io(&config.java, e))?
    {
        Some(status) => status,
        None => {
            // Best effort: the process may have exited between the last poll and now
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::RendererTimeout {
                path: diagram.to_path_buf(),
                seconds: config.timeout.as_secs(),
            });
        }
    };

    if !status.success() {
        let mut stderr = String::new();
        if stderr_capture.seek(SeekFrom::Start(0)).is_ok() {
            let _ = stderr_capture.read_to_string(&mut stderr);
        }
        return Err(Error::RendererFailed {
            path: diagram.to_path_buf(),
            code: status.code(),
            stderr: stderr.trim().to_string(),
        });
    }

    if !artifact.is_file() {
        return Err(Error::ArtifactMissing { path: artifact });
    }

    info!("Rendered {}", artifact.display());
    Ok(artifact)
}

/// Deletes an image left over from an earlier run, so that only output of
/// this run passes the artifact check
fn remove_stale_artifact(artifact: &Path) -> Result<()> {
    match fs::remove_file(artifact) {
        Ok(()) => {
            debug!("Removed stale {}", artifact.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::file_write(artifact, e)),
    }
}

/// Waits for `child` to exit, giving up after `timeout`.
///
/// Returns `Ok(None)` if the deadline passed; the child is left running.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_jar(dir: &Path) -> PathBuf {
        let jar = dir.join("plantuml.jar");
        fs::write(&jar, b"not really a jar").unwrap();
        jar
    }

    #[test]
    fn test_image_format() {
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Svg.flag(), "-tsvg");
    }

    #[test]
    fn test_renderer_args() {
        let config = RendererConfig::new("plantuml.jar").format(ImageFormat::Svg);
        let args = config.args(Path::new("/opt/plantuml.jar"), Path::new("car.puml"));
        assert_eq!(
            args,
            vec![
                OsString::from("-jar"),
                OsString::from("/opt/plantuml.jar"),
                OsString::from("-tsvg"),
                OsString::from("-charset"),
                OsString::from("UTF-8"),
                OsString::from("car.puml"),
            ]
        );
    }

    #[test]
    fn test_missing_jar() {
        let temp_dir = TempDir::new().unwrap();
        let config = RendererConfig::new(temp_dir.path().join("missing.jar"));
        let err = render(&config, &temp_dir.path().join("car.puml")).unwrap_err();
        assert!(matches!(err, Error::JarNotFound { .. }));
    }

    #[test]
    fn test_missing_java() {
        let temp_dir = TempDir::new().unwrap();
        let config = RendererConfig::new(fake_jar(temp_dir.path()))
            .java("classdraw-test-no-such-java-binary");
        let err = render(&config, &temp_dir.path().join("car.puml")).unwrap_err();
        assert!(matches!(err, Error::RendererIo { .. }));
        assert!(!err.is_recoverable());
    }

    #[cfg(unix)]
    #[test]
    fn test_renderer_failure_status() {
        let temp_dir = TempDir::new().unwrap();
        let config = RendererConfig::new(fake_jar(temp_dir.path())).java("false");
        let err = render(&config, &temp_dir.path().join("car.puml")).unwrap_err();
        assert!(matches!(err, Error::RendererFailed { code: Some(1), .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let config = RendererConfig::new(fake_jar(temp_dir.path())).java("true");
        let err = render(&config, &temp_dir.path().join("car.puml")).unwrap_err();
        match err {
            Error::ArtifactMissing { path } => assert!(path.ends_with("car.png")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_stale_artifact_is_not_accepted() {
        let temp_dir = TempDir::new().unwrap();
        let stale = temp_dir.path().join("car.png");
        fs::write(&stale, "old image").unwrap();

        let config = RendererConfig::new(fake_jar(temp_dir.path())).java("true");
        let err = render(&config, &temp_dir.path().join("car.puml")).unwrap_err();
        assert!(matches!(err, Error::ArtifactMissing { .. }));
        assert!(!stale.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_fresh_artifact_is_returned() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("car.svg"), "old image").unwrap();

        // Stands in for java: writes <last arg stem>.svg in the working directory
        let fake_java = temp_dir.path().join("fake-java");
        fs::write(
            &fake_java,
            "#!/bin/sh\nfor last; do :; done\nprintf '<svg/>' > \"${last%.puml}.svg\"\n",
        )
        .unwrap();
        fs::set_permissions(&fake_java, fs::Permissions::from_mode(0o755)).unwrap();

        let config = RendererConfig::new(fake_jar(temp_dir.path()))
            .java(fake_java.to_string_lossy())
            .format(ImageFormat::Svg);
        let artifact = render(&config, &temp_dir.path().join("car.puml")).unwrap();
        assert_eq!(artifact, temp_dir.path().join("car.svg"));
        assert_eq!(fs::read_to_string(&artifact).unwrap(), "<svg/>");
    }

    #[cfg(unix)]
    #[test]
    fn test_wait_with_deadline_times_out() {
        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        let status = wait_with_deadline(&mut child, Duration::from_millis(100)).unwrap();
        assert!(status.is_none());
        child.kill().unwrap();
        child.wait().unwrap();
    }
}
