//! External generator scripts found in the source tree.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::artifact::{Artifact, Origin};
use crate::directive::DirectiveForm;
use crate::engine::Expander;
use crate::errors::EngineError;
use crate::generator::{GenerateRequest, Generator};

/// Runs `<interpreter> <script> <name>.<ext> <arguments> <parent file> <parent>`
/// in the output directory and reads the artifact back.
///
/// The script sees the raw directive comment (`// ...` or `/* ... */`) as its
/// argument, and appends to the signal file itself if it declares signals.
#[derive(Debug, Clone)]
pub struct ScriptGenerator {
    name: String,
    path: PathBuf,
    interpreter: String,
}

impl ScriptGenerator {
    /// Creates a generator named `name` backed by the script at `path`.
    pub fn new(name: &str, path: &Path, interpreter: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_path_buf(),
            interpreter: interpreter.to_string(),
        }
    }

    /// Script path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reconstructs the directive comment a script expects as its argument.
pub fn raw_arguments(request: &GenerateRequest) -> String {
    match request.form {
        DirectiveForm::Line if request.arguments.is_empty() => String::new(),
        DirectiveForm::Line => format!("// {}", request.arguments),
        DirectiveForm::Block => format!("/*\n{}\n*/", request.arguments),
    }
}

impl Generator for ScriptGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "external generator script"
    }

    fn generate(
        &self,
        request: &GenerateRequest,
        cx: &mut Expander<'_>,
    ) -> Result<Vec<Artifact>, EngineError> {
        let options = cx.options();
        let dir = options.output_dir.clone();
        let ext = options.scan.snippet_extension.clone();
        std::fs::create_dir_all(&dir).map_err(|e| EngineError::io(&dir, e))?;

        log::debug!("running {} {}", self.interpreter, self.path.display());
        let output = Command::new(&self.interpreter)
            .arg(&self.path)
            .arg(format!("{}.{ext}", request.name))
            .arg(raw_arguments(request))
            .arg(&request.parent_file)
            .arg(&request.parent)
            .current_dir(&dir)
            .output()
            .map_err(|e| EngineError::GeneratorFailed {
                generator: self.name.clone(),
                reason: format!("could not run `{}`: {e}", self.interpreter),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last = stderr.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("");
            return Err(EngineError::GeneratorFailed {
                generator: self.name.clone(),
                reason: format!("{} {}", output.status, last.trim()).trim_end().to_string(),
            });
        }

        let path = dir.join(format!("{}.{ext}", request.target));
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(vec![Artifact {
                name: request.target.clone(),
                content,
                origin: Origin::WrittenByGenerator,
            }]),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(EngineError::io(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsnip_source::Span;

    fn request(form: DirectiveForm, arguments: &str) -> GenerateRequest {
        GenerateRequest {
            target: "crc_x".into(),
            name: "x".into(),
            arguments: arguments.into(),
            form,
            parent: "top".into(),
            parent_file: "top.v".into(),
            span: Span::DUMMY,
        }
    }

    #[test]
    fn raw_arguments_restore_comment_shape() {
        assert_eq!(raw_arguments(&request(DirectiveForm::Line, "8, en")), "// 8, en");
        assert_eq!(raw_arguments(&request(DirectiveForm::Line, "")), "");
        assert_eq!(
            raw_arguments(&request(DirectiveForm::Block, "a\nb")),
            "/*\na\nb\n*/"
        );
    }
}
