//! Domain entities: value types shared by services and the CLI.

use std::fmt;
use std::path::Path;

/// Secondary key used to reorder `ollama list` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Lexicographic by model name (first column).
    Name,
    /// Descending by normalized size.
    Size,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Name => write!(f, "name"),
            SortKey::Size => write!(f, "size"),
        }
    }
}

/// Fully qualified target of `ollama create`: `<user>/<name>:<tag>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    pub user: String,
    pub name: String,
    pub tag: String,
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.user, self.name, self.tag)
    }
}

/// Suggest a model name for a checkpoint.
///
/// Strips directories, a `.gguf`-style extension and any `:tag` suffix:
/// `/models/llama-3-8b.Q4_K_M.gguf` → `llama-3-8b.Q4_K_M`,
/// `llama3:latest` → `llama3`.
pub fn default_model_name(checkpoint: &str) -> String {
    let base = Path::new(checkpoint)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| checkpoint.to_string());
    let base = base.split(':').next().unwrap_or(&base);
    let stem = Path::new(base)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| base.to_string());
    if stem.is_empty() {
        checkpoint.to_string()
    } else {
        stem
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
///
/// Unresolvable variables leave the input unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/models/llama-3-8b.Q4_K_M.gguf", "llama-3-8b.Q4_K_M")]
    #[case("mistral.gguf", "mistral")]
    #[case("llama3:latest", "llama3")]
    #[case("phi3", "phi3")]
    #[case("registry/org/qwen2:7b", "qwen2")]
    fn given_checkpoint_when_default_model_name_then_strips_path_ext_and_tag(
        #[case] checkpoint: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(default_model_name(checkpoint), expected);
    }

    #[test]
    fn given_model_ref_when_display_then_formats_user_name_tag() {
        let model = ModelRef {
            user: "alice".into(),
            name: "mistral".into(),
            tag: "q4".into(),
        };
        assert_eq!(model.to_string(), "alice/mistral:q4");
    }

    #[test]
    fn given_home_var_when_expand_then_resolves() {
        let home = std::env::var("HOME").expect("HOME should be set");
        assert_eq!(expand_env_vars("$HOME/models"), format!("{home}/models"));
        assert!(expand_env_vars("~/models").starts_with(&home));
    }

    #[test]
    fn given_unknown_var_when_expand_then_returns_input() {
        let input = "$MODELCTL_SURELY_UNSET_VAR_42/x";
        assert_eq!(expand_env_vars(input), input);
    }
}
