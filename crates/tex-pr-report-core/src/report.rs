//! Composing the pull-request comment for one document.

use camino::{Utf8Path, Utf8PathBuf};

/// Where a document lives: its absolute directory and its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTarget {
    /// Absolute directory containing the document.
    pub directory: Utf8PathBuf,
    /// Base file name of the document.
    pub filename: String,
}

impl DocumentTarget {
    /// Resolve `path` against `cwd` without touching the filesystem.
    ///
    /// `.` and `..` components are folded lexically.
    pub fn resolve(path: &Utf8Path, cwd: &Utf8Path) -> Option<Self> {
        let joined = cwd.join(path);
        let mut absolute = Utf8PathBuf::new();
        for component in joined.components() {
            match component {
                camino::Utf8Component::CurDir => {}
                camino::Utf8Component::ParentDir => {
                    absolute.pop();
                }
                other => absolute.push(other),
            }
        }
        let filename = absolute.file_name()?.to_string();
        let directory = absolute.parent()?.to_path_buf();
        Some(Self {
            directory,
            filename,
        })
    }
}

/// Assemble the comment body for one document.
///
/// `grammar` and `statistics` are inserted verbatim.
pub fn compose_comment(filename: &str, grammar: &str, statistics: &str) -> String {
    let mut markdown = format!("# Document analysis ({filename})\n\n");
    markdown.push_str("## Grammar check\n\n");
    markdown.push_str(grammar);
    markdown.push_str("\n\n___\n\n");
    markdown.push_str("## Statistics\n\n");
    markdown.push_str(statistics);
    markdown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_relative_path() {
        let target =
            DocumentTarget::resolve(Utf8Path::new("thesis/main.tex"), Utf8Path::new("/work")).unwrap();
        assert_eq!(target.directory, "/work/thesis");
        assert_eq!(target.filename, "main.tex");
    }

    #[test]
    fn resolve_folds_dot_components() {
        let target = DocumentTarget::resolve(
            Utf8Path::new("./a/../paper/./draft.tex"),
            Utf8Path::new("/work/repo"),
        )
        .unwrap();
        assert_eq!(target.directory, "/work/repo/paper");
        assert_eq!(target.filename, "draft.tex");
    }

    #[test]
    fn resolve_keeps_absolute_paths() {
        let target =
            DocumentTarget::resolve(Utf8Path::new("/docs/main.tex"), Utf8Path::new("/work")).unwrap();
        assert_eq!(target.directory, "/docs");
    }

    #[test]
    fn resolve_rejects_paths_without_file_name() {
        assert!(DocumentTarget::resolve(Utf8Path::new(".."), Utf8Path::new("/")).is_none());
    }

    #[test]
    fn comment_sections_appear_in_order() {
        let body = compose_comment("main.tex", "GRAMMAR", "STATS");
        assert_eq!(
            body,
            "# Document analysis (main.tex)\n\n## Grammar check\n\nGRAMMAR\n\n___\n\n## Statistics\n\nSTATS"
        );
    }
}
