//! Page identity: which chapter the reader is on.

use std::sync::LazyLock;

use regex::Regex;

static CHAPTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/docs/([^/]+)").expect("chapter pattern is valid")
});

/// Opaque page identity passed to skills as `context`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    chapter: Option<String>,
}

impl PageContext {
    /// Derive the context from a route path such as `/docs/kinematics/intro`.
    pub fn from_path(path: &str) -> Self {
        let chapter = CHAPTER_RE
            .captures(path)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.is_empty());
        Self { chapter }
    }

    pub fn with_chapter(chapter: impl Into<String>) -> Self {
        let chapter = chapter.into();
        Self {
            chapter: (!chapter.is_empty()).then_some(chapter),
        }
    }

    pub fn chapter(&self) -> Option<&str> {
        self.chapter.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_from_docs_path() {
        let ctx = PageContext::from_path("/docs/ros-fundamentals/nodes");
        assert_eq!(ctx.chapter(), Some("ros-fundamentals"));
    }

    #[test]
    fn chapter_from_top_level_doc() {
        assert_eq!(PageContext::from_path("/docs/intro").chapter(), Some("intro"));
    }

    #[test]
    fn no_chapter_outside_docs() {
        assert_eq!(PageContext::from_path("/").chapter(), None);
        assert_eq!(PageContext::from_path("/blog/post").chapter(), None);
        assert_eq!(PageContext::from_path("/docs/").chapter(), None);
    }

    #[test]
    fn empty_chapter_is_unset() {
        assert_eq!(PageContext::with_chapter("").chapter(), None);
        assert_eq!(PageContext::with_chapter("sensors").chapter(), Some("sensors"));
    }
}
