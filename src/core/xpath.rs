//! Positional path lookups over a parsed HTML document.
//!
//! Paths use the child-axis subset of XPath that schedule pages are addressed
//! with: `/html/body/div[1]/table/tbody/tr` (absolute) or `td[4]/a[1]`
//! (relative to a context element). A step without a position selects every
//! child element with that name; `[n]` picks the n-th such child (1-based);
//! `*` matches any element name.

use crate::utils::error::{AlertError, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::str::FromStr;
use std::sync::LazyLock;

static STEP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z][A-Za-z0-9]*|\*)(?:\[(?P<position>\d+)\])?$")
        .expect("step pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    name: String,
    position: Option<usize>,
}

impl Step {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        self.name == "*" || element.value().name() == self.name
    }

    fn select<'a>(&self, parent: ElementRef<'a>) -> Box<dyn Iterator<Item = ElementRef<'a>> + 'a> {
        let step = self.clone();
        let mut children = parent
            .children()
            .filter_map(ElementRef::wrap)
            .filter(move |child| step.matches(child));

        match self.position {
            Some(position) => Box::new(children.nth(position - 1).into_iter()),
            None => Box::new(children),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath {
    raw: String,
    absolute: bool,
    steps: Vec<Step>,
}

impl NodePath {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Evaluates the path, relative to `context` unless the path is absolute
    /// or no context is given, in which case the document root is used.
    pub fn nodes<'a>(&self, document: &'a Html, context: Option<ElementRef<'a>>) -> Nodes<'a> {
        let mut inner: Box<dyn Iterator<Item = ElementRef<'a>> + 'a>;
        let steps: &[Step] = match context {
            Some(element) if !self.absolute => {
                inner = Box::new(std::iter::once(element));
                self.steps.as_slice()
            }
            _ => {
                // The document node has exactly one element child.
                let root = document.root_element();
                let first = &self.steps[0];
                let root_matches = first.matches(&root) && first.position.unwrap_or(1) == 1;
                inner = Box::new(std::iter::once(root).filter(move |_| root_matches));
                &self.steps[1..]
            }
        };

        for step in steps.iter().cloned() {
            inner = Box::new(inner.flat_map(move |node| step.select(node)));
        }

        Nodes { inner }
    }
}

impl FromStr for NodePath {
    type Err = AlertError;

    fn from_str(path: &str) -> Result<Self> {
        let invalid = |reason: &str| AlertError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(invalid("path is empty"));
        }
        if trimmed.contains("//") {
            return Err(invalid("descendant steps are not supported"));
        }

        let absolute = trimmed.starts_with('/');
        let steps = trimmed
            .trim_start_matches('/')
            .split('/')
            .map(|segment| {
                let caps = STEP_PATTERN
                    .captures(segment)
                    .ok_or_else(|| invalid(&format!("unsupported step '{}'", segment)))?;
                let position = match caps.name("position") {
                    Some(m) => {
                        let position: usize = m
                            .as_str()
                            .parse()
                            .map_err(|_| invalid(&format!("position out of range in '{}'", segment)))?;
                        if position == 0 {
                            return Err(invalid("positions are 1-based"));
                        }
                        Some(position)
                    }
                    None => None,
                };
                Ok(Step {
                    name: caps["name"].to_ascii_lowercase(),
                    position,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(NodePath {
            raw: trimmed.to_string(),
            absolute,
            steps,
        })
    }
}

/// Lazily evaluated, document-ordered elements matched by a [`NodePath`].
/// Holds no state beyond one evaluation; re-evaluating the path yields the
/// same sequence again.
pub struct Nodes<'a> {
    inner: Box<dyn Iterator<Item = ElementRef<'a>> + 'a>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Text content of an element with surrounding whitespace removed.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of the first element matched by `path`.
pub fn first_value<'a>(
    document: &'a Html,
    path: &str,
    context: Option<ElementRef<'a>>,
) -> Result<String> {
    let node_path: NodePath = path.parse()?;
    node_path
        .nodes(document, context)
        .next()
        .map(text_of)
        .ok_or_else(|| AlertError::ValueNotFound {
            path: path.to_string(),
        })
}

/// Every element matched by `path` below `context`, in document order.
pub fn all_values<'a>(document: &'a Html, path: &str, context: ElementRef<'a>) -> Result<Nodes<'a>> {
    let node_path: NodePath = path.parse()?;
    Ok(node_path.nodes(document, Some(context)))
}

/// First element matching a CSS selector. Used to find id-anchored
/// containers before switching to positional paths.
pub fn select_one<'a>(document: &'a Html, css: &str) -> Result<ElementRef<'a>> {
    let selector = Selector::parse(css).map_err(|e| AlertError::InvalidPath {
        path: css.to_string(),
        reason: format!("{:?}", e),
    })?;
    document
        .select(&selector)
        .next()
        .ok_or_else(|| AlertError::ValueNotFound {
            path: css.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div id="header"><h1>Spring League</h1></div>
          <div id="schedule">
            <table><tbody>
              <tr><th>Date</th><th>Time</th></tr>
              <tr><td>2024-05-01</td><td>7pm</td></tr>
              <tr><td>&nbsp;</td><td>8pm</td></tr>
              <tr><td>2024-05-08</td><td>7pm</td></tr>
            </tbody></table>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_first_value_absolute_path() {
        let doc = Html::parse_document(PAGE);
        let value = first_value(&doc, "/html/body/div[1]/h1", None).unwrap();
        assert_eq!(value, "Spring League");
    }

    #[test]
    fn test_first_value_relative_to_context() {
        let doc = Html::parse_document(PAGE);
        let rows: Vec<_> = all_values(&doc, "body/div[2]/table/tbody/tr", doc.root_element())
            .unwrap()
            .collect();
        assert_eq!(rows.len(), 4);

        assert_eq!(first_value(&doc, "td[2]", Some(rows[1])).unwrap(), "7pm");
        assert_eq!(first_value(&doc, "td[1]", Some(rows[2])).unwrap(), "");
        assert_eq!(first_value(&doc, "*[1]", Some(rows[0])).unwrap(), "Date");
    }

    #[test]
    fn test_relative_path_without_context_starts_at_document() {
        let doc = Html::parse_document(PAGE);
        let value = first_value(&doc, "html/body/div[2]/table/tbody/tr[4]/td[1]", None).unwrap();
        assert_eq!(value, "2024-05-08");
    }

    #[test]
    fn test_missing_node_is_not_found() {
        let doc = Html::parse_document(PAGE);
        let err = first_value(&doc, "/html/body/div[3]/h1", None).unwrap_err();
        assert!(matches!(err, AlertError::ValueNotFound { ref path } if path == "/html/body/div[3]/h1"));

        let err = first_value(&doc, "/body/div[1]", None).unwrap_err();
        assert!(matches!(err, AlertError::ValueNotFound { .. }));
    }

    #[test]
    fn test_all_values_is_restartable() {
        let doc = Html::parse_document(PAGE);
        let table = select_one(&doc, "#schedule").unwrap();

        let first: Vec<String> = all_values(&doc, "table/tbody/tr/td[1]", table)
            .unwrap()
            .map(text_of)
            .collect();
        let second: Vec<String> = all_values(&doc, "table/tbody/tr/td[1]", table)
            .unwrap()
            .map(text_of)
            .collect();

        assert_eq!(first, vec!["2024-05-01", "", "2024-05-08"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_values_is_lazy() {
        let doc = Html::parse_document(PAGE);
        let mut rows = all_values(&doc, "body/div[2]/table/tbody/tr", doc.root_element()).unwrap();
        let header = rows.next().unwrap();
        assert_eq!(first_value(&doc, "th[1]", Some(header)).unwrap(), "Date");
        assert_eq!(rows.count(), 3);
    }

    #[test]
    fn test_invalid_paths_are_rejected() {
        for path in ["", "//tr", "/html/body/div[0]", "td[@class='x']", "td[1]/text()"] {
            let err = path.parse::<NodePath>().unwrap_err();
            assert!(matches!(err, AlertError::InvalidPath { .. }), "{path} should be invalid");
        }
    }

    #[test]
    fn test_select_one_missing_anchor() {
        let doc = Html::parse_document(PAGE);
        assert!(matches!(
            select_one(&doc, "#ctl00_missing"),
            Err(AlertError::ValueNotFound { .. })
        ));
    }
}
